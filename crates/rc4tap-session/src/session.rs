//! ストリームセッション本体
//!
//! 方向付き生バイトイベントを受け取り、ハンドシェイク収集 → 復号 →
//! フレーミング → キュー投入までを 1 回の `ingest` で同期的に行う。
//! どの操作もメモリ内変換のみで、入力長に比例した有界時間で完了する。

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;

use rc4tap_cipher::{Direction, DuplexCipher};
use rc4tap_frame::FrameBuffer;

use crate::codec::PayloadCodec;
use crate::error::SessionError;
use crate::text::latin1_to_string;
use crate::{DEFAULT_REMOTE_PORT, MESSAGE_DELIMITER, RESYNC_SENTINEL};

/// セッションの識別パラメータ
///
/// キャプチャ層へそのまま引き渡すための値で、コアの復号処理では
/// 使用しない。再スタート時に同じ値で新セッションを張るために保持する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionParams {
    /// リモート側の TCP ポート（方向判定の基準）
    pub remote_port: u16,
    /// キャプチャデバイスのインデックス
    pub device_index: usize,
    /// BPF カスタムフィルタ（None なら `tcp port {remote_port}`）
    pub custom_filter: Option<String>,
}

impl Default for SessionParams {
    fn default() -> Self {
        SessionParams {
            remote_port: DEFAULT_REMOTE_PORT,
            device_index: 0,
            custom_filter: None,
        }
    }
}

/// セッションのフェーズ
enum Phase {
    /// ハンドシェイクバイトを収集中（両方向合算で到着順に貯める）
    AwaitingHandshake {
        /// これまでに観測した生バイト
        collected: Vec<u8>,
    },
    /// 定常状態（復号 + フレーミング）
    Ready,
}

/// 1 回の `ingest` の結果サマリ
///
/// 駆動ループがセッション内部を覗かずにライフサイクルイベントを
/// ログできるようにする。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// この呼び出しでハンドシェイク収集に回った生バイト数
    pub handshake_consumed: usize,
    /// 受信キューへ積まれたメッセージ数
    pub queued_received: usize,
    /// 送信キューへ積まれたメッセージ数
    pub queued_sent: usize,
    /// 再同期（セッション全破棄）が起きたか
    pub resynced: bool,
}

/// ストリームセッション
///
/// 両方向の暗号状態・蓄積バッファ・メッセージキューを専有する。
/// `ingest`（生産側）と `drain_*`（消費側）は同一キューに対して同時に
/// 呼ばないこと。呼び出し側でセッション単位に直列化する（CLI では
/// セッションを 1 つのミューテックスで包む）。
pub struct StreamSession<C: PayloadCodec> {
    /// 復号コーデック（本番: RC4 デュープレックス）
    codec: C,
    /// フェーズ（ハンドシェイク収集 or 定常）
    phase: Phase,
    /// 受信方向の蓄積バッファ
    inbound_buf: FrameBuffer,
    /// 送信方向の蓄積バッファ
    outbound_buf: FrameBuffer,
    /// 受信方向の完成メッセージキュー
    received: VecDeque<String>,
    /// 送信方向の完成メッセージキュー
    sent: VecDeque<String>,
    /// キャプチャ層へ引き渡す識別パラメータ
    params: SessionParams,
}

/// RC4 デュープレックスエンジンを差した本番構成のセッション
pub type Rc4Session = StreamSession<DuplexCipher>;

impl Rc4Session {
    /// 固定鍵の RC4 コーデックでセッションを生成する
    pub fn with_default_cipher(params: SessionParams) -> Self {
        StreamSession::new(DuplexCipher::new(), params)
    }
}

impl<C: PayloadCodec> StreamSession<C> {
    /// コーデックとパラメータからセッションを生成する
    ///
    /// ハンドシェイク不要なコーデック（長さ 0）なら最初から Ready。
    pub fn new(codec: C, params: SessionParams) -> Self {
        let phase = Self::initial_phase(&codec);
        StreamSession {
            codec,
            phase,
            inbound_buf: FrameBuffer::new(MESSAGE_DELIMITER),
            outbound_buf: FrameBuffer::new(MESSAGE_DELIMITER),
            received: VecDeque::new(),
            sent: VecDeque::new(),
            params,
        }
    }

    fn initial_phase(codec: &C) -> Phase {
        if codec.handshake_len() == 0 {
            Phase::Ready
        } else {
            Phase::AwaitingHandshake {
                collected: Vec::new(),
            }
        }
    }

    /// ハンドシェイク完了済みか
    pub fn is_ready(&self) -> bool {
        matches!(self.phase, Phase::Ready)
    }

    /// セッションの識別パラメータ
    pub fn params(&self) -> &SessionParams {
        &self.params
    }

    /// 方向付き生バイトイベントを取り込む
    ///
    /// - 未 ready: ハンドシェイク必要量に達するまで到着順に貯める。
    ///   達した瞬間にコーデックへ渡して Ready へ遷移し、この呼び出しの
    ///   余剰バイトはそのまま定常経路で処理する。ハンドシェイク由来の
    ///   メッセージは決して生まれない。
    /// - Ready: 復号 → 蓄積 → デリミタ抽出 → Latin-1 復号 → キュー投入。
    ///   抽出メッセージが再同期シグナルならセッションを全破棄し、
    ///   同一呼び出しの残りバイト（旧接続のもの）は捨てる。
    pub fn ingest(
        &mut self,
        direction: Direction,
        raw: &[u8],
    ) -> Result<IngestReport, SessionError> {
        let mut report = IngestReport::default();
        let mut data = raw;

        if let Phase::AwaitingHandshake { collected } = &mut self.phase {
            let need = self.codec.handshake_len() - collected.len();
            let take = need.min(data.len());
            collected.extend_from_slice(&data[..take]);
            report.handshake_consumed = take;
            data = &data[take..];

            if collected.len() < self.codec.handshake_len() {
                return Ok(report);
            }

            let handshake = core::mem::take(collected);
            self.codec.apply_handshake(&handshake)?;
            self.phase = Phase::Ready;
        }

        if data.is_empty() {
            return Ok(report);
        }

        let decoded = match direction {
            Direction::Inbound => self.codec.decode_inbound(data)?,
            Direction::Outbound => self.codec.decode_outbound(data)?,
        };

        let messages = {
            let buf = match direction {
                Direction::Inbound => &mut self.inbound_buf,
                Direction::Outbound => &mut self.outbound_buf,
            };
            buf.append(&decoded);
            buf.extract_all()
        };

        for message in messages {
            let text = latin1_to_string(&message);
            if text == RESYNC_SENTINEL {
                // 接続が張り直された。部分的な持ち越しは一切しない。
                self.reset();
                report.queued_received = 0;
                report.queued_sent = 0;
                report.resynced = true;
                return Ok(report);
            }
            match direction {
                Direction::Inbound => {
                    self.received.push_back(text);
                    report.queued_received += 1;
                }
                Direction::Outbound => {
                    self.sent.push_back(text);
                    report.queued_sent += 1;
                }
            }
        }

        Ok(report)
    }

    /// 受信方向の完成メッセージをすべて取り出す（ブロックしない）
    pub fn drain_received(&mut self) -> Vec<String> {
        self.received.drain(..).collect()
    }

    /// 送信方向の完成メッセージをすべて取り出す（ブロックしない）
    pub fn drain_sent(&mut self) -> Vec<String> {
        self.sent.drain(..).collect()
    }

    /// 受信キューの滞留メッセージ数
    pub fn pending_received(&self) -> usize {
        self.received.len()
    }

    /// 送信キューの滞留メッセージ数
    pub fn pending_sent(&self) -> usize {
        self.sent.len()
    }

    /// セッションを初期状態へ戻す
    ///
    /// 暗号状態の再鍵付け、両バッファ・両キューの破棄、ハンドシェイク
    /// 収集フェーズへの復帰をまとめて行う。
    pub fn reset(&mut self) {
        self.codec.reset();
        self.phase = Self::initial_phase(&self.codec);
        self.inbound_buf.clear();
        self.outbound_buf.clear();
        self.received.clear();
        self.sent.clear();
    }
}
