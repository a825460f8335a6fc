//! 送受信デュープレックス暗号エンジン
//!
//! 方向ごとに独立した RC4 状態を 1 つずつ持ち、2 フェーズ
//! （ハンドシェイク → 定常）のプロトコルで ready 状態に到達する。
//!
//! ハンドシェイクは接続確立時にアプリケーション層へ届かないバイトが
//! 消費したキーストリーム位置を読み飛ばすための処置で、変換出力は
//! 捨てる。32 バイト（受信 16 + 送信 16）という値はプロトコル固有の
//! 外部パラメータ。

use alloc::vec::Vec;

use crate::error::CipherError;
use crate::keys::{complemented, RECV_KEY, SEND_KEY};
use crate::rc4::Rc4State;
use crate::{Direction, HANDSHAKE_LEN, HANDSHAKE_SPLIT};

/// 方向別 RC4 状態のペア + readiness フラグ
///
/// 状態はセッションごとに専有され、方向間・セッション間で共有しない。
/// ready になるのはセッション生存期間中ただ一度、[`initialize_handshake`]
/// が 32 バイトを消費した瞬間。
///
/// [`initialize_handshake`]: DuplexCipher::initialize_handshake
pub struct DuplexCipher {
    /// 受信方向（Inbound）の状態
    recv: Rc4State,
    /// 送信方向（Outbound）の状態
    send: Rc4State,
    /// ハンドシェイク完了フラグ
    ready: bool,
}

impl DuplexCipher {
    /// 固定鍵から未同期（not ready）のエンジンを生成する
    pub fn new() -> Self {
        DuplexCipher {
            recv: Rc4State::new(&RECV_KEY),
            send: Rc4State::new(&complemented(&SEND_KEY)),
            ready: false,
        }
    }

    /// ハンドシェイク完了済みか
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// 最初に観測した 32 バイトを消費して両状態を同期させる
    ///
    /// 前半 16 バイトを受信状態、後半 16 バイトを送信状態に通し、
    /// 出力は捨てる。長さ検査は状態に触れる前に行うため、エラー時に
    /// 状態が部分的に進むことはない。
    ///
    /// # エラー
    /// - `CipherError::HandshakeLength`: `bytes.len() != 32`
    pub fn initialize_handshake(&mut self, bytes: &[u8]) -> Result<(), CipherError> {
        if bytes.len() != HANDSHAKE_LEN {
            return Err(CipherError::HandshakeLength { got: bytes.len() });
        }

        let _ = self.recv.crypt(&bytes[..HANDSHAKE_SPLIT]);
        let _ = self.send.crypt(&bytes[HANDSHAKE_SPLIT..]);
        self.ready = true;
        Ok(())
    }

    /// 指定方向の状態でバイト列を変換する
    ///
    /// Inbound は受信状態（復号）、Outbound は送信状態。観測者は送信
    /// データも復号する側だが、XOR 対称なので変換自体は同一であり、
    /// 実クライアントの送信状態と歩調を合わせて前進する。
    ///
    /// # エラー
    /// - `CipherError::NotReady`: ハンドシェイク完了前の呼び出し
    pub fn crypt(&mut self, direction: Direction, data: &[u8]) -> Result<Vec<u8>, CipherError> {
        if !self.ready {
            return Err(CipherError::NotReady);
        }
        let state = match direction {
            Direction::Inbound => &mut self.recv,
            Direction::Outbound => &mut self.send,
        };
        Ok(state.crypt(data))
    }

    /// 受信方向の変換（`crypt(Direction::Inbound, …)` の別名）
    pub fn decrypt(&mut self, data: &[u8]) -> Result<Vec<u8>, CipherError> {
        self.crypt(Direction::Inbound, data)
    }

    /// 送信方向の変換（`crypt(Direction::Outbound, …)` の別名）
    pub fn encrypt(&mut self, data: &[u8]) -> Result<Vec<u8>, CipherError> {
        self.crypt(Direction::Outbound, data)
    }

    /// 両状態を固定鍵から再初期化し、readiness をクリアする
    ///
    /// セッション再開（resync）時に呼ぶ。
    pub fn reset(&mut self) {
        *self = DuplexCipher::new();
    }
}

impl Default for DuplexCipher {
    fn default() -> Self {
        Self::new()
    }
}
