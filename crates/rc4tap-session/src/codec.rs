//! ペイロードコーデックの差し替え口
//!
//! フレーミング/キュー管理のロジックを具体的な暗号実装から切り離す
//! ための小さなトレイト。本番は RC4 デュープレックスエンジン、テストは
//! 素通しコーデックを差す。

use alloc::vec::Vec;

use rc4tap_cipher::{CipherError, Direction, DuplexCipher};

/// 方向付き生バイトを復号済みバイトへ変換するコーデック
///
/// セッションはこのトレイトにだけ依存する。ハンドシェイクの収集・
/// フェーズ管理はセッション側の責任で、コーデックは「何バイト必要か」
/// と「収集済みバイトをどう消費するか」だけを答える。
pub trait PayloadCodec {
    /// ready になるまでに消費すべき生バイト数（0 なら即 ready）
    fn handshake_len(&self) -> usize;

    /// 収集済みハンドシェイクバイトを消費して ready 状態へ移行する
    ///
    /// # エラー
    /// 長さが [`handshake_len`](Self::handshake_len) と異なる場合。
    /// エラー時に内部状態を部分的に進めてはならない。
    fn apply_handshake(&mut self, bytes: &[u8]) -> Result<(), CipherError>;

    /// 受信方向（リモート → ローカル）の生バイトを復号する
    fn decode_inbound(&mut self, data: &[u8]) -> Result<Vec<u8>, CipherError>;

    /// 送信方向（ローカル → リモート）の生バイトを復号する
    fn decode_outbound(&mut self, data: &[u8]) -> Result<Vec<u8>, CipherError>;

    /// 初期状態（未同期）へ戻す
    fn reset(&mut self);
}

impl PayloadCodec for DuplexCipher {
    fn handshake_len(&self) -> usize {
        rc4tap_cipher::HANDSHAKE_LEN
    }

    fn apply_handshake(&mut self, bytes: &[u8]) -> Result<(), CipherError> {
        self.initialize_handshake(bytes)
    }

    fn decode_inbound(&mut self, data: &[u8]) -> Result<Vec<u8>, CipherError> {
        self.crypt(Direction::Inbound, data)
    }

    fn decode_outbound(&mut self, data: &[u8]) -> Result<Vec<u8>, CipherError> {
        self.crypt(Direction::Outbound, data)
    }

    fn reset(&mut self) {
        DuplexCipher::reset(self)
    }
}

/// 素通しコーデック（テスト・平文プロトコル用）
///
/// ハンドシェイク不要（長さ 0）で、バイト列を無変換で通す。
/// フレーミングとキュー管理だけを検証したいときに使う。
#[derive(Debug, Default)]
pub struct PassthroughCodec;

impl PayloadCodec for PassthroughCodec {
    fn handshake_len(&self) -> usize {
        0
    }

    fn apply_handshake(&mut self, bytes: &[u8]) -> Result<(), CipherError> {
        if bytes.is_empty() {
            Ok(())
        } else {
            Err(CipherError::HandshakeLength { got: bytes.len() })
        }
    }

    fn decode_inbound(&mut self, data: &[u8]) -> Result<Vec<u8>, CipherError> {
        Ok(data.to_vec())
    }

    fn decode_outbound(&mut self, data: &[u8]) -> Result<Vec<u8>, CipherError> {
        Ok(data.to_vec())
    }

    fn reset(&mut self) {}
}
