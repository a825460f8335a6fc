//! 暗号エラー型

use crate::HANDSHAKE_LEN;

/// 暗号操作のエラー
///
/// いずれも API の誤用（契約違反）であり、回復可能なストリーム異常ではない。
/// エラーを返す操作は内部状態を一切変更しない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CipherError {
    /// ハンドシェイク完了前に crypt が呼ばれた
    NotReady,
    /// ハンドシェイクに渡されたバイト列が 32 バイトでない
    HandshakeLength {
        /// 実際に渡された長さ
        got: usize,
    },
}

impl core::fmt::Display for CipherError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CipherError::NotReady => {
                write!(f, "cipher state is not ready (handshake not completed)")
            }
            CipherError::HandshakeLength { got } => write!(
                f,
                "handshake requires exactly {} bytes, got {}",
                HANDSHAKE_LEN, got
            ),
        }
    }
}
