//! セッションエラー型

use rc4tap_cipher::CipherError;

/// セッション操作のエラー
///
/// 現状はすべてコーデック（暗号エンジン）由来の契約違反。
/// ハンドシェイク収集フェーズだけが正規の「not ready」経路であり、
/// それ以外で ready 前に変換が走るのはバグとして即座に表面化させる。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// コーデック（暗号エンジン）の契約違反
    Codec(CipherError),
}

impl core::fmt::Display for SessionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SessionError::Codec(e) => write!(f, "codec error: {}", e),
        }
    }
}

impl From<CipherError> for SessionError {
    fn from(e: CipherError) -> Self {
        SessionError::Codec(e)
    }
}
