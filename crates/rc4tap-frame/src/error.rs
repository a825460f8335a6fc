//! フレーミングエラー型

/// フレーミング/表示ユーティリティのエラー
///
/// API 誤用（契約違反）のみ。ストリーム内容そのものに「壊れたパケット」
/// という概念はなく、デリミタ間のバイト列は空を含めすべて正規の
/// メッセージとして受理する。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// チャンクサイズに 0 が渡された
    InvalidChunkSize,
}

impl core::fmt::Display for FrameError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            FrameError::InvalidChunkSize => write!(f, "chunk size must be greater than zero"),
        }
    }
}
