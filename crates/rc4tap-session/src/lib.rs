//! # rc4tap-session
//!
//! ストリームセッション状態機械
//!
//! 暗号エンジン（rc4tap-cipher）とフレーミング（rc4tap-frame）を束ね、
//! キャプチャ層から届く方向付き生バイトイベントを完成メッセージの
//! キューへ変換するクレート。`no_std` + `alloc` 環境で動作する。
//!
//! ## パイプライン
//!
//! ```text
//! キャプチャ層 → ingest(direction, raw_bytes)
//!                  │ AwaitingHandshake: 32 バイト収集 → 両キーストリーム同期
//!                  │ Ready:             crypt → FrameBuffer.append → extract_all
//!                  ▼
//!           方向別メッセージキュー（received / sent）
//!                  ▼
//!           drain_received() / drain_sent()   ← 消費側が任意のタイミングで取得
//! ```
//!
//! ## セッションの状態遷移
//!
//! ```text
//! AwaitingHandshake → Ready (32 バイト消費の瞬間、ハンドシェイクバイトは
//!                            アプリケーションデータにならない)
//! Ready → AwaitingHandshake (どちらかの方向で "quit" を復号した瞬間。
//!                            バッファ・キュー・暗号状態をすべて破棄)
//! ```
//!
//! 方向内のメッセージ順序はデリミタ出現順と一致する。方向間の相対順序は
//! 保証しない（キャプチャ層の配送タイミングに依存するため）。

#![no_std]
extern crate alloc;

mod codec;
mod error;
mod session;
mod text;
mod timestamp;

pub use codec::{PassthroughCodec, PayloadCodec};
pub use error::SessionError;
pub use session::{IngestReport, Rc4Session, SessionParams, StreamSession};
pub use text::{latin1_to_bytes, latin1_to_string};
pub use timestamp::leading_timestamp;

pub use rc4tap_cipher::Direction;

/// メッセージ区切りの固定リテラル（5 バイト: `|` `.` `\` CR LF）
///
/// 正規表現ではなく、制御文字込みでバイト単位に厳密一致させる。
pub const MESSAGE_DELIMITER: &[u8] = b"|.\\\r\n";

/// 再同期シグナルとなるメッセージ
///
/// どちらの方向で復号されても、下位接続が張り直されたことを意味し、
/// セッション全体を破棄して新しいハンドシェイクを待つ。
pub const RESYNC_SENTINEL: &str = "quit";

/// 既定のリモートポート（メインサーバー）
pub const DEFAULT_REMOTE_PORT: u16 = 800;

/// 代替サーバーのリモートポート
pub const ALTERNATE_REMOTE_PORT: u16 = 801;
