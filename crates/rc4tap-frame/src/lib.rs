//! # rc4tap-frame
//!
//! 復号済みバイトストリームのデリミタ分割
//!
//! 方向ごとの蓄積バッファに復号済みバイトを追記し、固定の複数バイト
//! デリミタでメッセージ単位に切り出すクレート。
//! `no_std` + `alloc` 環境で動作する。
//!
//! ## フレーミングの仕組み
//!
//! ```text
//! append("he")          → バッファ: "he"            抽出: []
//! append("llo" + D)     → バッファ: "hello" + D     抽出: ["hello"]
//! append("A"+D+"B"+D+D) → バッファ: ...             抽出: ["A", "B", ""]
//!   （D = デリミタ。空メッセージも正規のメッセージとして扱う）
//! ```
//!
//! 抽出は 1 回の呼び出しで尽きるまでループするため、抽出後のバッファに
//! 完全なデリミタが残ることはない。

#![no_std]
extern crate alloc;

mod buffer;
mod chunk;
mod error;

pub use buffer::FrameBuffer;
pub use chunk::split_into_chunks;
pub use error::FrameError;
