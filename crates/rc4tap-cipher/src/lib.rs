//! # rc4tap-cipher
//!
//! RC4 ストリーム暗号プリミティブ実装
//!
//! 観測対象プロトコルの暗号化に使われる RC4（方向ごとに独立した
//! キーストリーム状態）を実装するクレート。
//! `no_std` + `alloc` 環境で動作する。
//!
//! ## 対象プロトコルの暗号仕様
//!
//! ```text
//! 鍵スケジューリング (KSA):
//!   box = 恒等置換 (0..=255)
//!   j = (j + box[i] + key[i mod keylen]) mod 256 を 256 回、都度 swap
//!
//! バイト変換 (crypt):
//!   i = (i + 1) mod 256
//!   j = (j + box[i]) mod 256
//!   swap(box[i], box[j])
//!   out = in XOR box[(box[i] + box[j]) mod 256]
//!
//! 方向と鍵:
//!   受信方向 (Inbound)  = RECV_KEY をそのまま使用
//!   送信方向 (Outbound) = SEND_KEY の 1 の補数（全ビット反転）を使用
//!
//! ハンドシェイク:
//!   最初に観測した 32 バイトのうち前半 16 バイトを受信状態、
//!   後半 16 バイトを送信状態に通して出力を捨てる。
//!   両状態のキーストリーム位置が実トラフィックと同期した時点で ready。
//! ```

#![no_std]
extern crate alloc;

mod duplex;
mod error;
mod keys;
mod rc4;

pub use duplex::DuplexCipher;
pub use error::CipherError;
pub use keys::{complemented, RECV_KEY, SEND_KEY};
pub use rc4::Rc4State;

/// ハンドシェイクで消費する生バイト数
///
/// 前半 [`HANDSHAKE_SPLIT`] バイトが受信状態、残りが送信状態に渡る。
/// 値はプロトコル固有の外部パラメータであり、ここから導出しない。
pub const HANDSHAKE_LEN: usize = 32;

/// ハンドシェイクバイト列のうち受信状態に渡すバイト数
pub const HANDSHAKE_SPLIT: usize = 16;

/// 観測ストリームの方向
///
/// キャプチャ層が TCP 送信元ポートから判定する（リモートポートが
/// 送信元なら Inbound）。このクレート内で再計算することはない。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// リモート → ローカル（受信）
    Inbound,
    /// ローカル → リモート（送信）
    Outbound,
}
