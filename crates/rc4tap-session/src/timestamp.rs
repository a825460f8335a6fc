//! 先頭タイムスタンプの解釈
//!
//! （再）スタート後に最初に観測される送信方向メッセージは、実ペイロード
//! の前に 4 バイトのリトルエンディアン `f32` タイムスタンプを持つことが
//! ある。表示上の便宜としてこれを切り出す補助で、解釈に失敗したら
//! メッセージ全体をペイロードとして扱う。暗号状態にもバッファにも
//! 一切影響しない。

use alloc::string::String;

use crate::text::{latin1_to_bytes, latin1_to_string};

/// メッセージ先頭の 4 バイト f32 タイムスタンプを解釈して切り離す
///
/// 先頭 4 文字を Latin-1 バイトに戻し、リトルエンディアン `f32` として
/// 読む。値が正規数（`is_normal`）である場合のみタイムスタンプとみなす。
/// ゼロ・非数・無限大・非正規化数はペイロード誤読の可能性が高いので
/// 不採用。
///
/// # 戻り値
/// - `Some((timestamp, rest))`: タイムスタンプと残りのペイロード
/// - `None`: タイムスタンプ付きとは解釈できない（メッセージ全体が
///   ペイロード）
pub fn leading_timestamp(message: &str) -> Option<(f32, String)> {
    let bytes = latin1_to_bytes(message)?;
    if bytes.len() < 4 {
        return None;
    }

    let value = f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
    if !value.is_normal() {
        return None;
    }

    Some((value, latin1_to_string(&bytes[4..])))
}
