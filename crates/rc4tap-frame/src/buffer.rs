//! 蓄積バッファとデリミタ抽出
//!
//! 一方向ぶんの復号済みバイトを貯め、固定デリミタで切り出す。
//! デリミタは正規表現ではなく固定リテラルで、制御文字を含めて
//! バイト単位で厳密に一致させる。

use alloc::vec::Vec;

/// 一方向ぶんの蓄積バッファ + デリミタ抽出器
///
/// 追記専用で、デリミタ発見時に先頭部分だけが取り除かれる。
/// 不変条件: [`extract_all`] から戻った直後のバッファに完全な
/// デリミタ出現は残っていない。
///
/// [`extract_all`]: FrameBuffer::extract_all
pub struct FrameBuffer {
    /// まだメッセージを構成していない復号済みバイト列
    buf: Vec<u8>,
    /// メッセージ区切りの固定リテラル
    delimiter: Vec<u8>,
}

impl FrameBuffer {
    /// 指定デリミタの空バッファを生成する
    ///
    /// # 引数
    /// - `delimiter`: 空でない固定バイト列
    pub fn new(delimiter: &[u8]) -> Self {
        debug_assert!(!delimiter.is_empty(), "delimiter must not be empty");
        FrameBuffer {
            buf: Vec::new(),
            delimiter: delimiter.to_vec(),
        }
    }

    /// 復号済みチャンクをバッファ末尾へ連結する
    pub fn append(&mut self, chunk: &[u8]) {
        self.buf.extend_from_slice(chunk);
    }

    /// 完成したメッセージをすべて切り出す
    ///
    /// 先頭から最初のデリミタ出現を探し、その手前（空も可）を
    /// メッセージとして取り出してデリミタを読み飛ばす、を出現が
    /// 尽きるまで繰り返す。1 チャンクに複数メッセージが届いても
    /// この 1 回の呼び出しで順序どおりすべて取り出される。
    ///
    /// # 戻り値
    /// デリミタ出現順のメッセージ列（デリミタは含まない）
    pub fn extract_all(&mut self) -> Vec<Vec<u8>> {
        let mut messages = Vec::new();
        while let Some(pos) = find_subsequence(&self.buf, &self.delimiter) {
            let mut rest = self.buf.split_off(pos + self.delimiter.len());
            self.buf.truncate(pos);
            core::mem::swap(&mut self.buf, &mut rest);
            messages.push(rest);
        }
        messages
    }

    /// 未完成データが残っているか
    pub fn has_pending(&self) -> bool {
        !self.buf.is_empty()
    }

    /// 未完成データのバイト数
    pub fn pending_len(&self) -> usize {
        self.buf.len()
    }

    /// バッファを空にする（セッションリセット用）
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

/// `haystack` 中の `needle` の最初の出現位置を返す
fn find_subsequence(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}
