//! Latin-1 (ISO-8859-1) テキスト変換
//!
//! 観測対象プロトコルのテキストは ISO-8859-1 で符号化されている。
//! バイト値と U+0000..=U+00FF が 1 対 1 に対応するため、復号は無損失で
//! 失敗しない。バイナリ混じりのペイロードもそのまま文字列化できる。

use alloc::string::String;
use alloc::vec::Vec;

/// バイト列を Latin-1 として文字列へ復号する（失敗しない）
pub fn latin1_to_string(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// 文字列を Latin-1 バイト列へ戻す
///
/// # 戻り値
/// - `Some(bytes)`: すべての文字が U+00FF 以下
/// - `None`: Latin-1 で表現できない文字を含む
pub fn latin1_to_bytes(text: &str) -> Option<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        let code = ch as u32;
        if code > 0xFF {
            return None;
        }
        out.push(code as u8);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_all_byte_values() {
        let bytes: Vec<u8> = (0u8..=255).collect();
        let text = latin1_to_string(&bytes);
        assert_eq!(text.chars().count(), 256);
        assert_eq!(latin1_to_bytes(&text), Some(bytes));
    }

    #[test]
    fn test_ascii_passthrough() {
        assert_eq!(latin1_to_string(b"hello"), "hello");
        assert_eq!(latin1_to_bytes("hello"), Some(b"hello".to_vec()));
    }

    #[test]
    fn test_high_bytes_become_latin1_chars() {
        assert_eq!(latin1_to_string(&[0xE9]), "é");
    }

    #[test]
    fn test_non_latin1_rejected() {
        assert_eq!(latin1_to_bytes("日本語"), None);
    }
}
