//! 表示用のチャンク分割ユーティリティ
//!
//! 長いメッセージをコンソール表示向けに固定幅へ折り返すための補助。
//! フレーミング本体（デリミタ抽出）とは無関係で、ストリーム状態には
//! 一切触れない。

use alloc::string::String;
use alloc::vec::Vec;

use crate::error::FrameError;

/// 文字列を `chunk_size` 文字ごとに分割する
///
/// 分割は文字（`char`）単位で行い、マルチバイト文字を途中で
/// 切断しない。空入力はチャンクなし（空 Vec）。
///
/// # エラー
/// - `FrameError::InvalidChunkSize`: `chunk_size == 0`
pub fn split_into_chunks(input: &str, chunk_size: usize) -> Result<Vec<String>, FrameError> {
    if chunk_size == 0 {
        return Err(FrameError::InvalidChunkSize);
    }

    let chars: Vec<char> = input.chars().collect();
    let chunks = chars
        .chunks(chunk_size)
        .map(|c| c.iter().collect())
        .collect();
    Ok(chunks)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn test_even_split() {
        let chunks = split_into_chunks("abcdef", 2).unwrap();
        assert_eq!(chunks, vec!["ab", "cd", "ef"]);
    }

    #[test]
    fn test_ragged_tail() {
        let chunks = split_into_chunks("abcde", 2).unwrap();
        assert_eq!(chunks, vec!["ab", "cd", "e"]);
    }

    #[test]
    fn test_chunk_larger_than_input() {
        let chunks = split_into_chunks("ab", 10).unwrap();
        assert_eq!(chunks, vec!["ab".to_string()]);
    }

    #[test]
    fn test_empty_input_yields_no_chunks() {
        assert!(split_into_chunks("", 4).unwrap().is_empty());
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        assert_eq!(
            split_into_chunks("abc", 0),
            Err(FrameError::InvalidChunkSize)
        );
    }

    #[test]
    fn test_multibyte_chars_not_cut() {
        // Latin-1 復号で生じる U+0080..=U+00FF も文字単位で扱う
        let chunks = split_into_chunks("áéíóú", 2).unwrap();
        assert_eq!(chunks, vec!["áé", "íó", "ú"]);
    }
}
