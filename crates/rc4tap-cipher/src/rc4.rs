//! RC4 単方向キーストリーム状態
//!
//! 256 エントリの置換テーブルと 2 つのインデックスからなる古典的な
//! RC4 実装。XOR ベースなので同一状態に対する変換は対合（自己逆元）だが、
//! インデックス i/j は状態の生存期間を通じて累積するため、
//! バイトの順序を変えたり飛ばしたりした再適用は成立しない。

use alloc::vec::Vec;

/// RC4 キーストリーム状態（一方向ぶん）
///
/// 不変条件: `box_` は常に 0..=255 の置換（重複・欠落なし）。
/// KSA も crypt も swap しか行わないため、この性質は構築以降保たれる。
#[derive(Clone)]
pub struct Rc4State {
    /// 置換テーブル
    box_: [u8; 256],
    /// 累積インデックス i
    i: u8,
    /// 累積インデックス j
    j: u8,
}

impl Rc4State {
    /// 鍵から状態を初期化する（標準 KSA）
    ///
    /// 恒等置換から始め、鍵依存の swap を 256 回適用する。
    /// 鍵は 1〜256 バイトの任意長（`key[i mod len]` 参照）。
    /// 運用上の鍵は 256 バイトの固定テーブルだが、短い鍵も受け付ける
    /// ことで公開されている RC4 テストベクタによる検証ができる。
    ///
    /// # 引数
    /// - `key`: 空でない鍵バイト列
    pub fn new(key: &[u8]) -> Self {
        debug_assert!(!key.is_empty(), "RC4 key must not be empty");

        let mut box_ = [0u8; 256];
        for (i, slot) in box_.iter_mut().enumerate() {
            *slot = i as u8;
        }

        let mut j: u8 = 0;
        if !key.is_empty() {
            for i in 0..256 {
                j = j
                    .wrapping_add(box_[i])
                    .wrapping_add(key[i % key.len()]);
                box_.swap(i, j as usize);
            }
        }

        Rc4State { box_, i: 0, j: 0 }
    }

    /// バイト列全体を入力順に変換する
    ///
    /// 暗号化と復号は同じ操作（XOR 対称）。1 バイトごとに内部状態が
    /// 前進するため、呼び出し順はストリーム上のバイト順と一致させること。
    ///
    /// # 戻り値
    /// 変換後のバイト列（入力と同じ長さ）
    pub fn crypt(&mut self, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(data.len());
        for &byte in data {
            out.push(self.crypt_byte(byte));
        }
        out
    }

    /// 1 バイトを変換し、状態を 1 ステップ前進させる
    fn crypt_byte(&mut self, input: u8) -> u8 {
        self.i = self.i.wrapping_add(1);
        self.j = self.j.wrapping_add(self.box_[self.i as usize]);
        self.box_.swap(self.i as usize, self.j as usize);

        let a = self.box_[self.i as usize];
        let b = self.box_[self.j as usize];
        input ^ self.box_[a.wrapping_add(b) as usize]
    }

    /// 置換テーブルが 0..=255 の置換になっているか（テスト用）
    pub fn is_permutation(&self) -> bool {
        let mut seen = [false; 256];
        for &v in self.box_.iter() {
            if seen[v as usize] {
                return false;
            }
            seen[v as usize] = true;
        }
        true
    }
}

impl core::fmt::Debug for Rc4State {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        // 置換テーブルはキーストリームそのものなのでダンプしない
        f.debug_struct("Rc4State")
            .field("i", &self.i)
            .field("j", &self.j)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    /// 公開テストベクタ: key="Key", plaintext="Plaintext"
    /// → ciphertext BB F3 16 E8 D9 40 AF 0A D3
    #[test]
    fn test_rc4_published_vector_key() {
        let mut state = Rc4State::new(b"Key");
        let out = state.crypt(b"Plaintext");
        assert_eq!(
            out,
            vec![0xBB, 0xF3, 0x16, 0xE8, 0xD9, 0x40, 0xAF, 0x0A, 0xD3]
        );
    }

    /// 公開テストベクタ: key="Wiki", plaintext="pedia"
    /// → ciphertext 10 21 BF 04 20
    #[test]
    fn test_rc4_published_vector_wiki() {
        let mut state = Rc4State::new(b"Wiki");
        let out = state.crypt(b"pedia");
        assert_eq!(out, vec![0x10, 0x21, 0xBF, 0x04, 0x20]);
    }

    #[test]
    fn test_ksa_yields_permutation() {
        let state = Rc4State::new(&crate::RECV_KEY);
        assert!(state.is_permutation());
    }

    #[test]
    fn test_permutation_invariant_after_crypt() {
        let mut state = Rc4State::new(&crate::RECV_KEY);
        // 長さの異なる crypt を繰り返しても置換性は保たれる
        for len in [0usize, 1, 7, 256, 1000] {
            let data = vec![0xA5u8; len];
            let _ = state.crypt(&data);
            assert!(state.is_permutation(), "len={} で置換性が壊れた", len);
        }
    }

    #[test]
    fn test_determinism_fresh_states_agree() {
        let plaintext: Vec<u8> = (0..200u8).collect();
        let mut a = Rc4State::new(&crate::SEND_KEY);
        let mut b = Rc4State::new(&crate::SEND_KEY);
        assert_eq!(a.crypt(&plaintext), b.crypt(&plaintext));
    }

    #[test]
    fn test_same_state_roundtrip() {
        // 同一鍵の別状態で encrypt → decrypt すると元に戻る
        // （XOR 対称: 両状態が同じキーストリーム位置を辿るため）
        for len in [0usize, 1, 16, 255, 256, 257, 10_000] {
            let plaintext: Vec<u8> = (0..len).map(|i| (i * 31 % 251) as u8).collect();

            let mut enc = Rc4State::new(&crate::RECV_KEY);
            let mut dec = Rc4State::new(&crate::RECV_KEY);
            let ciphertext = enc.crypt(&plaintext);
            assert_eq!(dec.crypt(&ciphertext), plaintext, "len={}", len);
        }
    }

    #[test]
    fn test_chunking_does_not_change_keystream() {
        // 1 回で変換しても分割して変換しても結果は同じ
        let data: Vec<u8> = (0..100u8).collect();

        let mut whole = Rc4State::new(b"chunk-test");
        let expected = whole.crypt(&data);

        let mut split = Rc4State::new(b"chunk-test");
        let mut actual = split.crypt(&data[..33]);
        actual.extend(split.crypt(&data[33..70]));
        actual.extend(split.crypt(&data[70..]));

        assert_eq!(actual, expected);
    }

    #[test]
    fn test_empty_input_is_noop() {
        let mut a = Rc4State::new(b"Key");
        let mut b = Rc4State::new(b"Key");
        assert!(a.crypt(&[]).is_empty());
        // 空入力は状態を進めない
        assert_eq!(a.crypt(b"x"), b.crypt(b"x"));
    }
}
