//! 方向別の固定鍵テーブル
//!
//! プロトコル解析で特定された 256 バイトの鍵定数。実行時に導出・交渉
//! されることはなく、静的な外部設定として扱う。
//!
//! 送信方向だけは [`SEND_KEY`] をそのまま使わず、1 の補数（全ビット
//! 反転）を鍵にする。この非対称は観測対象プロトコルの固定仕様。

/// 受信方向（リモート → ローカル）の鍵。そのまま KSA に渡す。
pub const RECV_KEY: [u8; 256] = [
    0xE0, 0xD9, 0x6F, 0xBD, 0xD7, 0x2B, 0xF5, 0x38, 0x8F, 0x06, 0x6C, 0x45, 0x6D, 0xDD, 0xEE, 0xE2,
    0x25, 0xC5, 0x10, 0x65, 0xD8, 0xE0, 0xB9, 0x80, 0x32, 0x2D, 0x82, 0x30, 0xB5, 0xE9, 0x95, 0xB8,
    0x30, 0xBE, 0x9D, 0x79, 0xEA, 0xF5, 0x4A, 0x47, 0xBA, 0xEB, 0xFD, 0x24, 0x69, 0x9A, 0xE2, 0x2C,
    0x3C, 0x42, 0x16, 0x18, 0x3E, 0xC0, 0xDB, 0xF6, 0xBB, 0xFD, 0xA6, 0x31, 0xD8, 0x08, 0x02, 0x09,
    0x5A, 0xBE, 0x35, 0xA2, 0x1F, 0x47, 0xD8, 0x31, 0xB4, 0x21, 0xBC, 0x3A, 0x56, 0x1B, 0x87, 0x51,
    0x8D, 0xC2, 0x7B, 0xE1, 0x84, 0xD9, 0xC7, 0x42, 0xC9, 0x31, 0x41, 0x90, 0xDC, 0x23, 0xB8, 0xBA,
    0x72, 0x7A, 0x5F, 0x80, 0x28, 0x3E, 0xA5, 0x37, 0xA3, 0x72, 0xC4, 0x2D, 0xB1, 0xA3, 0x2A, 0x5C,
    0x8A, 0x32, 0xFE, 0x78, 0xED, 0xB0, 0x6D, 0x36, 0x7B, 0xB2, 0x23, 0x6D, 0xB5, 0xDD, 0xB8, 0x51,
    0x81, 0xC3, 0x0D, 0xAA, 0x31, 0x5F, 0xD9, 0x8F, 0x6D, 0x8B, 0x8A, 0x25, 0xCE, 0x43, 0xA4, 0x8E,
    0x80, 0x1C, 0x34, 0x12, 0x23, 0x2D, 0xAB, 0x99, 0x36, 0x20, 0x1E, 0x21, 0x85, 0xCD, 0x29, 0x36,
    0xF1, 0xEA, 0xFF, 0xC8, 0x57, 0x38, 0x25, 0xE5, 0x91, 0x00, 0x0A, 0x24, 0xCA, 0x6D, 0x24, 0xBC,
    0xB3, 0x2C, 0x29, 0x93, 0xB5, 0xE0, 0x8A, 0xCD, 0xED, 0xA4, 0xD8, 0xE4, 0x66, 0xFC, 0x7E, 0xF9,
    0x3F, 0x5C, 0x09, 0xE2, 0xE3, 0xB2, 0x3E, 0xAE, 0x9E, 0xAF, 0xFA, 0x67, 0x43, 0x16, 0xDA, 0xF9,
    0xE1, 0x3E, 0x81, 0x01, 0xA2, 0xA5, 0xC5, 0x04, 0xD6, 0x47, 0x81, 0xB8, 0x8A, 0xD6, 0xB0, 0x4E,
    0x5A, 0xC0, 0x7C, 0xEF, 0xB6, 0x88, 0xBE, 0xA7, 0x20, 0xDF, 0x68, 0xDF, 0x94, 0xCC, 0x46, 0x12,
    0xE3, 0x27, 0x1F, 0xB6, 0x6A, 0xE4, 0x10, 0xF8, 0x2E, 0x53, 0xEF, 0x79, 0x3E, 0x6B, 0x14, 0x52,
];

/// 送信方向（ローカル → リモート）の公開鍵定数。
///
/// 実際の鍵はこのテーブルの 1 の補数（[`complemented`] 適用後）。
pub const SEND_KEY: [u8; 256] = [
    0xCE, 0x6E, 0x6C, 0x8F, 0xAA, 0x4F, 0xDB, 0xEB, 0xA8, 0xE2, 0x8D, 0x1A, 0x3A, 0x80, 0x79, 0x58,
    0x28, 0xA7, 0x29, 0x78, 0x62, 0x66, 0xDB, 0x7F, 0xD0, 0x48, 0x1B, 0x54, 0xDD, 0x2B, 0x53, 0xE5,
    0xC2, 0xAC, 0x04, 0xC6, 0xAE, 0xE0, 0xA4, 0x2C, 0x80, 0xA7, 0x9A, 0x03, 0x7C, 0x82, 0x0B, 0x66,
    0xC9, 0x4D, 0x01, 0x19, 0xF6, 0xE3, 0x1B, 0x6A, 0x5F, 0xAF, 0x9C, 0x8A, 0xC1, 0x30, 0x98, 0xC6,
    0x43, 0x8A, 0xDF, 0xD7, 0x65, 0xA0, 0x6B, 0x76, 0x4C, 0xFE, 0x83, 0x46, 0x2B, 0xFB, 0x8E, 0x4A,
    0x9B, 0xBE, 0x7A, 0x26, 0xD0, 0x61, 0x06, 0x1E, 0x2E, 0x85, 0x2F, 0xAF, 0x12, 0x0B, 0x73, 0xDC,
    0x24, 0x21, 0x48, 0xE5, 0xD8, 0x38, 0x31, 0xAD, 0x45, 0xB8, 0x1C, 0xEE, 0x08, 0xA7, 0xD9, 0x0A,
    0xC7, 0x23, 0xBA, 0x8E, 0x99, 0x26, 0xEC, 0x76, 0x7E, 0xC0, 0x54, 0x76, 0x12, 0x9F, 0xDC, 0x40,
    0x2B, 0xAE, 0x93, 0x96, 0x43, 0x27, 0xEF, 0x43, 0x59, 0x31, 0xEC, 0x55, 0x37, 0x60, 0x13, 0x0B,
    0x25, 0x1E, 0xAA, 0x67, 0x72, 0x40, 0x7C, 0xC2, 0x0D, 0x0B, 0xD4, 0x70, 0x7F, 0x15, 0x96, 0xC0,
    0xA9, 0x1C, 0x40, 0xC1, 0xFB, 0x45, 0x8B, 0x40, 0xA1, 0x1A, 0xC6, 0xC5, 0x24, 0x41, 0x18, 0x89,
    0xCA, 0x2E, 0x2B, 0x3D, 0x37, 0x04, 0x0C, 0x7A, 0xC0, 0x27, 0xE3, 0x54, 0xF1, 0x8B, 0x92, 0x09,
    0xAE, 0x51, 0x54, 0x68, 0x44, 0x7C, 0xDA, 0xEC, 0xDE, 0xA2, 0x94, 0xB8, 0x20, 0xEB, 0xC8, 0x72,
    0x29, 0x9E, 0xB3, 0xC3, 0xD7, 0x5D, 0x6D, 0xA5, 0xB0, 0x51, 0x67, 0xE9, 0x55, 0xFA, 0xBE, 0xB6,
    0x97, 0x80, 0x3F, 0xE9, 0x16, 0xCE, 0xE6, 0x61, 0xE6, 0x8D, 0x65, 0x1E, 0xB3, 0x93, 0x33, 0x7F,
    0xB1, 0x2C, 0x26, 0x61, 0xEB, 0xC2, 0x64, 0xFA, 0x85, 0x08, 0xB1, 0xC8, 0x56, 0x11, 0x08, 0x01,
];

/// 鍵テーブルの 1 の補数を返す
///
/// 送信方向の実効鍵 = `complemented(&SEND_KEY)`。
pub const fn complemented(key: &[u8; 256]) -> [u8; 256] {
    let mut out = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        out[i] = !key[i];
        i += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complemented_inverts_every_bit() {
        let inv = complemented(&SEND_KEY);
        for i in 0..256 {
            assert_eq!(inv[i], !SEND_KEY[i]);
        }
    }

    #[test]
    fn test_complemented_is_involution() {
        let twice = complemented(&complemented(&RECV_KEY));
        assert_eq!(twice, RECV_KEY);
    }

    #[test]
    fn test_keys_differ() {
        // 送受信で同じ鍵を共有しない
        assert_ne!(RECV_KEY, SEND_KEY);
        assert_ne!(RECV_KEY, complemented(&SEND_KEY));
    }
}
