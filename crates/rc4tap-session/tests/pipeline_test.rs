//! rc4tap-session 統合テスト
//!
//! cipher + frame + session の完全なパイプラインをテストする。
//! 実際の観測セッション（ハンドシェイク → 定常 → 再同期 → 再接続）を
//! シミュレートする。

use rc4tap_cipher::{Direction, DuplexCipher, HANDSHAKE_LEN};
use rc4tap_session::{
    leading_timestamp, Rc4Session, SessionParams, MESSAGE_DELIMITER,
};

// ==============================================================
// ヘルパー: 観測対象の「本物の」両端をシミュレートする
// ==============================================================

/// ワイヤシミュレータ
///
/// セッションと同じ鍵・同じハンドシェイクバイトで初期化した
/// ミラー暗号を持ち、平文からワイヤ上の暗号文を作る。
/// RC4 は XOR 対称なので、ミラーの crypt 出力がそのまま暗号文になる。
struct Wire {
    mirror: DuplexCipher,
}

impl Wire {
    fn new(handshake: &[u8]) -> Self {
        let mut mirror = DuplexCipher::new();
        mirror.initialize_handshake(handshake).unwrap();
        Wire { mirror }
    }

    /// 平文メッセージ列をデリミタで連結し、指定方向の暗号文にする
    fn encrypt(&mut self, direction: Direction, messages: &[&[u8]]) -> Vec<u8> {
        let mut plain = Vec::new();
        for message in messages {
            plain.extend_from_slice(message);
            plain.extend_from_slice(MESSAGE_DELIMITER);
        }
        self.mirror.crypt(direction, &plain).unwrap()
    }
}

fn handshake_bytes(seed: u8) -> Vec<u8> {
    (0..HANDSHAKE_LEN as u8)
        .map(|i| i.wrapping_mul(31).wrapping_add(seed))
        .collect()
}

// ==============================================================
// シナリオテスト
// ==============================================================

#[test]
fn test_full_session_lifecycle() {
    let mut session = Rc4Session::with_default_cipher(SessionParams::default());

    // --- フェーズ 1: ハンドシェイク（両方向に分かれて届く） ---
    let hs = handshake_bytes(7);
    session.ingest(Direction::Inbound, &hs[..16]).unwrap();
    session.ingest(Direction::Outbound, &hs[16..]).unwrap();
    assert!(session.is_ready(), "32 バイト到達で ready になるべき");

    let mut wire = Wire::new(&hs);

    // --- フェーズ 2: 定常トラフィック ---
    // 受信 2 通が 1 セグメントで届く
    let inbound = wire.encrypt(Direction::Inbound, &[b"welcome", b"motd: hello"]);
    let report = session.ingest(Direction::Inbound, &inbound).unwrap();
    assert_eq!(report.queued_received, 2);

    // 送信 1 通がセグメント境界で泣き別れる
    let outbound = wire.encrypt(Direction::Outbound, &[b"login alice"]);
    let (head, tail) = outbound.split_at(5);
    session.ingest(Direction::Outbound, head).unwrap();
    assert_eq!(session.pending_sent(), 0, "半端なチャンクからはまだ出ない");
    session.ingest(Direction::Outbound, tail).unwrap();

    assert_eq!(session.drain_received(), vec!["welcome", "motd: hello"]);
    assert_eq!(session.drain_sent(), vec!["login alice"]);

    // --- フェーズ 3: 再同期（quit）と再接続 ---
    let inbound = wire.encrypt(Direction::Inbound, &[b"quit"]);
    let report = session.ingest(Direction::Inbound, &inbound).unwrap();
    assert!(report.resynced);
    assert!(!session.is_ready());

    // 新しい接続は別のハンドシェイクバイトでやり直す
    let hs2 = handshake_bytes(99);
    session.ingest(Direction::Inbound, &hs2).unwrap();
    assert!(session.is_ready());

    let mut wire2 = Wire::new(&hs2);
    let inbound = wire2.encrypt(Direction::Inbound, &[b"welcome back"]);
    session.ingest(Direction::Inbound, &inbound).unwrap();
    assert_eq!(session.drain_received(), vec!["welcome back"]);
}

#[test]
fn test_first_outbound_message_timestamp_prefix() {
    let hs = handshake_bytes(3);
    let mut session = Rc4Session::with_default_cipher(SessionParams::default());
    session.ingest(Direction::Inbound, &hs).unwrap();
    let mut wire = Wire::new(&hs);

    // 実クライアントは最初の送信メッセージの先頭に f32 タイムスタンプを置く
    let mut first = 3271.25f32.to_le_bytes().to_vec();
    first.extend_from_slice(b"handshake done");
    let outbound = wire.encrypt(Direction::Outbound, &[&first, b"plain second"]);
    session.ingest(Direction::Outbound, &outbound).unwrap();

    let sent = session.drain_sent();
    assert_eq!(sent.len(), 2);

    // 1 通目: タイムスタンプを切り出せる
    let (ts, payload) = leading_timestamp(&sent[0]).expect("先頭 4 バイトは f32 のはず");
    assert_eq!(ts, 3271.25);
    assert_eq!(payload, "handshake done");

    // 2 通目以降に補助を適用するかは消費側の判断（最初の 1 通だけが
    // タイムスタンプ付きというのがプロトコルの慣行）
    assert_eq!(sent[1], "plain second");
}

#[test]
fn test_interleaving_does_not_disturb_either_direction() {
    let hs = handshake_bytes(42);

    // 同じトラフィックを「交互」と「方向別まとめて」の 2 通りで配送する
    let make_traffic = |wire: &mut Wire| {
        let inbound = wire.encrypt(Direction::Inbound, &[b"i1", b"i2", b"i3"]);
        let outbound = wire.encrypt(Direction::Outbound, &[b"o1", b"o2"]);
        (inbound, outbound)
    };

    let mut wire_a = Wire::new(&hs);
    let (in_a, out_a) = make_traffic(&mut wire_a);
    let mut interleaved = Rc4Session::with_default_cipher(SessionParams::default());
    interleaved.ingest(Direction::Inbound, &hs).unwrap();
    // 受信と送信を細切れに交互配送
    interleaved.ingest(Direction::Inbound, &in_a[..4]).unwrap();
    interleaved.ingest(Direction::Outbound, &out_a[..3]).unwrap();
    interleaved.ingest(Direction::Inbound, &in_a[4..10]).unwrap();
    interleaved.ingest(Direction::Outbound, &out_a[3..]).unwrap();
    interleaved.ingest(Direction::Inbound, &in_a[10..]).unwrap();

    let mut wire_b = Wire::new(&hs);
    let (in_b, out_b) = make_traffic(&mut wire_b);
    let mut sequential = Rc4Session::with_default_cipher(SessionParams::default());
    sequential.ingest(Direction::Inbound, &hs).unwrap();
    sequential.ingest(Direction::Inbound, &in_b).unwrap();
    sequential.ingest(Direction::Outbound, &out_b).unwrap();

    assert_eq!(interleaved.drain_received(), sequential.drain_received());
    assert_eq!(interleaved.drain_sent(), sequential.drain_sent());
}

#[test]
fn test_binary_garbage_between_delimiters_is_a_message() {
    // 「壊れたパケット」という概念はない。デリミタ間は何でもメッセージ。
    let hs = handshake_bytes(0);
    let mut session = Rc4Session::with_default_cipher(SessionParams::default());
    session.ingest(Direction::Inbound, &hs).unwrap();
    let mut wire = Wire::new(&hs);

    let garbage: Vec<u8> = (0u8..=255).filter(|b| !MESSAGE_DELIMITER.contains(b)).collect();
    let inbound = wire.encrypt(Direction::Inbound, &[&garbage]);
    let report = session.ingest(Direction::Inbound, &inbound).unwrap();
    assert_eq!(report.queued_received, 1);

    let received = session.drain_received();
    assert_eq!(received[0].chars().count(), garbage.len());
}
