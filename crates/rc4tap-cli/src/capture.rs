//! キャプチャプロバイダ
//!
//! libpcap のライブキャプチャから TCP ペイロードを取り出し、送信元
//! ポートで方向を決めてセッションへ流し込む層。セグメントの並べ直しは
//! しない（各方向のバイトが送信順で届くことは libpcap/カーネル側の
//! 責任とする）。

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use anyhow::{Context, Result};
use etherparse::{SlicedPacket, TransportSlice};
use tracing::{debug, warn};

use rc4tap_session::{Direction, Rc4Session, SessionParams};

/// pcap の読み取りタイムアウト（ミリ秒）。停止フラグの確認周期を兼ねる。
const READ_TIMEOUT_MS: i32 = 1000;

/// 利用可能なキャプチャデバイスの一覧（インデックス順）
pub fn list_interfaces() -> Result<Vec<String>> {
    let devices = pcap::Device::list().context("failed to enumerate capture devices")?;
    Ok(devices
        .into_iter()
        .map(|d| match d.desc {
            Some(desc) => format!("{} ({})", d.name, desc),
            None => d.name,
        })
        .collect())
}

/// 稼働中のスニファ 1 本ぶんのハンドル
///
/// キャプチャスレッドがセッションへ ingest し、消費側（コンソール）は
/// 同じミューテックス越しにキューを drain する。セッションの置き換え
/// （再同期）は ingest 内で完結するため、ロックを取っている消費側から
/// 半壊れ状態が見えることはない。
pub struct Sniffer {
    /// 復号セッション（生産側・消費側で共有）
    session: Arc<Mutex<Rc4Session>>,
    /// キャプチャスレッド停止フラグ
    stop: Arc<AtomicBool>,
    /// 再同期（quit 観測）の累計回数
    resync_count: Arc<AtomicU64>,
    /// キャプチャスレッドのハンドル
    thread: Option<JoinHandle<()>>,
    /// 起動時のパラメータ（再スタート用に保持）
    params: SessionParams,
}

impl Sniffer {
    /// 指定パラメータでキャプチャを開始する
    ///
    /// デバイスはインデックスで選び、BPF フィルタは custom_filter が
    /// なければ `tcp port {remote_port}` を使う。
    pub fn start(params: SessionParams) -> Result<Self> {
        let devices = pcap::Device::list().context("failed to enumerate capture devices")?;
        let device = devices
            .into_iter()
            .nth(params.device_index)
            .with_context(|| format!("no capture device at index {}", params.device_index))?;

        let mut cap = pcap::Capture::from_device(device)
            .context("failed to create capture handle")?
            .promisc(true)
            .timeout(READ_TIMEOUT_MS)
            .open()
            .context("failed to open capture device")?;

        let filter = params
            .custom_filter
            .clone()
            .unwrap_or_else(|| format!("tcp port {}", params.remote_port));
        cap.filter(&filter, true)
            .with_context(|| format!("invalid BPF filter: {}", filter))?;

        let session = Arc::new(Mutex::new(Rc4Session::with_default_cipher(params.clone())));
        let stop = Arc::new(AtomicBool::new(false));
        let resync_count = Arc::new(AtomicU64::new(0));

        let thread = {
            let session = Arc::clone(&session);
            let stop = Arc::clone(&stop);
            let resync_count = Arc::clone(&resync_count);
            let remote_port = params.remote_port;
            std::thread::Builder::new()
                .name("rc4tap-capture".into())
                .spawn(move || capture_loop(cap, remote_port, session, stop, resync_count))
                .context("failed to spawn capture thread")?
        };

        Ok(Sniffer {
            session,
            stop,
            resync_count,
            thread: Some(thread),
            params,
        })
    }

    /// 共有セッションハンドル
    pub fn session(&self) -> &Arc<Mutex<Rc4Session>> {
        &self.session
    }

    /// 起動時のパラメータ
    pub fn params(&self) -> &SessionParams {
        &self.params
    }

    /// これまでに観測した再同期回数
    pub fn resync_count(&self) -> u64 {
        self.resync_count.load(Ordering::Relaxed)
    }

    /// キャプチャを停止してスレッドを回収する
    pub fn stop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

impl Drop for Sniffer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// キャプチャスレッド本体
fn capture_loop(
    mut cap: pcap::Capture<pcap::Active>,
    remote_port: u16,
    session: Arc<Mutex<Rc4Session>>,
    stop: Arc<AtomicBool>,
    resync_count: Arc<AtomicU64>,
) {
    while !stop.load(Ordering::Relaxed) {
        let packet = match cap.next_packet() {
            Ok(packet) => packet,
            Err(pcap::Error::TimeoutExpired) => continue,
            Err(e) => {
                warn!(error = %e, "capture read failed, stopping");
                break;
            }
        };

        let Some((direction, payload)) = extract_tcp_payload(packet.data, remote_port) else {
            continue;
        };

        let report = {
            let mut session = session.lock().expect("session mutex poisoned");
            match session.ingest(direction, payload) {
                Ok(report) => report,
                Err(e) => {
                    // 契約違反はストリーム異常ではなくバグなので目立たせる
                    warn!(error = %e, ?direction, "ingest rejected payload");
                    continue;
                }
            }
        };

        if report.resynced {
            resync_count.fetch_add(1, Ordering::Relaxed);
            debug!("resync sentinel observed, session rekeyed");
        }
    }
}

/// 生パケットから (方向, TCP ペイロード) を取り出す
///
/// TCP 以外・ペイロード空のセグメントは None。方向は送信元ポートが
/// リモートポートと一致するかだけで決まる。
fn extract_tcp_payload(data: &[u8], remote_port: u16) -> Option<(Direction, &[u8])> {
    let sliced = SlicedPacket::from_ethernet(data).ok()?;
    let TransportSlice::Tcp(tcp) = sliced.transport? else {
        return None;
    };

    let payload = tcp.payload();
    if payload.is_empty() {
        return None;
    }

    let direction = if tcp.source_port() == remote_port {
        Direction::Inbound
    } else {
        Direction::Outbound
    };
    Some((direction, payload))
}

#[cfg(test)]
mod tests {
    use super::*;
    use etherparse::PacketBuilder;

    fn build_tcp_packet(src_port: u16, dst_port: u16, payload: &[u8]) -> Vec<u8> {
        let builder = PacketBuilder::ethernet2([1; 6], [2; 6])
            .ipv4([10, 0, 0, 1], [10, 0, 0, 2], 64)
            .tcp(src_port, dst_port, 1000, 64)
            .psh()
            .ack(1);
        let mut out = Vec::with_capacity(builder.size(payload.len()));
        builder.write(&mut out, payload).unwrap();
        out
    }

    #[test]
    fn test_inbound_when_source_is_remote_port() {
        let packet = build_tcp_packet(800, 50123, b"data");
        let (direction, payload) = extract_tcp_payload(&packet, 800).unwrap();
        assert_eq!(direction, Direction::Inbound);
        assert_eq!(payload, b"data");
    }

    #[test]
    fn test_outbound_otherwise() {
        let packet = build_tcp_packet(50123, 800, b"cmd");
        let (direction, _) = extract_tcp_payload(&packet, 800).unwrap();
        assert_eq!(direction, Direction::Outbound);
    }

    #[test]
    fn test_empty_payload_ignored() {
        let packet = build_tcp_packet(800, 50123, b"");
        assert!(extract_tcp_payload(&packet, 800).is_none());
    }

    #[test]
    fn test_non_ethernet_garbage_ignored() {
        assert!(extract_tcp_payload(&[0u8; 10], 800).is_none());
    }
}
