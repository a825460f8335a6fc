//! コンソールフロントエンド
//!
//! REPL コマンドの解釈、復号済みメッセージの表示/フィルタ、
//! パケットログの保持とダンプを担当する。復号コアには一切手を入れず、
//! セッションのキューを定期的に drain するだけの消費側。

use std::fmt::Write as _;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{info, warn};

use rc4tap_frame::split_into_chunks;
use rc4tap_session::{leading_timestamp, SessionParams};

use crate::capture::{list_interfaces, Sniffer};

/// ダンプファイルの出力先ディレクトリ
pub const DUMP_DIRECTORY: &str = "dumps";

/// 表示ポンプの周期（ミリ秒）
pub const PUMP_TICK_MS: u64 = 10;

/// 1 行あたりの最大表示文字数（超過分は折り返す）
const MAX_LINE_CHARS: usize = 160;

const HELP_MSG: &str = "\
 rc4tap - passive decoder for the delimiter-framed RC4 protocol

 重要: ログイン前にスニフィングを開始すること。途中から観測すると
 ハンドシェイクを取り逃して RC4 状態が同期できない。
 パケットが標準出力へ流れている間も、そのまま次のコマンドを入力できる。

 interfaces|i
    マシン上のキャプチャインターフェースを一覧する。
 sniff [i|interface=<idx>] [p|port=<u16>] [cf|custom-filter=\"<bpf>\"]
    スニフィングを開始する。引数なしなら前回のパラメータを再利用。
    port の既定は 800（メインサーバー）、801 が代替サーバー。
 filter|f [<pattern> ...]
    受信メッセージの drop パターン（正規表現）を追加する。
    引数なしならパターンをすべてクリアする。
 pause|p / resume|r
    表示/ログの一時停止と再開。
 clear|cls
    画面をクリアする（内部のパケットログは消えない）。
 dump [<file name>]
    ダンプのオン/オフを切り替える。終了時に dumps/ へ書き出す。
 exit|quit|q
    終了する。dump が有効なら書き出してから終了。
 h|help
    このメッセージを表示する。";

/// コンソールアプリケーション状態
///
/// スニファ本体とは別に、表示側の状態（フィルタ・一時停止・ダンプ・
/// 先頭タイムスタンプ用のフラグ）だけを持つ。
pub struct App {
    /// 稼働中のスニファ（未開始なら None）
    sniffer: Option<Sniffer>,
    /// 受信メッセージの drop パターン（1 つでも一致したら表示しない）
    drop_filters: Vec<Regex>,
    /// 表示/ログの一時停止フラグ
    paused: bool,
    /// ダンプ有効フラグ
    dump_enabled: bool,
    /// ダンプファイル名
    dump_filename: String,
    /// 終了時ダンプ用のパケットログ
    packet_logs: Vec<String>,
    /// 次の送信メッセージが（再）スタート後の最初の 1 通か
    first_sent_pending: bool,
    /// 表示済みの再同期回数（スニファ側カウンタとの差分検出用）
    seen_resyncs: u64,
    /// アプリ全体の稼働フラグ（REPL とポンプで共有）
    running: Arc<AtomicBool>,
}

impl App {
    pub fn new() -> Self {
        App {
            sniffer: None,
            // 既定ではチャット等の高頻度パケットを落とす
            // （元実装は negative lookahead の keep フィルタだったが、
            //   regex クレートに lookahead がないため drop パターンで表現）
            drop_filters: vec![
                Regex::new(r"^w\|\.").unwrap(),
                Regex::new(r"^=\|\.").unwrap(),
            ],
            paused: false,
            dump_enabled: false,
            dump_filename: String::new(),
            packet_logs: Vec::new(),
            first_sent_pending: true,
            seen_resyncs: 0,
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    pub fn running_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.running)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Relaxed)
    }

    pub fn print_help(&self) {
        println!("{}", HELP_MSG);
    }

    /// セッションキューを 1 回ぶん drain して表示する
    ///
    /// ポンプスレッドから周期的に呼ばれる。pause 中は何もしない
    /// （drain しないのでメッセージは失われず、resume 後に流れる）。
    pub fn pump_once(&mut self) {
        if self.paused {
            return;
        }
        let Some(sniffer) = &self.sniffer else {
            return;
        };

        // 再同期があれば次の送信メッセージを「最初の 1 通」扱いに戻す
        let resyncs = sniffer.resync_count();
        if resyncs > self.seen_resyncs {
            self.seen_resyncs = resyncs;
            self.first_sent_pending = true;
            info!("connection cycled, waiting for a fresh handshake");
        }

        let (sent, received) = {
            let mut session = sniffer.session().lock().expect("session mutex poisoned");
            (session.drain_sent(), session.drain_received())
        };

        for message in sent {
            let mut line = String::from("[>] ");
            let mut payload = message;
            if self.first_sent_pending {
                self.first_sent_pending = false;
                if let Some((ts, rest)) = leading_timestamp(&payload) {
                    let _ = write!(line, "[{}] ", ts);
                    payload = rest;
                }
            }
            line.push_str(&payload);
            print_wrapped(&line);
            self.packet_logs.push(line);
        }

        for message in received {
            if self.drop_filters.iter().any(|re| re.is_match(&message)) {
                continue;
            }
            print_wrapped(&message);
            self.packet_logs.push(message);
        }
    }

    /// REPL コマンド 1 行を処理する
    pub fn process_command(&mut self, command: &str) {
        let args = split_args(command);
        let Some(head) = args.first() else {
            return;
        };

        match head.to_lowercase().as_str() {
            "exit" | "quit" | "q" => self.quit(),
            "help" | "h" => {
                println!();
                self.print_help();
            }
            "interfaces" | "i" => self.cmd_interfaces(),
            "sniff" => self.cmd_sniff(&args[1..]),
            "filter" | "f" => self.cmd_filter(&args[1..]),
            "pause" | "p" => {
                if self.sniffer.is_some() {
                    self.paused = true;
                }
            }
            "resume" | "r" => self.paused = false,
            "clear" | "cls" => clear_screen(),
            "dump" => self.cmd_dump(&args[1..]),
            other => println!("unknown command: {} (try `help`)", other),
        }
    }

    fn cmd_interfaces(&self) {
        println!();
        println!("Interfaces:");
        match list_interfaces() {
            Ok(interfaces) => {
                for (idx, name) in interfaces.iter().enumerate() {
                    println!("[{}]: {}", idx, name);
                }
            }
            Err(e) => warn!(error = %e, "could not enumerate interfaces"),
        }
    }

    fn cmd_sniff(&mut self, args: &[String]) {
        let mut params = match &self.sniffer {
            Some(sniffer) => sniffer.params().clone(),
            None => SessionParams::default(),
        };
        let mut have_device = self.sniffer.is_some();

        for raw_arg in args {
            let arg = raw_arg.replace(['"', '\''], "");
            if let Some((key, value)) = arg.split_once('=') {
                match key.to_lowercase().as_str() {
                    "p" | "port" => match value.parse() {
                        Ok(port) => params.remote_port = port,
                        Err(_) => println!("unexpected port provided: {}", value),
                    },
                    "i" | "interface" => match value.parse() {
                        Ok(idx) => {
                            params.device_index = idx;
                            have_device = true;
                        }
                        Err(_) => println!("unexpected interface index provided: {}", value),
                    },
                    "cf" | "custom-filter" => params.custom_filter = Some(value.to_string()),
                    _ => {}
                }
            } else if let Ok(idx) = arg.parse() {
                params.device_index = idx;
                have_device = true;
            } else {
                println!("unexpected interface index provided: {}", arg);
            }
        }

        if !have_device {
            println!("no interface selected; run `interfaces` and `sniff i=<idx>`");
            return;
        }

        clear_screen();
        println!(
            "Starting sniffing port: {}, interface idx: {}...",
            params.remote_port, params.device_index
        );
        self.start_sniffer(params);
    }

    /// スニファを張り替える（セッション・ログ・先頭タイムスタンプ状態も仕切り直し）
    fn start_sniffer(&mut self, params: SessionParams) {
        // 旧スニファは Drop で停止する
        self.sniffer = None;
        self.first_sent_pending = true;
        self.seen_resyncs = 0;
        self.packet_logs.clear();

        match Sniffer::start(params) {
            Ok(sniffer) => self.sniffer = Some(sniffer),
            Err(e) => warn!(error = %e, "failed to start sniffing"),
        }
    }

    fn cmd_filter(&mut self, args: &[String]) {
        if args.is_empty() {
            self.drop_filters.clear();
            return;
        }
        for raw_arg in args {
            let pattern = raw_arg.replace(['"', '\''], "");
            match Regex::new(&pattern) {
                Ok(re) => self.drop_filters.push(re),
                Err(e) => println!("invalid filter pattern {:?}: {}", pattern, e),
            }
        }
    }

    fn cmd_dump(&mut self, args: &[String]) {
        self.dump_enabled = !self.dump_enabled;
        if !self.dump_enabled {
            self.dump_filename.clear();
            return;
        }
        self.dump_filename = match args.first() {
            Some(name) => name.clone(),
            None => {
                let now = SystemTime::now()
                    .duration_since(UNIX_EPOCH)
                    .map(|d| d.as_secs())
                    .unwrap_or(0);
                format!("packets_{}.txt", now)
            }
        };
        println!("dump enabled -> {}/{}", DUMP_DIRECTORY, self.dump_filename);
    }

    /// 終了処理: 必要ならダンプを書き出し、稼働フラグを下ろす
    pub fn quit(&mut self) {
        if self.dump_enabled && !self.packet_logs.is_empty() {
            if let Err(e) = self.write_dump() {
                warn!(error = %e, "failed to write packet dump");
            }
        }
        self.sniffer = None;
        self.running.store(false, Ordering::Relaxed);
    }

    fn write_dump(&self) -> Result<()> {
        let dir = Path::new(DUMP_DIRECTORY);
        if !dir.exists() {
            std::fs::create_dir_all(dir).context("failed to create dump directory")?;
        }
        let path = dir.join(&self.dump_filename);
        std::fs::write(&path, self.packet_logs.join("\n"))
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(path = %path.display(), lines = self.packet_logs.len(), "packet dump written");
        Ok(())
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

/// 画面クリア（ANSI エスケープ）
fn clear_screen() {
    print!("\x1b[2J\x1b[H");
}

/// 長いメッセージを固定幅で折り返して表示する
fn print_wrapped(message: &str) {
    match split_into_chunks(message, MAX_LINE_CHARS) {
        Ok(chunks) if chunks.len() > 1 => {
            for chunk in chunks {
                println!("{}", chunk);
            }
        }
        _ => println!("{}", message),
    }
}

/// コマンド行を引数列へ分割する
///
/// ダブルクォートで囲まれた区間は空白を含めて 1 引数として扱い、
/// クォート自体は取り除く。空要素は捨てる。
pub fn split_args(command: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;

    for ch in command.chars() {
        match ch {
            '"' => in_quote = !in_quote,
            ' ' if !in_quote => {
                if !current.trim().is_empty() {
                    args.push(core::mem::take(&mut current));
                } else {
                    current.clear();
                }
            }
            _ => current.push(ch),
        }
    }
    if !current.trim().is_empty() {
        args.push(current);
    }
    args
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_args_plain() {
        assert_eq!(split_args("sniff i=3 port=801"), vec!["sniff", "i=3", "port=801"]);
    }

    #[test]
    fn test_split_args_quoted_section_kept_together() {
        assert_eq!(
            split_args(r#"sniff i=0 cf="tcp port 800 and host 10.0.0.1""#),
            vec!["sniff", "i=0", "cf=tcp port 800 and host 10.0.0.1"]
        );
    }

    #[test]
    fn test_split_args_collapses_blank_runs() {
        assert_eq!(split_args("  f   ^w  "), vec!["f", "^w"]);
        assert!(split_args("").is_empty());
        assert!(split_args("   ").is_empty());
    }

    #[test]
    fn test_default_drop_filters_match_chat_packets() {
        let app = App::new();
        assert!(app.drop_filters.iter().any(|re| re.is_match("w|.chat line")));
        assert!(app.drop_filters.iter().any(|re| re.is_match("=|.position")));
        assert!(!app.drop_filters.iter().any(|re| re.is_match("login ok")));
    }

    #[test]
    fn test_filter_command_add_and_clear() {
        let mut app = App::new();
        app.cmd_filter(&["^x".to_string()]);
        assert_eq!(app.drop_filters.len(), 3);
        app.cmd_filter(&[]);
        assert!(app.drop_filters.is_empty());
    }

    #[test]
    fn test_dump_command_toggles() {
        let mut app = App::new();
        app.cmd_dump(&["session.txt".to_string()]);
        assert!(app.dump_enabled);
        assert_eq!(app.dump_filename, "session.txt");
        app.cmd_dump(&[]);
        assert!(!app.dump_enabled);
        assert!(app.dump_filename.is_empty());
    }
}
