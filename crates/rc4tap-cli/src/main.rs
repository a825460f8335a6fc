//! rc4tap エントリポイント
//!
//! コマンドライン引数の解釈とスレッドの配線だけを行う。
//! 標準入力の REPL をメインスレッドで回し、復号済みメッセージの
//! 表示は別スレッドの固定周期ポンプに任せる。

use std::io::{self, BufRead, Write};
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use rc4tap_session::{SessionParams, DEFAULT_REMOTE_PORT};

mod capture;
mod console;

use console::{App, PUMP_TICK_MS};

#[derive(Parser, Debug)]
#[command(name = "rc4tap", version, about = "受動観測による RC4 フレームドプロトコルの復号コンソール")]
struct Cli {
    /// 起動と同時にスニフィングを開始するインターフェースのインデックス
    #[arg(short, long)]
    interface: Option<usize>,

    /// リモート（サーバー）側 TCP ポート
    #[arg(short, long, default_value_t = DEFAULT_REMOTE_PORT)]
    port: u16,

    /// 既定の `tcp port N` の代わりに使う BPF フィルタ
    #[arg(long)]
    filter: Option<String>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let app = Arc::new(Mutex::new(App::new()));
    let running = app.lock().expect("app mutex poisoned").running_flag();

    // 引数でインターフェースが与えられたら即スニフィング開始
    if let Some(device_index) = cli.interface {
        let params = SessionParams {
            remote_port: cli.port,
            device_index,
            custom_filter: cli.filter.clone(),
        };
        app.lock()
            .expect("app mutex poisoned")
            .process_command(&sniff_command(&params));
    } else {
        app.lock().expect("app mutex poisoned").print_help();
    }

    // 表示ポンプ: セッションキューを固定周期で drain する
    let pump = {
        let app = Arc::clone(&app);
        let running = Arc::clone(&running);
        std::thread::Builder::new()
            .name("rc4tap-pump".into())
            .spawn(move || {
                while running.load(Ordering::Relaxed) {
                    app.lock().expect("app mutex poisoned").pump_once();
                    std::thread::sleep(Duration::from_millis(PUMP_TICK_MS));
                }
            })?
    };

    // REPL: メインスレッドで標準入力を読む
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        {
            let mut app = app.lock().expect("app mutex poisoned");
            app.process_command(&line);
            if !app.is_running() {
                break;
            }
        }
        print!("> ");
        let _ = io::stdout().flush();
    }

    // EOF で抜けた場合も終了処理（ダンプ書き出し）を通す
    {
        let mut app = app.lock().expect("app mutex poisoned");
        if app.is_running() {
            app.quit();
        }
    }
    let _ = pump.join();
    Ok(())
}

/// CLI 引数を sniff コマンド行へ写す（REPL と同じ経路で起動するため）
fn sniff_command(params: &SessionParams) -> String {
    let mut command = format!("sniff i={} p={}", params.device_index, params.remote_port);
    if let Some(filter) = &params.custom_filter {
        command.push_str(&format!(" cf=\"{}\"", filter));
    }
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_command_round_trip() {
        let params = SessionParams {
            remote_port: 801,
            device_index: 2,
            custom_filter: None,
        };
        assert_eq!(sniff_command(&params), "sniff i=2 p=801");

        let with_filter = SessionParams {
            custom_filter: Some("tcp port 800 and host 10.0.0.1".into()),
            ..params
        };
        assert_eq!(
            sniff_command(&with_filter),
            "sniff i=2 p=801 cf=\"tcp port 800 and host 10.0.0.1\""
        );
    }
}
