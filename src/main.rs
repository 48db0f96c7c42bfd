use chrono::Local;
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use webqq_rust::types::events::{Event, EventHandler};
use webqq_rust::{Client, ClientConfig, ClientError, FileQrCodeDisplay};
use webqq_rust_ureq_http_client::UreqHttpClient;

// Logs in with a QR code and prints incoming messages.
//
// Usage:
//   cargo run                                   # QR code written to the temp dir
//   cargo run -- --qr-path ./code.png           # custom QR code location
//   cargo run -- --skip-roster                  # go straight to polling

#[derive(Parser, Debug)]
#[command(about = "WebQQ QR login and message poller")]
struct Args {
    /// Where to write the QR code image.
    #[arg(long)]
    qr_path: Option<PathBuf>,

    /// Delay between scan status checks, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    qr_interval_ms: u64,

    /// Minimum delay between two long-poll requests, in milliseconds.
    #[arg(long, default_value_t = 0)]
    poll_interval_ms: u64,

    /// Per-request timeout, in seconds.
    #[arg(long, default_value_t = 120)]
    timeout_secs: u64,

    /// Do not fetch buddy/group/discussion lists after login.
    #[arg(long)]
    skip_roster: bool,
}

struct LogEvents;

impl EventHandler for LogEvents {
    fn handle_event(&self, event: &Event) {
        match event {
            Event::LoggedIn { uin } => info!("Logged in as {uin}"),
            Event::RosterFetched => info!("Roster fetched"),
            _ => {}
        }
    }
}

fn main() {
    let args = Args::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            use std::io::Write;
            writeln!(
                buf,
                "{} [{:<5}] [{}] - {}",
                Local::now().format("%H:%M:%S"),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("Failed to build tokio runtime");

    run_to_completion(rt, async {
        let http_client = UreqHttpClient::with_timeout(Duration::from_secs(args.timeout_secs));
        let config = ClientConfig {
            qr_poll_interval: Duration::from_millis(args.qr_interval_ms),
            poll_min_interval: Duration::from_millis(args.poll_interval_ms),
            fetch_roster: !args.skip_roster,
            ..ClientConfig::default()
        };
        let display = match args.qr_path {
            Some(path) => FileQrCodeDisplay::new(path),
            None => FileQrCodeDisplay::in_temp_dir(),
        };

        let client = Client::new(Arc::new(http_client), config);
        client.add_event_handler(Arc::new(LogEvents));

        {
            let client = client.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    client.shutdown();
                }
            });
        }

        match client.run(&display).await {
            Ok(()) | Err(ClientError::Cancelled) => info!("Session closed."),
            Err(e) => error!("Session ended with error: {e}"),
        }
    });
}

/// Blocking transport calls abandoned by a shutdown may still be waiting on
/// the server's long-poll hold. They get this long before the process exits.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(1);

fn run_to_completion<F: Future>(rt: tokio::runtime::Runtime, fut: F) -> F::Output {
    let output = rt.block_on(fut);
    rt.shutdown_timeout(SHUTDOWN_GRACE);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn exit_does_not_wait_for_abandoned_blocking_calls() {
        let rt = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .unwrap();
        let started = Instant::now();

        let value = run_to_completion(rt, async {
            let stuck = tokio::task::spawn_blocking(|| std::thread::sleep(Duration::from_secs(30)));
            let _ = tokio::time::timeout(Duration::from_millis(50), stuck).await;
            7
        });

        assert_eq!(value, 7);
        assert!(started.elapsed() < Duration::from_secs(10));
    }
}
