use std::io::{self, BufRead, Write};

use anyhow::Context;
use facultyd::config::{Config, DEFAULT_LOG_FILTER};
use facultyd::desk::Desk;
use facultyd::ipc;
use tracing_subscriber::EnvFilter;

fn init_tracing(cfg: &Config) {
    let filter = cfg
        .log_filter
        .as_deref()
        .and_then(|f| EnvFilter::try_new(f).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER));

    // stdout carries the protocol.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cfg = Config::from_env().context("failed to read configuration")?;
    init_tracing(&cfg);

    let today = chrono::Local::now().date_naive();
    let desk = Desk::from_config(&cfg, today);
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        seed = cfg.seed,
        sample_data = cfg.sample_data,
        students = desk.students.len(),
        "facultyd ready"
    );
    let mut state = ipc::AppState::new(cfg, desk);

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(e) => {
                tracing::error!(error = %e, "stdin closed");
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // No id to echo back.
                tracing::warn!(error = %e, "bad request line");
                let resp = ipc::err("", "bad_json", e.to_string(), None);
                writeln!(stdout, "{}", resp).context("write response")?;
                stdout.flush().context("flush response")?;
                continue;
            }
        };

        let resp = ipc::handle_request(&mut state, req);
        writeln!(stdout, "{}", resp).context("write response")?;
        stdout.flush().context("flush response")?;
    }

    tracing::info!("stdin closed; exiting");
    Ok(())
}
