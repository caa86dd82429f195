use std::io::{self, BufRead, Write};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use health_cli::{execute, Args};
use health_core::{HealthClient, Session, UreqTransport};
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

fn main() {
    let args = Args::parse();
    init_logging(&args);

    if let Err(e) = run(&args) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins over `-v` when set.
fn init_logging(args: &Args) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));
    fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn run(args: &Args) -> Result<()> {
    debug!(url = %args.url, timeout = args.timeout, "starting");
    let session = Session::new(
        HealthClient::new(&args.url),
        UreqTransport::new(Duration::from_secs(args.timeout)),
    );
    let output = execute(&session, args.username.as_deref(), &args.command, confirm_delete)?;
    println!("{output}");
    Ok(())
}

/// Interactive y/N prompt on stderr. Anything but "y"/"yes" declines.
fn confirm_delete(_id: i64) -> bool {
    match ask("Are you sure you want to delete this record? [y/N] ") {
        Ok(answer) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
        Err(e) => {
            debug!(error = %e, "confirmation prompt failed");
            false
        }
    }
}

fn ask(prompt: &str) -> Result<String> {
    let mut stderr = io::stderr();
    stderr.write_all(prompt.as_bytes()).context("writing prompt")?;
    stderr.flush().context("flushing prompt")?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer).context("reading answer")?;
    Ok(answer)
}
