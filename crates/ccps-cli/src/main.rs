//! CCPS command-line binary.
//!
//! # Usage
//!
//! ```bash
//! # Encode with a literal protocol
//! ccps encode 'p3m2/12345'
//!
//! # Save a protocol, then use it by name
//! ccps protocols add 'base32/p3m2'
//! ccps decode '#base32/54768'
//!
//! # Check that a protocol inverts on some text
//! ccps verify 'w3p2/Привет'
//! ```

use std::{
    io::{self, Write},
    process::ExitCode,
};

use ccps_cli::{Cli, run};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = cli.config();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(io::stderr)).with(filter).init();

    let mut stdout = io::stdout().lock();
    match run(&config, &cli.command, &mut stdout).and_then(|()| Ok(stdout.flush()?)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(?err, "command failed");
            // nothing useful to do if stderr itself is gone
            let _ = writeln!(io::stderr().lock(), "error: {err}");
            ExitCode::FAILURE
        },
    }
}
