// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2025 Blackman Artificial Intelligence Technologies Inc.

//! sscmhist - file history from a Surround SCM server
//!
//! Entry point for the sscmhist CLI application.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing::Level;
use tracing_subscriber::EnvFilter;

use sscmhist::app;
use sscmhist::cli::Cli;

/// Per-target directives enabled by `-v` (debug) and `-vv` (trace).
const LOG_TARGETS: [&str; 3] = ["sscmhist.app", "sscmhist.session", "sscmhist.sscm"];

/// Log filter from `RUST_LOG` (WARN when unset, empty or invalid) plus `-v` targets.
fn build_env_filter(verbose: u8, rust_log: Option<&str>) -> EnvFilter {
    let mut env_filter = rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(Level::WARN.as_str()));

    if verbose > 0 {
        let level = if verbose > 1 { "trace" } else { "debug" };
        for target in LOG_TARGETS {
            if let Ok(parsed) = format!("{}={}", target, level).parse() {
                env_filter = env_filter.add_directive(parsed);
            }
        }
    }
    env_filter
}

fn init_tracing(verbose: u8) {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    // Logs go to stderr; stdout carries only history or the failure line.
    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(verbose, rust_log.as_deref()))
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut client = cli.client();
    let request = cli.into_request();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    ExitCode::from(app::execute(&mut client, request, &mut out))
}
