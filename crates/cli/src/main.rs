// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! turf: operator CLI for the offline sync queue.
//!
//! Inspects and drains the queue file a turf client leaves on disk. The
//! heavy lifting lives in turf-sync; this binary only wires a store, a
//! probe, and a remote client together for one-shot invocations.

mod args;
mod commands;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use args::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let result = match cli.command {
        Command::Pending => commands::pending(&cli.queue),
        Command::Count => commands::count(&cli.queue),
        Command::Drain {
            url,
            session,
            retries,
        } => commands::drain(&cli.queue, &url, session.as_deref(), retries).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
