// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Argument definitions for the turf CLI.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// turf: inspect and drain an offline sync queue
#[derive(Parser, Debug)]
#[command(name = "turf")]
#[command(about = "Inspect and drain a turf offline sync queue")]
pub struct Cli {
    /// Path to the queue file
    #[arg(long, global = true, default_value = "sync_queue.jsonl")]
    pub queue: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List queued actions
    Pending,

    /// Print the number of queued actions
    Count,

    /// Run one sync pass against a remote mutation service
    Drain {
        /// WebSocket URL of the remote mutation service
        #[arg(long)]
        url: String,

        /// Principal id to attribute lead mutations to
        #[arg(long)]
        session: Option<String>,

        /// Maximum connection attempts before giving up
        #[arg(long, default_value_t = 10)]
        retries: u32,
    },
}
