// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Agent console binary entry point.

use clap::Parser;

use agent_console::app;
use agent_console::cli::Cli;
use agent_console::diagnostic::print_error;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Err(e) = app::run(cli).await {
        print_error(e);
        std::process::exit(1);
    }
    Ok(())
}
