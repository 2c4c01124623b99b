// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// zonewerk — Wide Area Bonjour zone generator for CUPS shared printers.
//
// Entry point. Parses arguments, initialises logging on stderr, prompts for
// a password when a user is given, and writes the zone fragment to stdout.

mod cli;

use std::io;
use std::process::ExitCode;

use clap::Parser;
use dialoguer::Password;

use zonewerk_core::error::{Result, ZoneError};
use zonewerk_core::human_errors::humanize_error;
use zonewerk_print::{Credentials, CupsClient};
use zonewerk_zone::ZoneGenerator;

use cli::Args;

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(args.log_filter())),
        )
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let human = humanize_error(&e);
            tracing::debug!(error = ?e, "zone generation failed");
            eprintln!("error: {e}");
            eprintln!("  {}", human.message);
            eprintln!("  hint: {}", human.suggestion);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<()> {
    let config = args.config().split_host_port()?;
    config.validate()?;

    let credentials = match &config.user {
        Some(user) => Some(prompt_credentials(user, config.server_host())?),
        None => None,
    };

    if config.admin_url {
        tracing::debug!("--admin given; adminurl is always published");
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let client = CupsClient::new(&config, credentials)?;
        tracing::info!(server = %client.base(), "querying CUPS");

        let generator = ZoneGenerator::new(client, config);
        let stdout = io::stdout();
        let mut out = stdout.lock();
        generator.run(&mut out).await?;
        Ok::<(), ZoneError>(())
    })
}

fn prompt_credentials(user: &str, host: &str) -> Result<Credentials> {
    let password = Password::new()
        .with_prompt(format!("Password for {user} on {host}"))
        .allow_empty_password(true)
        .interact()
        .map_err(|e| ZoneError::Authentication(format!("password prompt: {e}")))?;

    Ok(Credentials {
        username: user.to_string(),
        password,
    })
}
