// Copyright (c) 2025 Erick Bourgeois, firestoned
// SPDX-License-Identifier: MIT

//! `constellix-dns01` command line.
//!
//! Designed to be used as Certbot manual hooks:
//!
//! ```text
//! certbot certonly --manual --preferred-challenges dns \
//!   --manual-auth-hook "constellix-dns01 --credentials /etc/letsencrypt/constellix.ini perform" \
//!   --manual-cleanup-hook "constellix-dns01 --credentials /etc/letsencrypt/constellix.ini cleanup" \
//!   -d example.com
//! ```
//!
//! The domain and token are read from `CERTBOT_DOMAIN` and `CERTBOT_VALIDATION`
//! unless given on the command line.

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use constellix_dns01::authenticator::{lookup_plugin, Authenticator, Challenge, PLUGIN_REGISTRY};
use constellix_dns01::config::{AuthenticatorConfig, Credentials};
use constellix_dns01::constants::{
    DEFAULT_CHALLENGE_TTL_SECS, DEFAULT_PROPAGATION_SECS, PLUGIN_NAME,
};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, error, info};

#[derive(Debug, Parser)]
#[command(name = "constellix-dns01", version, about = "Constellix DNS authenticator for ACME dns-01 challenges")]
struct Cli {
    /// Constellix credentials INI file
    #[arg(long, global = true, env = "CONSTELLIX_CREDENTIALS")]
    credentials: Option<PathBuf>,

    /// TTL of the challenge TXT record in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_CHALLENGE_TTL_SECS)]
    ttl: u32,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, clap::Args)]
struct ChallengeArgs {
    /// Domain being validated
    #[arg(long, env = "CERTBOT_DOMAIN")]
    domain: String,

    /// Validation token to publish
    #[arg(long, env = "CERTBOT_VALIDATION")]
    validation: String,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Publish the challenge TXT record
    Perform {
        #[command(flatten)]
        challenge: ChallengeArgs,

        /// Seconds to wait for DNS propagation after publishing
        #[arg(long, default_value_t = DEFAULT_PROPAGATION_SECS)]
        propagation_seconds: u64,
    },
    /// Remove the challenge TXT record
    Cleanup {
        #[command(flatten)]
        challenge: ChallengeArgs,
    },
    /// List the registered authenticators
    Plugins,
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async_main())
}

fn init_logging() {
    // Respects RUST_LOG (default: info) and RUST_LOG_FORMAT=json
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let log_format = std::env::var("RUST_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    match log_format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .with_writer(std::io::stderr)
                .json()
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter)
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .with_writer(std::io::stderr)
                .compact()
                .init();
        }
    }
}

fn build_authenticator(cli: &Cli) -> Result<Authenticator> {
    let path = cli
        .credentials
        .as_ref()
        .context("--credentials (or CONSTELLIX_CREDENTIALS) is required")?;
    let credentials = Credentials::from_file(path)?;

    let entry = lookup_plugin(PLUGIN_NAME).context("authenticator is not registered")?;
    Ok(entry.create(AuthenticatorConfig::new(credentials).with_ttl(cli.ttl)))
}

async fn async_main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    debug!(command = ?cli.command, "Parsed command line");

    match &cli.command {
        Commands::Perform {
            challenge,
            propagation_seconds,
        } => {
            let authenticator = build_authenticator(&cli)?;
            let challenges = [Challenge::new(&challenge.domain, &challenge.validation)];

            authenticator
                .perform(&challenges)
                .await
                .with_context(|| format!("Failed to publish challenge for {}", challenge.domain))?;

            if *propagation_seconds > 0 {
                info!(seconds = propagation_seconds, "Waiting for DNS propagation");
                tokio::time::sleep(Duration::from_secs(*propagation_seconds)).await;
            }
        }
        Commands::Cleanup { challenge } => {
            let authenticator = build_authenticator(&cli)?;
            let challenges = [Challenge::new(&challenge.domain, &challenge.validation)];

            if let Err(e) = authenticator.cleanup(&challenges).await {
                error!(domain = %challenge.domain, error = %e, "Cleanup failed");
                return Err(e).context("Failed to clean up challenge");
            }
        }
        Commands::Plugins => {
            for entry in PLUGIN_REGISTRY {
                println!("{}: {}", entry.name, entry.description);
                println!("    {}", entry.more_info);
            }
        }
        Commands::Completions { shell } => {
            clap_complete::generate(
                *shell,
                &mut Cli::command(),
                "constellix-dns01",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}
