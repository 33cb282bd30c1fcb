//! tlsconf CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tlsconf_config::{load_tls_config_file, TlsConfigFile};
use tlsconf_tls::config::referenced_files;
use tlsconf_tls::ResolvedTlsConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "tlsconf")]
#[command(about = "Load and check TLS configuration files", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load a TLS config file and report what it resolves to
    Check {
        /// Path to the TLS config file (.yml or .json)
        config: PathBuf,

        /// Also build a rustls client config
        #[arg(long)]
        client: bool,

        /// Also build a rustls server config
        #[arg(long)]
        server: bool,

        /// Log level (trace, debug, info, warn, error)
        #[arg(short, long, default_value = "info", env = "TLSCONF_LOG")]
        log_level: String,
    },

    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            config,
            client,
            server,
            log_level,
        } => {
            init_tracing(&log_level)?;

            tracing::info!("Checking TLS config: {}", config.display());

            let loaded = load_tls_config_file(&config).and_then(|file| {
                let resolved = ResolvedTlsConfig::from_validated(&file)?;
                Ok((file, resolved))
            });
            let (file, resolved) = match loaded {
                Ok(loaded) => loaded,
                Err(e) => {
                    tracing::error!("✗ TLS config is invalid: {}", e);
                    std::process::exit(1);
                }
            };

            report(&file, &resolved);

            if client {
                resolved
                    .client_config()
                    .context("failed to build client config")?;
                tracing::info!("✓ Client config built");
            }
            if server {
                resolved
                    .server_config()
                    .context("failed to build server config")?;
                tracing::info!("✓ Server config built");
            }

            Ok(())
        }

        Commands::Version => {
            println!("tlsconf");
            println!("Version: {}", env!("CARGO_PKG_VERSION"));
            println!("Rust version: {}", env!("CARGO_PKG_RUST_VERSION"));
            Ok(())
        }
    }
}

fn report(file: &TlsConfigFile, resolved: &ResolvedTlsConfig) {
    tracing::info!("✓ TLS config is valid");
    if resolved.is_default() {
        tracing::info!("  No settings forced, library defaults apply");
        return;
    }

    tracing::info!("  Skip verify: {}", resolved.insecure_skip_verify);
    if let Some(min) = resolved.min_version {
        tracing::info!("  Min version: {} (0x{:04x})", min, min.code());
    }
    if let Some(max) = resolved.max_version {
        tracing::info!("  Max version: {} (0x{:04x})", max, max.code());
    }
    if let Some(name) = &resolved.server_name {
        tracing::info!("  Server name: {}", name);
    }
    if let Some(identity) = &resolved.identity {
        tracing::info!("  Certificates: {}", identity.cert_chain().len());
    }
    if let Some(pool) = &resolved.ca_pool {
        tracing::info!("  CA certificates: {}", pool.certificates().len());
    }

    for referenced in referenced_files(file) {
        tracing::info!("  Reads: {}", referenced.display());
    }
}

fn init_tracing(level: &str) -> Result<()> {
    let filter = match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_level(true),
        )
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(filter.into())
                .add_directive("rustls=warn".parse()?),
        )
        .init();

    Ok(())
}
