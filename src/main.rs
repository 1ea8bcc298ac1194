mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use tracing::debug;

use cli::{Cli, Commands, ConfigCommands, OutputFormat};
use docker_probe::core::{run_check, DockerManager, HostDescriptor, HostResolver, HostSource};
use docker_probe::logging;
use docker_probe::utils::AppConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A .env in the working directory may carry DOCKER_HOST or RUST_LOG; real env vars win
    let dotenv_file = dotenv::dotenv();
    logging::init(cli.verbose)?;

    if let Ok(path) = dotenv_file {
        debug!("Loaded environment from {}", path.display());
    }

    match cli.command {
        None | Some(Commands::Check) => {
            handle_check(cli.host, cli.timeout, cli.format).await?;
        }
        Some(Commands::Host) => {
            handle_host(cli.host)?;
        }
        Some(Commands::Config { command }) => {
            handle_config(command)?;
        }
    }

    Ok(())
}

fn resolve_host(flag_host: Option<String>, config: &AppConfig) -> Result<(HostDescriptor, HostSource)> {
    let resolver = HostResolver::from_env(flag_host, config);
    let (host, source) = resolver
        .resolve()
        .context("Failed to resolve Docker host")?;
    debug!(source = %source, "Resolved Docker host {}", host);
    Ok((host, source))
}

async fn handle_check(flag_host: Option<String>, timeout: Option<u64>, format: OutputFormat) -> Result<()> {
    let config = AppConfig::load_or_default();
    let (host, _source) = resolve_host(flag_host, &config)?;
    let timeout = timeout.unwrap_or_else(|| config.timeout());

    let docker = DockerManager::connect(&host, timeout)?;
    let report = run_check(&docker, &host).await?;

    if format == OutputFormat::Json {
        let json = serde_json::to_string_pretty(&report)
            .context("Failed to serialize check report")?;
        println!("{}", json);
    }

    Ok(())
}

fn handle_host(flag_host: Option<String>) -> Result<()> {
    let config = AppConfig::load_or_default();
    let (host, source) = resolve_host(flag_host, &config)?;

    println!("{} {}", "Docker host:".bold(), host);
    println!("{} {}", "Source:".bold(), source);
    if let Some(tls) = &host.tls {
        println!("{} {}", "TLS key:".bold(), tls.key.display());
        println!("{} {}", "TLS cert:".bold(), tls.cert.display());
        println!("{} {}", "TLS CA:".bold(), tls.ca.display());
    }

    Ok(())
}

fn handle_config(command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let path = AppConfig::config_path()?;
            let config = AppConfig::load_from(&path)?;

            println!("Configuration ({}):\n", path.display());
            println!(
                "docker_host: {}",
                config.docker_host.as_deref().unwrap_or("<not set>")
            );
            println!("timeout_secs: {}", config.timeout());
        }
        ConfigCommands::SetHost { host } => {
            // Reject bad values before they are persisted
            HostDescriptor::parse(&host, false, None)
                .with_context(|| format!("Invalid Docker host '{}'", host))?;

            let mut config = AppConfig::load()?;
            config.docker_host = Some(host.clone());
            let path = config.save()?;
            println!("{} docker_host set to {} in {}", "✓".green(), host, path.display());
        }
        ConfigCommands::SetTimeout { seconds } => {
            let mut config = AppConfig::load()?;
            config.timeout_secs = Some(seconds);
            let path = config.save()?;
            println!("{} timeout_secs set to {} in {}", "✓".green(), seconds, path.display());
        }
    }

    Ok(())
}
