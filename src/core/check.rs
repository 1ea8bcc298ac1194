/// Docker availability check
///
/// Pings the daemon and, only when it answers, reports its version and
/// system info. A failed ping is a warning, not an error.

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::core::docker::{DockerApi, PingOutcome};
use crate::core::env::HostDescriptor;

pub const UNAVAILABLE_MESSAGE: &str = "Docker Engine not available (ping failed).";

/// One reported step, in the order it happened
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CheckEvent {
    Host { host: String },
    Ping(PingOutcome),
    Version { content: Value },
    Info { content: Value },
    Unavailable { message: String },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckReport {
    pub host: String,
    pub available: bool,
    pub events: Vec<CheckEvent>,
}

impl CheckReport {
    fn new(host: &HostDescriptor) -> Self {
        Self {
            host: host.to_string(),
            available: false,
            events: Vec::new(),
        }
    }

    /// Log the event and keep it
    fn record(&mut self, event: CheckEvent) {
        match &event {
            CheckEvent::Host { host } => info!(host = %host, "Docker Host: {}", host),
            CheckEvent::Ping(outcome) => info!(
                success = outcome.success,
                "Docker Ping: {}",
                outcome.status
            ),
            CheckEvent::Version { content } => info!("Docker Version: {}", content),
            CheckEvent::Info { content } => info!("Docker Info: {}", content),
            CheckEvent::Unavailable { message } => warn!("{}", message),
        }
        self.events.push(event);
    }
}

/// Run the availability check against `docker`.
///
/// Errors only come from version/info after a successful ping; an
/// unreachable daemon yields `Ok` with `available == false`.
pub async fn run_check<D>(docker: &D, host: &HostDescriptor) -> Result<CheckReport>
where
    D: DockerApi + ?Sized,
{
    let mut report = CheckReport::new(host);
    report.record(CheckEvent::Host {
        host: report.host.clone(),
    });

    let ping = docker.ping().await;
    let available = ping.success;
    report.record(CheckEvent::Ping(ping));

    if !available {
        report.record(CheckEvent::Unavailable {
            message: UNAVAILABLE_MESSAGE.to_string(),
        });
        return Ok(report);
    }

    let version = docker.version().await?;
    let content = serde_json::to_value(&version).context("Failed to serialize Docker version")?;
    report.record(CheckEvent::Version { content });

    let system_info = docker.info().await?;
    let content = serde_json::to_value(&system_info).context("Failed to serialize Docker info")?;
    report.record(CheckEvent::Info { content });

    report.available = true;
    Ok(report)
}
