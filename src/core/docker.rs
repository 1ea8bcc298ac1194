/// Docker Engine integration
///
/// Thin wrapper over bollard exposing the three read-only calls the
/// availability check needs: ping, version and info.

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use bollard::models::SystemInfo;
use bollard::system::Version;
use bollard::{Docker, API_DEFAULT_VERSION};
use serde::Serialize;

use crate::core::env::{HostDescriptor, Protocol};

/// Result of a liveness probe
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PingOutcome {
    pub success: bool,
    /// Reply body on success ("OK"), error message on failure
    pub status: String,
}

impl PingOutcome {
    pub fn ok(status: impl Into<String>) -> Self {
        Self {
            success: true,
            status: status.into(),
        }
    }

    pub fn failed(status: impl Into<String>) -> Self {
        Self {
            success: false,
            status: status.into(),
        }
    }
}

/// Read-only daemon operations used by the availability check
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DockerApi: Send + Sync {
    /// Never errors: transport faults and non-2xx replies come back as a failed outcome
    async fn ping(&self) -> PingOutcome;

    async fn version(&self) -> Result<Version>;

    async fn info(&self) -> Result<SystemInfo>;
}

#[derive(Clone)]
enum Connection {
    Ready(Docker),
    /// The endpoint is known to be absent (e.g. no socket file); every call fails
    Unreachable(String),
}

#[derive(Clone)]
pub struct DockerManager {
    connection: Connection,
    host: HostDescriptor,
}

impl DockerManager {
    /// Build a client bound to the given host. No request is sent yet.
    pub fn connect(host: &HostDescriptor, timeout_secs: u64) -> Result<Self> {
        let connection = match host.protocol {
            Protocol::Unix => {
                if std::path::Path::new(&host.address).exists() {
                    Connection::Ready(connect_unix(&host.address, timeout_secs)?)
                } else {
                    Connection::Unreachable(format!("Docker socket not found at {}", host.address))
                }
            }
            Protocol::NamedPipe => Connection::Ready(connect_named_pipe(&host.address, timeout_secs)?),
            Protocol::Http => Connection::Ready(
                Docker::connect_with_http(&host.to_string(), timeout_secs, API_DEFAULT_VERSION)
                    .with_context(|| format!("Failed to create Docker client for {}", host))?,
            ),
            Protocol::Https => {
                let tls = host.tls.as_ref().ok_or_else(|| {
                    anyhow!("TLS requested for {} but no certificate directory is known (set DOCKER_CERT_PATH)", host)
                })?;
                Connection::Ready(
                    Docker::connect_with_ssl(
                        &format!("tcp://{}", host.address),
                        &tls.key,
                        &tls.cert,
                        &tls.ca,
                        timeout_secs,
                        API_DEFAULT_VERSION,
                    )
                    .with_context(|| format!("Failed to create TLS Docker client for {}", host))?,
                )
            }
        };

        Ok(Self {
            connection,
            host: host.clone(),
        })
    }

    pub fn host(&self) -> &HostDescriptor {
        &self.host
    }

    fn client(&self) -> Result<&Docker> {
        match &self.connection {
            Connection::Ready(docker) => Ok(docker),
            Connection::Unreachable(reason) => Err(anyhow!("{}", reason)),
        }
    }
}

#[cfg(unix)]
fn connect_unix(path: &str, timeout_secs: u64) -> Result<Docker> {
    Docker::connect_with_unix(path, timeout_secs, API_DEFAULT_VERSION)
        .with_context(|| format!("Failed to create Docker client for unix://{}", path))
}

#[cfg(not(unix))]
fn connect_unix(path: &str, _timeout_secs: u64) -> Result<Docker> {
    Err(anyhow!("unix://{} is not supported on this platform", path))
}

#[cfg(windows)]
fn connect_named_pipe(path: &str, timeout_secs: u64) -> Result<Docker> {
    let pipe = crate::utils::to_windows_pipe_path(path);
    Docker::connect_with_named_pipe(&pipe, timeout_secs, API_DEFAULT_VERSION)
        .with_context(|| format!("Failed to create Docker client for npipe://{}", path))
}

#[cfg(not(windows))]
fn connect_named_pipe(path: &str, _timeout_secs: u64) -> Result<Docker> {
    Err(anyhow!("npipe://{} is only supported on Windows", path))
}

#[async_trait]
impl DockerApi for DockerManager {
    async fn ping(&self) -> PingOutcome {
        let docker = match self.client() {
            Ok(docker) => docker,
            Err(e) => return PingOutcome::failed(e.to_string()),
        };

        match docker.ping().await {
            Ok(body) => PingOutcome::ok(body),
            Err(e) => PingOutcome::failed(e.to_string()),
        }
    }

    async fn version(&self) -> Result<Version> {
        self.client()?
            .version()
            .await
            .context("Failed to query Docker version")
    }

    async fn info(&self) -> Result<SystemInfo> {
        self.client()?
            .info()
            .await
            .context("Failed to query Docker system info")
    }
}
