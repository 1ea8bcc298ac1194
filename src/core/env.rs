/// Docker host resolution
///
/// Works out which daemon to talk to from the --host flag, the environment,
/// the user config file or the platform default, in that order.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::utils::{
    default_cert_dir, env_non_empty, is_flag_enabled, AppConfig, DEFAULT_DOCKER_HOST,
    DEFAULT_HTTP_PORT, DEFAULT_TLS_PORT, DOCKER_CERT_PATH_ENV, DOCKER_HOST_ENV,
    DOCKER_TLS_VERIFY_ENV, TLS_CA_FILE, TLS_CERT_FILE, TLS_KEY_FILE,
};

#[derive(Debug, Error, PartialEq)]
pub enum HostError {
    #[error("Docker host '{0}' has no scheme (expected unix://, tcp://, http://, https:// or npipe://)")]
    MissingScheme(String),

    #[error("Unsupported Docker host scheme '{0}'")]
    UnsupportedScheme(String),

    #[error("Docker host '{0}' has no address")]
    MissingAddress(String),

    #[error("Invalid port in Docker host '{0}'")]
    InvalidPort(String),

    #[error("Invalid address in Docker host '{0}' (no path allowed; IPv6 literals need brackets)")]
    InvalidAddress(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    Unix,
    Http,
    Https,
    #[serde(rename = "npipe")]
    NamedPipe,
}

impl Protocol {
    pub fn scheme(&self) -> &'static str {
        match self {
            Protocol::Unix => "unix",
            Protocol::Http => "http",
            Protocol::Https => "https",
            Protocol::NamedPipe => "npipe",
        }
    }
}

/// Where the resolved host came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HostSource {
    Flag,
    Environment,
    ConfigFile,
    PlatformDefault,
}

impl fmt::Display for HostSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            HostSource::Flag => "--host flag",
            HostSource::Environment => DOCKER_HOST_ENV,
            HostSource::ConfigFile => "config file",
            HostSource::PlatformDefault => "platform default",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TlsFiles {
    pub key: PathBuf,
    pub cert: PathBuf,
    pub ca: PathBuf,
}

impl TlsFiles {
    pub fn in_dir(dir: PathBuf) -> Self {
        Self {
            key: dir.join(TLS_KEY_FILE),
            cert: dir.join(TLS_CERT_FILE),
            ca: dir.join(TLS_CA_FILE),
        }
    }
}

/// Address and protocol used to reach the daemon
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostDescriptor {
    pub protocol: Protocol,
    /// Socket/pipe path, or host:port for network protocols
    pub address: String,
    pub tls: Option<TlsFiles>,
}

impl HostDescriptor {
    /// Parse a Docker host URL.
    ///
    /// `tcp://` becomes `https` when `tls_verify` is set, `http` otherwise.
    /// Missing ports default to 2375 (plain) or 2376 (TLS).
    pub fn parse(raw: &str, tls_verify: bool, cert_dir: Option<PathBuf>) -> Result<Self, HostError> {
        let trimmed = raw.trim();
        let (scheme, rest) = trimmed
            .split_once("://")
            .ok_or_else(|| HostError::MissingScheme(trimmed.to_string()))?;

        let protocol = match scheme.to_ascii_lowercase().as_str() {
            "unix" => Protocol::Unix,
            "npipe" => Protocol::NamedPipe,
            "tcp" if tls_verify => Protocol::Https,
            "tcp" | "http" => Protocol::Http,
            "https" => Protocol::Https,
            other => return Err(HostError::UnsupportedScheme(other.to_string())),
        };

        let address = match protocol {
            Protocol::Unix | Protocol::NamedPipe => {
                if rest.is_empty() {
                    return Err(HostError::MissingAddress(trimmed.to_string()));
                }
                rest.to_string()
            }
            Protocol::Http | Protocol::Https => {
                let default_port = if protocol == Protocol::Https {
                    DEFAULT_TLS_PORT
                } else {
                    DEFAULT_HTTP_PORT
                };
                network_address(trimmed, rest, default_port)?
            }
        };

        let tls = match protocol {
            Protocol::Https => cert_dir.map(TlsFiles::in_dir),
            _ => None,
        };

        Ok(Self { protocol, address, tls })
    }
}

impl fmt::Display for HostDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.protocol.scheme(), self.address)
    }
}

/// Split "host[:port][/]" into a normalized "host:port"
fn network_address(raw: &str, rest: &str, default_port: u16) -> Result<String, HostError> {
    let authority = rest.trim_end_matches('/');
    if authority.contains('/') {
        return Err(HostError::InvalidAddress(raw.to_string()));
    }

    // Bracketed IPv6 literal: [::1]:2375
    let (host, port) = if let Some(stripped) = authority.strip_prefix('[') {
        let (ip, after) = stripped
            .split_once(']')
            .ok_or_else(|| HostError::MissingAddress(raw.to_string()))?;
        let port = match after.strip_prefix(':') {
            Some(p) => Some(p),
            None if after.is_empty() => None,
            None => return Err(HostError::InvalidPort(raw.to_string())),
        };
        (format!("[{}]", ip), port)
    } else {
        match authority.rsplit_once(':') {
            Some((h, p)) => (h.to_string(), Some(p)),
            None => (authority.to_string(), None),
        }
    };

    if host.is_empty() || host == "[]" {
        return Err(HostError::MissingAddress(raw.to_string()));
    }
    if !host.starts_with('[') && host.contains(':') {
        return Err(HostError::InvalidAddress(raw.to_string()));
    }

    let port = match port {
        Some(p) => p
            .parse::<u16>()
            .map_err(|_| HostError::InvalidPort(raw.to_string()))?,
        None => default_port,
    };

    Ok(format!("{}:{}", host, port))
}

/// Inputs for host resolution, gathered once so resolution itself stays pure
#[derive(Debug, Clone, Default)]
pub struct HostResolver {
    pub flag_host: Option<String>,
    pub env_host: Option<String>,
    pub config_host: Option<String>,
    pub tls_verify: bool,
    pub cert_dir: Option<PathBuf>,
}

impl HostResolver {
    /// Collect inputs from the process environment and the user config
    pub fn from_env(flag_host: Option<String>, config: &AppConfig) -> Self {
        let tls_verify = is_flag_enabled(std::env::var(DOCKER_TLS_VERIFY_ENV).ok().as_deref());
        let cert_dir = env_non_empty(DOCKER_CERT_PATH_ENV)
            .map(PathBuf::from)
            .or_else(default_cert_dir);

        Self {
            flag_host: flag_host.filter(|h| !h.trim().is_empty()),
            env_host: env_non_empty(DOCKER_HOST_ENV),
            config_host: config.docker_host.clone().filter(|h| !h.trim().is_empty()),
            tls_verify,
            cert_dir,
        }
    }

    pub fn resolve(&self) -> Result<(HostDescriptor, HostSource), HostError> {
        let (raw, source) = if let Some(h) = &self.flag_host {
            (h.as_str(), HostSource::Flag)
        } else if let Some(h) = &self.env_host {
            (h.as_str(), HostSource::Environment)
        } else if let Some(h) = &self.config_host {
            (h.as_str(), HostSource::ConfigFile)
        } else {
            (DEFAULT_DOCKER_HOST, HostSource::PlatformDefault)
        };

        let host = HostDescriptor::parse(raw, self.tls_verify, self.cert_dir.clone())?;
        Ok((host, source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unix_socket() {
        let host = HostDescriptor::parse("unix:///var/run/docker.sock", false, None).unwrap();
        assert_eq!(host.protocol, Protocol::Unix);
        assert_eq!(host.address, "/var/run/docker.sock");
        assert_eq!(host.to_string(), "unix:///var/run/docker.sock");
        assert!(host.tls.is_none());
    }

    #[test]
    fn test_parse_tcp_defaults() {
        let host = HostDescriptor::parse("tcp://localhost", false, None).unwrap();
        assert_eq!(host.protocol, Protocol::Http);
        assert_eq!(host.to_string(), "http://localhost:2375");
        assert!(host.tls.is_none());

        let host = HostDescriptor::parse("tcp://10.0.0.5:4243/", false, None).unwrap();
        assert_eq!(host.address, "10.0.0.5:4243");
    }

    #[test]
    fn test_parse_tcp_with_tls_verify() {
        let host = HostDescriptor::parse("tcp://docker.example.com", true, Some(PathBuf::from("/certs"))).unwrap();
        assert_eq!(host.protocol, Protocol::Https);
        assert_eq!(host.address, "docker.example.com:2376");

        let tls = host.tls.unwrap();
        assert_eq!(tls.key, PathBuf::from("/certs/key.pem"));
        assert_eq!(tls.cert, PathBuf::from("/certs/cert.pem"));
        assert_eq!(tls.ca, PathBuf::from("/certs/ca.pem"));
    }

    #[test]
    fn test_parse_ipv6() {
        let host = HostDescriptor::parse("tcp://[::1]", false, None).unwrap();
        assert_eq!(host.address, "[::1]:2375");

        let host = HostDescriptor::parse("http://[::1]:2380", false, None).unwrap();
        assert_eq!(host.address, "[::1]:2380");
    }

    #[test]
    fn test_parse_named_pipe() {
        let host = HostDescriptor::parse("npipe:////./pipe/docker_engine", false, None).unwrap();
        assert_eq!(host.protocol, Protocol::NamedPipe);
        assert_eq!(host.address, "//./pipe/docker_engine");
        assert_eq!(host.to_string(), "npipe:////./pipe/docker_engine");
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            HostDescriptor::parse("/var/run/docker.sock", false, None),
            Err(HostError::MissingScheme("/var/run/docker.sock".to_string()))
        );
        assert_eq!(
            HostDescriptor::parse("ssh://user@box", false, None),
            Err(HostError::UnsupportedScheme("ssh".to_string()))
        );
        assert_eq!(
            HostDescriptor::parse("unix://", false, None),
            Err(HostError::MissingAddress("unix://".to_string()))
        );
        assert_eq!(
            HostDescriptor::parse("tcp://:2375", false, None),
            Err(HostError::MissingAddress("tcp://:2375".to_string()))
        );
        assert_eq!(
            HostDescriptor::parse("tcp://localhost:docker", false, None),
            Err(HostError::InvalidPort("tcp://localhost:docker".to_string()))
        );
        assert_eq!(
            HostDescriptor::parse("tcp://host/extra", false, None),
            Err(HostError::InvalidAddress("tcp://host/extra".to_string()))
        );
        assert_eq!(
            HostDescriptor::parse("tcp://localhost:2375/v1.43", false, None),
            Err(HostError::InvalidAddress("tcp://localhost:2375/v1.43".to_string()))
        );
        assert_eq!(
            HostDescriptor::parse("tcp://::1", false, None),
            Err(HostError::InvalidAddress("tcp://::1".to_string()))
        );
        assert_eq!(
            HostDescriptor::parse("http://fe80::1:2375", false, None),
            Err(HostError::InvalidAddress("http://fe80::1:2375".to_string()))
        );
    }

    #[test]
    fn test_resolution_precedence() {
        let mut resolver = HostResolver {
            flag_host: Some("tcp://flag:1".to_string()),
            env_host: Some("tcp://env:2".to_string()),
            config_host: Some("tcp://config:3".to_string()),
            ..Default::default()
        };

        let (host, source) = resolver.resolve().unwrap();
        assert_eq!(host.address, "flag:1");
        assert_eq!(source, HostSource::Flag);

        resolver.flag_host = None;
        let (host, source) = resolver.resolve().unwrap();
        assert_eq!(host.address, "env:2");
        assert_eq!(source, HostSource::Environment);

        resolver.env_host = None;
        let (host, source) = resolver.resolve().unwrap();
        assert_eq!(host.address, "config:3");
        assert_eq!(source, HostSource::ConfigFile);

        resolver.config_host = None;
        let (host, source) = resolver.resolve().unwrap();
        assert_eq!(host.to_string(), DEFAULT_DOCKER_HOST);
        assert_eq!(source, HostSource::PlatformDefault);
    }

    #[test]
    fn test_resolution_surfaces_parse_errors() {
        let resolver = HostResolver {
            env_host: Some("bogus".to_string()),
            ..Default::default()
        };
        assert!(matches!(resolver.resolve(), Err(HostError::MissingScheme(_))));
    }

    #[test]
    fn test_from_env_reads_docker_variables() {
        // Only this test touches these variables, so no other test can observe them
        let saved: Vec<(&str, Option<String>)> = [DOCKER_HOST_ENV, DOCKER_TLS_VERIFY_ENV, DOCKER_CERT_PATH_ENV]
            .into_iter()
            .map(|name| (name, std::env::var(name).ok()))
            .collect();

        std::env::set_var(DOCKER_HOST_ENV, "  tcp://env-box  ");
        std::env::set_var(DOCKER_TLS_VERIFY_ENV, "1");
        std::env::set_var(DOCKER_CERT_PATH_ENV, "/opt/docker-certs");

        // A blank flag falls through to DOCKER_HOST
        let resolver = HostResolver::from_env(Some("   ".to_string()), &AppConfig::default());
        let (host, source) = resolver.resolve().unwrap();
        assert_eq!(source, HostSource::Environment);
        assert_eq!(host.protocol, Protocol::Https);
        assert_eq!(host.address, "env-box:2376");
        let tls = host.tls.unwrap();
        assert_eq!(tls.key, PathBuf::from("/opt/docker-certs/key.pem"));
        assert_eq!(tls.ca, PathBuf::from("/opt/docker-certs/ca.pem"));

        // TLS off, no DOCKER_HOST: the config value applies
        std::env::remove_var(DOCKER_HOST_ENV);
        std::env::set_var(DOCKER_TLS_VERIFY_ENV, "0");
        let config = AppConfig {
            docker_host: Some("tcp://config-box".to_string()),
            timeout_secs: None,
        };
        let (host, source) = HostResolver::from_env(None, &config).resolve().unwrap();
        assert_eq!(source, HostSource::ConfigFile);
        assert_eq!(host.protocol, Protocol::Http);
        assert_eq!(host.address, "config-box:2375");
        assert!(host.tls.is_none());

        // A blank config value falls through to the platform default
        let config = AppConfig {
            docker_host: Some(" ".to_string()),
            timeout_secs: None,
        };
        let (host, source) = HostResolver::from_env(None, &config).resolve().unwrap();
        assert_eq!(source, HostSource::PlatformDefault);
        assert_eq!(host.to_string(), DEFAULT_DOCKER_HOST);

        for (name, value) in saved {
            match value {
                Some(v) => std::env::set_var(name, v),
                None => std::env::remove_var(name),
            }
        }
    }
}
