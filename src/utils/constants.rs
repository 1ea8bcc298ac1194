/// Docker connection defaults and environment variable names
///
/// Mirrors the conventions of the docker CLI so the same environment works for both

/// Environment variable holding the daemon address
pub const DOCKER_HOST_ENV: &str = "DOCKER_HOST";

/// Non-empty (and not "0") enables TLS for tcp:// hosts
pub const DOCKER_TLS_VERIFY_ENV: &str = "DOCKER_TLS_VERIFY";

/// Directory holding key.pem, cert.pem and ca.pem
pub const DOCKER_CERT_PATH_ENV: &str = "DOCKER_CERT_PATH";

#[cfg(unix)]
pub const DEFAULT_DOCKER_HOST: &str = "unix:///var/run/docker.sock";

#[cfg(windows)]
pub const DEFAULT_DOCKER_HOST: &str = "npipe:////./pipe/docker_engine";

/// Plain-text daemon port
pub const DEFAULT_HTTP_PORT: u16 = 2375;

/// TLS daemon port
pub const DEFAULT_TLS_PORT: u16 = 2376;

/// Request timeout in seconds, same as bollard's own default
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Certificate file names inside the cert directory
pub const TLS_KEY_FILE: &str = "key.pem";
pub const TLS_CERT_FILE: &str = "cert.pem";
pub const TLS_CA_FILE: &str = "ca.pem";

/// Application name, used for the config directory
pub const APP_NAME: &str = "docker-probe";
