/// Helper utilities for environment handling

use std::path::PathBuf;

/// Read an environment variable, treating empty values as unset
pub fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Docker CLI semantics for DOCKER_TLS_VERIFY: any non-empty value except "0" enables TLS
pub fn is_flag_enabled(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        Some("") | Some("0") | None => false,
        Some(_) => true,
    }
}

/// Default certificate directory (~/.docker)
pub fn default_cert_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".docker"))
}

/// Convert a npipe URL path (//./pipe/name) to the Windows form (\\.\pipe\name)
pub fn to_windows_pipe_path(path: &str) -> String {
    path.replace('/', "\\")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_flag_enabled() {
        assert!(is_flag_enabled(Some("1")));
        assert!(is_flag_enabled(Some("yes")));
        assert!(!is_flag_enabled(Some("0")));
        assert!(!is_flag_enabled(Some("  ")));
        assert!(!is_flag_enabled(None));
    }

    #[test]
    fn test_to_windows_pipe_path() {
        assert_eq!(to_windows_pipe_path("//./pipe/docker_engine"), r"\\.\pipe\docker_engine");
    }

    #[test]
    fn test_env_non_empty_missing() {
        assert_eq!(env_non_empty("DOCKER_PROBE_TEST_SURELY_UNSET_VAR"), None);
    }
}
