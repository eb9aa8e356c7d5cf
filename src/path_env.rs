use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "ASHARE_PANEL_DATA_DIR";
pub const LOG_DIR_ENV: &str = "ASHARE_PANEL_LOG_DIR";

/// Directory named by environment variable `key`, ignoring blank values
#[must_use]
pub fn dir_override(key: &str) -> Option<PathBuf> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Where config and exports live
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(path) = dir_override(DATA_DIR_ENV) {
        return path;
    }

    #[cfg(target_os = "macos")]
    {
        dirs::home_dir()
            .map(|p| p.join("Library/Application Support/AsharePanel"))
            .unwrap_or_else(|| std::env::temp_dir().join("ashare-panel"))
    }
    #[cfg(target_os = "windows")]
    {
        dirs::data_local_dir()
            .map(|p| p.join("AsharePanel"))
            .unwrap_or_else(|| std::env::temp_dir().join("ashare-panel"))
    }
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    {
        dirs::data_local_dir()
            .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
            .map(|p| p.join("ashare-panel"))
            .unwrap_or_else(|| std::env::temp_dir().join("ashare-panel"))
    }
}

/// Where rolling log files go
#[must_use]
pub fn log_dir() -> PathBuf {
    if let Some(path) = dir_override(LOG_DIR_ENV) {
        return path;
    }

    #[cfg(target_os = "macos")]
    {
        dirs::home_dir()
            .map(|p| p.join("Library/Logs/AsharePanel"))
            .unwrap_or_else(fallback_log_dir)
    }
    #[cfg(not(target_os = "macos"))]
    {
        data_dir().join("logs")
    }
}

#[must_use]
pub fn fallback_log_dir() -> PathBuf {
    std::env::temp_dir().join("ashare-panel").join("logs")
}

#[cfg(test)]
mod tests {
    use super::dir_override;

    struct EnvGuard {
        key: &'static str,
        previous: Option<String>,
    }

    impl EnvGuard {
        fn set(key: &'static str, value: Option<&str>) -> Self {
            let previous = std::env::var(key).ok();
            match value {
                Some(value) => std::env::set_var(key, value),
                None => std::env::remove_var(key),
            }
            Self { key, previous }
        }
    }

    impl Drop for EnvGuard {
        fn drop(&mut self) {
            match &self.previous {
                Some(previous) => std::env::set_var(self.key, previous),
                None => std::env::remove_var(self.key),
            }
        }
    }

    #[test]
    fn reads_directory_from_env() {
        let _guard = EnvGuard::set("ASHARE_PANEL_PATH_ENV_TEST_SET", Some(" /tmp/panel "));
        assert_eq!(
            dir_override("ASHARE_PANEL_PATH_ENV_TEST_SET"),
            Some(std::path::PathBuf::from("/tmp/panel"))
        );
    }

    #[test]
    fn ignores_blank_and_missing_values() {
        let _blank = EnvGuard::set("ASHARE_PANEL_PATH_ENV_TEST_BLANK", Some("   "));
        let _missing = EnvGuard::set("ASHARE_PANEL_PATH_ENV_TEST_MISSING", None);
        assert!(dir_override("ASHARE_PANEL_PATH_ENV_TEST_BLANK").is_none());
        assert!(dir_override("ASHARE_PANEL_PATH_ENV_TEST_MISSING").is_none());
    }
}
