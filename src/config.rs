use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{
    data::{fields::DEFAULT_INDEX_LIST, StockColorMode, WatchList},
    path_env,
};

const CONFIG_FILE: &str = "config.json";
const EXPORT_FILE: &str = "export.txt";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub index_list: Vec<String>,
    pub stock_list: Vec<String>,
    /// Auto refresh period in seconds, 0 disables it
    pub refresh_secs: u64,
    pub color_mode: StockColorMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index_list: DEFAULT_INDEX_LIST.map(String::from).to_vec(),
            stock_list: ["贵州茅台", "五粮液", "宁德时代", "招商银行", "中国平安"]
                .map(String::from)
                .to_vec(),
            refresh_secs: 0,
            color_mode: StockColorMode::RedUp,
        }
    }
}

impl Config {
    #[must_use]
    pub fn watchlist(&self) -> WatchList {
        WatchList::new(self.index_list.iter().cloned(), self.stock_list.iter().cloned())
    }

    #[must_use]
    pub fn refresh_interval(&self) -> Option<std::time::Duration> {
        (self.refresh_secs > 0).then(|| std::time::Duration::from_secs(self.refresh_secs))
    }
}

#[must_use]
pub fn config_path() -> PathBuf {
    path_env::data_dir().join(CONFIG_FILE)
}

#[must_use]
pub fn export_path() -> PathBuf {
    path_env::data_dir().join(EXPORT_FILE)
}

/// Read the config file, falling back to defaults when it is missing or unreadable
pub fn load() -> Config {
    load_from_path(&config_path())
}

pub fn save(config: &Config) -> std::io::Result<PathBuf> {
    let path = config_path();
    save_to_path(config, &path)?;
    Ok(path)
}

fn load_from_path(path: &Path) -> Config {
    let Ok(bytes) = std::fs::read(path) else {
        tracing::debug!(path = %path.display(), "配置文件不存在，使用默认配置");
        return Config::default();
    };
    match serde_json::from_slice::<Config>(&bytes) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                path = %path.display(),
                error = %err,
                "配置文件解析失败，将备份后使用默认配置"
            );
            backup_corrupted_file(path, &bytes);
            Config::default()
        }
    }
}

fn save_to_path(config: &Config, path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let tmp_path = path.with_extension("json.tmp");
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&tmp_path)?;

    let data = serde_json::to_vec_pretty(config).map_err(|err| {
        std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!("序列化配置失败：{err}"),
        )
    })?;

    file.write_all(&data)?;
    file.flush()?;
    drop(file);
    std::fs::rename(tmp_path, path)
}

fn backup_corrupted_file(path: &Path, bytes: &[u8]) {
    let backup_path = path.with_extension(format!("json.corrupt.{}.bak", now_unix()));
    _ = std::fs::write(backup_path, bytes);
}

fn now_unix() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{load_from_path, save_to_path, Config};
    use crate::data::StockColorMode;

    struct TempDirGuard {
        path: PathBuf,
    }

    impl TempDirGuard {
        fn new(name: &str) -> Self {
            let path = std::env::temp_dir().join(format!("{name}-{}", std::process::id()));
            std::fs::create_dir_all(&path).expect("failed to create temp dir");
            Self { path }
        }
    }

    impl Drop for TempDirGuard {
        fn drop(&mut self) {
            _ = std::fs::remove_dir_all(&self.path);
        }
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = TempDirGuard::new("ashare_panel_config_missing");
        assert_eq!(load_from_path(&dir.path.join("config.json")), Config::default());
    }

    #[test]
    fn saves_and_loads_config() {
        let dir = TempDirGuard::new("ashare_panel_config_save");
        let path = dir.path.join("config.json");

        let config = Config {
            stock_list: vec!["贵州茅台".to_string()],
            refresh_secs: 30,
            color_mode: StockColorMode::GreenUp,
            ..Config::default()
        };
        save_to_path(&config, &path).expect("failed to save config");

        assert!(!path.with_extension("json.tmp").exists());
        assert_eq!(load_from_path(&path), config);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let dir = TempDirGuard::new("ashare_panel_config_partial");
        let path = dir.path.join("config.json");
        std::fs::write(&path, r#"{"stock_list":["五粮液"]}"#).unwrap();

        let config = load_from_path(&path);
        assert_eq!(config.stock_list, ["五粮液"]);
        assert_eq!(config.index_list, Config::default().index_list);
        assert!(config.refresh_interval().is_none());
    }

    #[test]
    fn corrupt_file_is_backed_up() {
        let dir = TempDirGuard::new("ashare_panel_config_corrupt");
        let path = dir.path.join("config.json");
        std::fs::write(&path, "{not json").unwrap();

        assert_eq!(load_from_path(&path), Config::default());
        let backups = std::fs::read_dir(&dir.path)
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().contains(".corrupt."))
            .count();
        assert_eq!(backups, 1);
    }

    #[test]
    fn watchlist_follows_lists() {
        let config = Config {
            index_list: vec!["上证指数".to_string()],
            stock_list: vec!["贵州茅台".to_string(), "贵州茅台".to_string()],
            ..Config::default()
        };
        let watchlist = config.watchlist();
        assert_eq!(watchlist.index_list(), ["上证指数"]);
        assert_eq!(watchlist.stock_list(), ["贵州茅台"]);
    }
}
