use std::path::PathBuf;

use anyhow::Result;
use serde::Deserialize;

use crate::tile::TileLabels;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub log: LogConfig,
    /// 偏好存储文件（解析服务器列表、自动模式开关）
    #[serde(default = "default_preferences_path")]
    pub preferences_path: PathBuf,
    /// 模拟系统 DNS 设置的文件
    #[serde(default = "default_settings_path")]
    pub settings_path: PathBuf,
    #[serde(default)]
    pub labels: TileLabels,
    /// 是否拥有修改系统设置的权限
    #[serde(default = "default_true")]
    pub permission_granted: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log: LogConfig::default(),
            preferences_path: default_preferences_path(),
            settings_path: default_settings_path(),
            labels: TileLabels::default(),
            permission_granted: true,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        if self.preferences_path.as_os_str().is_empty() {
            anyhow::bail!("preferences_path cannot be empty");
        }
        if self.settings_path.as_os_str().is_empty() {
            anyhow::bail!("settings_path cannot be empty");
        }
        if self.preferences_path == self.settings_path {
            anyhow::bail!(
                "preferences_path and settings_path must differ: {}",
                self.settings_path.display()
            );
        }
        for (name, label) in [
            ("off", &self.labels.off),
            ("unknown", &self.labels.unknown),
            ("auto", &self.labels.auto),
        ] {
            if label.trim().is_empty() {
                anyhow::bail!("label '{}' cannot be empty", name);
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_preferences_path() -> PathBuf {
    PathBuf::from("app_prefs.json")
}

fn default_settings_path() -> PathBuf {
    PathBuf::from("dns_settings.json")
}

fn default_true() -> bool {
    true
}
