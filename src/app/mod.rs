pub mod android;
pub mod ffi;

use anyhow::Result;
use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::dns::settings::{FileSettings, StaticGate};
use crate::prefs::{JsonFileStore, Preferences};
use crate::tile::{ModeCycleEngine, TileHost};

/// 按配置组装磁贴宿主：文件偏好存储 + 文件模拟的系统设置
pub fn build_host(config: &Config) -> Result<TileHost> {
    let store = JsonFileStore::open(config.preferences_path.clone())?;
    let prefs = Preferences::new(Arc::new(store));
    let engine = ModeCycleEngine::with_labels(prefs, config.labels.clone());
    let settings = FileSettings::new(config.settings_path.clone());

    info!(
        preferences = %config.preferences_path.display(),
        settings = %config.settings_path.display(),
        permission = config.permission_granted,
        "tile host ready"
    );

    Ok(TileHost::new(
        engine,
        Arc::new(settings),
        Arc::new(StaticGate(config.permission_granted)),
    ))
}
