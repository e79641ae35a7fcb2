//! 系统 DNS 设置访问
//!
//! 系统设置是外部的权威存储，内核只通过 [`SystemDnsSettings`] 读写，
//! 写操作前必须经过 [`PermissionGate`] 检查。

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::debug;

use super::mode::{DnsMode, SystemDnsState, KEY_PRIVATE_DNS_MODE, KEY_PRIVATE_DNS_SPECIFIER};
use crate::common::error::Result;

/// 系统 DNS 设置读写接口
pub trait SystemDnsSettings: Send + Sync {
    /// 读取当前模式与解析服务器
    fn observe(&self) -> Result<SystemDnsState>;

    /// 同时写入模式与解析服务器（`None` 清除 specifier）
    fn apply(&self, mode: DnsMode, resolver: Option<&str>) -> Result<()>;
}

/// 修改系统设置所需的特权检查
pub trait PermissionGate: Send + Sync {
    fn is_granted(&self) -> bool;
}

/// 固定结果的权限检查（CLI、测试）
#[derive(Debug, Clone, Copy)]
pub struct StaticGate(pub bool);

impl PermissionGate for StaticGate {
    fn is_granted(&self) -> bool {
        self.0
    }
}

type RawSettings = BTreeMap<String, Option<String>>;

fn state_from_map(map: &RawSettings) -> SystemDnsState {
    let get = |key: &str| map.get(key).and_then(|v| v.as_deref());
    SystemDnsState::from_raw(get(KEY_PRIVATE_DNS_MODE), get(KEY_PRIVATE_DNS_SPECIFIER))
}

fn write_into_map(map: &mut RawSettings, mode: DnsMode, resolver: Option<&str>) {
    map.insert(
        KEY_PRIVATE_DNS_MODE.to_string(),
        Some(mode.as_str().to_string()),
    );
    map.insert(
        KEY_PRIVATE_DNS_SPECIFIER.to_string(),
        resolver.map(str::to_string),
    );
}

/// 内存中的系统设置
#[derive(Debug, Default)]
pub struct MemorySettings {
    values: RwLock<RawSettings>,
}

impl MemorySettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以原始字符串初始化（可模拟系统中的未知模式值）
    pub fn with_raw(mode: Option<&str>, resolver: Option<&str>) -> Self {
        let mut values = RawSettings::new();
        if let Some(mode) = mode {
            values.insert(KEY_PRIVATE_DNS_MODE.to_string(), Some(mode.to_string()));
        }
        if let Some(resolver) = resolver {
            values.insert(
                KEY_PRIVATE_DNS_SPECIFIER.to_string(),
                Some(resolver.to_string()),
            );
        }
        Self {
            values: RwLock::new(values),
        }
    }
}

impl SystemDnsSettings for MemorySettings {
    fn observe(&self) -> Result<SystemDnsState> {
        Ok(state_from_map(&*self.values.read()?))
    }

    fn apply(&self, mode: DnsMode, resolver: Option<&str>) -> Result<()> {
        write_into_map(&mut *self.values.write()?, mode, resolver);
        Ok(())
    }
}

/// JSON 文件模拟的系统设置
///
/// 文件格式：`{"private_dns_mode": "hostname", "private_dns_specifier": "dns.google"}`。
/// 每次读取都重新加载文件，外部修改立即可见。
#[derive(Debug)]
pub struct FileSettings {
    path: PathBuf,
}

impl FileSettings {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<RawSettings> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "settings file not found, treating as unset");
            return Ok(RawSettings::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

impl SystemDnsSettings for FileSettings {
    fn observe(&self) -> Result<SystemDnsState> {
        Ok(state_from_map(&self.load()?))
    }

    fn apply(&self, mode: DnsMode, resolver: Option<&str>) -> Result<()> {
        let mut values = self.load()?;
        write_into_map(&mut values, mode, resolver);
        crate::common::write_atomic(&self.path, &serde_json::to_string_pretty(&values)?)?;
        debug!(path = %self.path.display(), mode = mode.as_str(), "system dns settings written");
        Ok(())
    }
}
