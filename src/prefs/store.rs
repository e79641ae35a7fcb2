use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::common::error::Result;

/// 原始类型的键值存储
///
/// 只负责存取，不做校验；规范化由引擎处理。
pub trait KeyValueStore: Send + Sync {
    fn get_string(&self, key: &str) -> Result<Option<String>>;
    fn put_string(&self, key: &str, value: &str) -> Result<()>;
    fn get_bool(&self, key: &str) -> Result<Option<bool>>;
    fn put_bool(&self, key: &str, value: bool) -> Result<()>;
}

/// 单个值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrefValue {
    Bool(bool),
    Str(String),
}

impl PrefValue {
    fn as_str(&self) -> Option<&str> {
        match self {
            PrefValue::Str(s) => Some(s),
            PrefValue::Bool(_) => None,
        }
    }

    fn as_bool(&self) -> Option<bool> {
        match self {
            PrefValue::Bool(b) => Some(*b),
            PrefValue::Str(_) => None,
        }
    }
}

type Values = BTreeMap<String, PrefValue>;

/// 内存存储
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: RwLock<Values>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.read()?;
        Ok(values.get(key).and_then(|v| v.as_str()).map(str::to_string))
    }

    fn put_string(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .write()?
            .insert(key.to_string(), PrefValue::Str(value.to_string()));
        Ok(())
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        Ok(self.values.read()?.get(key).and_then(|v| v.as_bool()))
    }

    fn put_bool(&self, key: &str, value: bool) -> Result<()> {
        self.values
            .write()?
            .insert(key.to_string(), PrefValue::Bool(value));
        Ok(())
    }
}

/// JSON 文件存储
///
/// 打开时加载到内存，每次写入整体落盘（临时文件 + 重命名）。
/// 文件格式：`{"dns_servers": "a,b", "auto_enabled": true}`
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    values: RwLock<Values>,
}

impl JsonFileStore {
    /// 打开存储，文件不存在时为空
    pub fn open(path: PathBuf) -> Result<Self> {
        let values = Self::load_from_disk(&path)?;
        Ok(Self {
            path,
            values: RwLock::new(values),
        })
    }

    /// 尝试从文件加载，失败时使用空存储（降级行为）
    pub fn load_or_default(path: PathBuf) -> Self {
        let values = match Self::load_from_disk(&path) {
            Ok(v) => v,
            Err(e) => {
                warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to load preferences, using defaults"
                );
                Values::new()
            }
        };
        Self {
            path,
            values: RwLock::new(values),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_from_disk(path: &Path) -> Result<Values> {
        if !path.exists() {
            debug!(path = %path.display(), "preference file not found, using defaults");
            return Ok(Values::new());
        }
        let content = std::fs::read_to_string(path)?;
        let values: Values = serde_json::from_str(&content)?;
        debug!(path = %path.display(), keys = values.len(), "loaded preferences");
        Ok(values)
    }

    /// 先落盘再替换内存状态，写失败时内存保持原值
    fn put(&self, key: &str, value: PrefValue) -> Result<()> {
        let mut values = self.values.write()?;
        let mut next = values.clone();
        next.insert(key.to_string(), value);
        crate::common::write_atomic(&self.path, &serde_json::to_string_pretty(&next)?)?;
        *values = next;
        debug!(path = %self.path.display(), key, "saved preferences");
        Ok(())
    }
}

impl KeyValueStore for JsonFileStore {
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        let values = self.values.read()?;
        Ok(values.get(key).and_then(|v| v.as_str()).map(str::to_string))
    }

    fn put_string(&self, key: &str, value: &str) -> Result<()> {
        self.put(key, PrefValue::Str(value.to_string()))
    }

    fn get_bool(&self, key: &str) -> Result<Option<bool>> {
        Ok(self.values.read()?.get(key).and_then(|v| v.as_bool()))
    }

    fn put_bool(&self, key: &str, value: bool) -> Result<()> {
        self.put(key, PrefValue::Bool(value))
    }
}
