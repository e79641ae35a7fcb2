//! 系统 Private DNS 模式
//!
//! 系统设置中有三种模式:
//! - Off: 关闭 Private DNS
//! - Auto: 自动（opportunistic），有条件时升级为加密 DNS
//! - Private: 指定解析服务器主机名（hostname）

use serde::Serialize;

/// 系统设置键：当前模式
pub const KEY_PRIVATE_DNS_MODE: &str = "private_dns_mode";
/// 系统设置键：指定的解析服务器
pub const KEY_PRIVATE_DNS_SPECIFIER: &str = "private_dns_specifier";

/// Private DNS resolution mode as stored in system settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DnsMode {
    /// Private DNS disabled
    #[serde(rename = "off")]
    Off,
    /// Opportunistic encryption without a pinned resolver
    #[serde(rename = "opportunistic")]
    Auto,
    /// All queries go to the named resolver
    #[serde(rename = "hostname")]
    Private,
}

impl DnsMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Auto => "opportunistic",
            Self::Private => "hostname",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "off" => Some(Self::Off),
            "opportunistic" => Some(Self::Auto),
            "hostname" => Some(Self::Private),
            _ => None,
        }
    }
}

impl std::fmt::Display for DnsMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 从系统读到的模式：已知模式，或无法识别（缺失 / 未知字符串）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ObservedMode {
    Known(DnsMode),
    /// 原始值（None 表示系统中没有该键）
    Unrecognized(Option<String>),
}

impl ObservedMode {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.and_then(DnsMode::from_str) {
            Some(mode) => Self::Known(mode),
            None => Self::Unrecognized(raw.map(str::to_string)),
        }
    }

    /// 切换决策时把未知模式当作 Auto 处理
    pub fn for_transition(&self) -> DnsMode {
        match self {
            Self::Known(mode) => *mode,
            Self::Unrecognized(_) => DnsMode::Auto,
        }
    }

    pub fn known(&self) -> Option<DnsMode> {
        match self {
            Self::Known(mode) => Some(*mode),
            Self::Unrecognized(_) => None,
        }
    }
}

impl From<DnsMode> for ObservedMode {
    fn from(mode: DnsMode) -> Self {
        Self::Known(mode)
    }
}

impl std::fmt::Display for ObservedMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Known(mode) => mode.fmt(f),
            Self::Unrecognized(Some(raw)) => write!(f, "unrecognized({raw})"),
            Self::Unrecognized(None) => f.write_str("unset"),
        }
    }
}

/// 系统当前的 DNS 状态快照（每次决策前读取）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemDnsState {
    pub mode: ObservedMode,
    pub resolver: Option<String>,
}

impl SystemDnsState {
    pub fn new(mode: impl Into<ObservedMode>, resolver: Option<&str>) -> Self {
        Self {
            mode: mode.into(),
            resolver: resolver.map(str::to_string),
        }
    }

    /// 由系统设置的两个原始字符串构造
    pub fn from_raw(mode: Option<&str>, resolver: Option<&str>) -> Self {
        Self {
            mode: ObservedMode::parse(mode),
            resolver: resolver.map(str::to_string),
        }
    }
}
