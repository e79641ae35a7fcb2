//! 模式切换决策引擎
//!
//! 每次点击根据系统当前状态与解析服务器列表计算下一个 (模式, 服务器)：
//!
//! ```text
//! Off ──(auto 偏好)──▶ Auto ──▶ Private(第一个) ──▶ Private(下一个) ─ … ─▶ Off
//!  └────(无 auto 偏好)──────────▶ Private(第一个)
//! ```
//!
//! 列表不循环：最后一个服务器之后回到 Off。引擎本身无状态，
//! 所有状态都在系统设置和偏好存储中。

use serde::Serialize;
use tracing::debug;

use super::projection::{TileIcon, TileLabels, TileProjection};
use crate::common::error::Result;
use crate::dns::mode::{DnsMode, ObservedMode, SystemDnsState};
use crate::prefs::{Preferences, ResolverList};

/// 一次点击的决策结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transition {
    pub mode: DnsMode,
    pub resolver: Option<String>,
}

impl Transition {
    pub fn new(mode: DnsMode, resolver: Option<&str>) -> Self {
        Self {
            mode,
            resolver: resolver.map(str::to_string),
        }
    }
}

/// 在规范化后的列表中查找 `current` 的下一个服务器
///
/// 未找到（或 `current` 为空）返回第一个；已是最后一个返回 `None`。
pub fn next_in_list(list: &ResolverList, current: Option<&str>) -> Option<String> {
    let list = list.normalized();
    let entries = list.entries();
    let index = current.and_then(|c| entries.iter().position(|e| e == c));
    match index {
        None => entries.first().cloned(),
        Some(i) if i + 1 == entries.len() => None,
        Some(i) => entries.get(i + 1).cloned(),
    }
}

pub struct ModeCycleEngine {
    prefs: Preferences,
    labels: TileLabels,
}

impl ModeCycleEngine {
    pub fn new(prefs: Preferences) -> Self {
        Self::with_labels(prefs, TileLabels::default())
    }

    pub fn with_labels(prefs: Preferences, labels: TileLabels) -> Self {
        Self { prefs, labels }
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    pub fn labels(&self) -> &TileLabels {
        &self.labels
    }

    /// 列表中 `current` 之后的服务器，`None` 表示列表已走完
    pub fn next_resolver(&self, current: Option<&str>) -> Result<Option<String>> {
        let list = self.prefs.resolver_list()?;
        Ok(next_in_list(&list, current))
    }

    /// 计算点击后应写入系统的模式与服务器
    pub fn on_toggle(&self, observed: &SystemDnsState) -> Result<Transition> {
        let current = observed.resolver.as_deref();
        let transition = match observed.mode.for_transition() {
            DnsMode::Off => {
                if self.prefs.auto_mode()? {
                    Transition::new(DnsMode::Auto, current)
                } else {
                    Transition {
                        mode: DnsMode::Private,
                        resolver: self.next_resolver(None)?,
                    }
                }
            }
            DnsMode::Auto => Transition {
                mode: DnsMode::Private,
                resolver: self.next_resolver(current)?,
            },
            DnsMode::Private => match self.next_resolver(current)? {
                Some(next) => Transition::new(DnsMode::Private, Some(&next)),
                None => Transition::new(DnsMode::Off, None),
            },
        };
        debug!(
            observed = %observed.mode,
            next = transition.mode.as_str(),
            resolver = ?transition.resolver,
            "toggle decided"
        );
        Ok(transition)
    }

    /// 未点击时（磁贴可见）的显示状态
    ///
    /// Private 模式但没有服务器时返回 `None`，由调用方提示用户。
    pub fn project_for_display(&self, observed: &SystemDnsState) -> Option<TileProjection> {
        match &observed.mode {
            ObservedMode::Known(DnsMode::Off) => Some(self.off_projection()),
            ObservedMode::Unrecognized(_) => Some(TileProjection {
                active: false,
                label: self.labels.unknown.clone(),
                icon: TileIcon::Unknown,
            }),
            ObservedMode::Known(DnsMode::Auto) => Some(self.auto_projection()),
            ObservedMode::Known(DnsMode::Private) => {
                observed.resolver.as_deref().map(private_projection)
            }
        }
    }

    /// 点击后磁贴的显示状态
    ///
    /// 与 [`Self::project_for_display`] 一致：Private 但没有服务器时返回 `None`。
    pub fn project_transition(&self, transition: &Transition) -> Option<TileProjection> {
        match transition.mode {
            DnsMode::Off => Some(self.off_projection()),
            DnsMode::Auto => Some(self.auto_projection()),
            DnsMode::Private => transition.resolver.as_deref().map(private_projection),
        }
    }

    fn off_projection(&self) -> TileProjection {
        TileProjection {
            active: false,
            label: self.labels.off.clone(),
            icon: TileIcon::Off,
        }
    }

    fn auto_projection(&self) -> TileProjection {
        TileProjection {
            active: true,
            label: self.labels.auto.clone(),
            icon: TileIcon::Auto,
        }
    }
}

fn private_projection(resolver: &str) -> TileProjection {
    TileProjection {
        active: true,
        label: resolver.to_string(),
        icon: TileIcon::Private,
    }
}
