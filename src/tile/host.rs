//! 磁贴宿主：把引擎接到权限检查与系统设置上
//!
//! 宿主事件（添加、可见、点击）各对应一个方法，返回 [`TileUpdate`] 交给
//! 界面层刷新。缺少权限时在任何读写之前返回，只带一条提示。

use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{info, warn};

use super::engine::{ModeCycleEngine, Transition};
use super::projection::TileProjection;
use crate::common::error::{Result, ToggleError};
use crate::dns::settings::{PermissionGate, SystemDnsSettings};

/// 需要展示给用户的一次性提示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    /// 没有修改系统设置的权限
    PermissionMissing,
    /// 系统处于 Private 模式却读不到服务器
    ResolverMissing,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::PermissionMissing => "permission to modify secure settings is missing",
            Notice::ResolverMissing => "private DNS is on but no resolver is readable",
        }
    }
}

/// 一次宿主事件的结果
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TileUpdate {
    /// 新的显示状态，`None` 表示保持不变
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<TileProjection>,
    /// 已写入系统的切换
    #[serde(skip_serializing_if = "Option::is_none")]
    pub applied: Option<Transition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

impl TileUpdate {
    fn notice(notice: Notice) -> Self {
        warn!(notice = notice.message(), "tile notice");
        Self {
            notice: Some(notice),
            ..Default::default()
        }
    }

    pub fn is_unchanged(&self) -> bool {
        self.projection.is_none() && self.applied.is_none()
    }
}

pub struct TileHost {
    engine: ModeCycleEngine,
    settings: Arc<dyn SystemDnsSettings>,
    gate: Arc<dyn PermissionGate>,
    /// 串行化 读取-决策-写入
    toggle_lock: Mutex<()>,
}

impl TileHost {
    pub fn new(
        engine: ModeCycleEngine,
        settings: Arc<dyn SystemDnsSettings>,
        gate: Arc<dyn PermissionGate>,
    ) -> Self {
        Self {
            engine,
            settings,
            gate,
            toggle_lock: Mutex::new(()),
        }
    }

    pub fn engine(&self) -> &ModeCycleEngine {
        &self.engine
    }

    /// 磁贴被添加到面板
    pub fn on_tile_added(&self) -> TileUpdate {
        let notice = (!self.gate.is_granted()).then(|| {
            warn!(notice = Notice::PermissionMissing.message(), "tile notice");
            Notice::PermissionMissing
        });
        TileUpdate {
            projection: Some(TileProjection::placeholder(self.engine.labels())),
            applied: None,
            notice,
        }
    }

    /// 用户点击磁贴
    pub fn on_click(&self) -> Result<TileUpdate> {
        if !self.gate.is_granted() {
            return Ok(TileUpdate::notice(Notice::PermissionMissing));
        }

        let _guard = self
            .toggle_lock
            .lock()
            .map_err(|_| ToggleError::Poisoned("toggle"))?;
        let observed = self.settings.observe()?;
        let transition = self.engine.on_toggle(&observed)?;
        self.settings
            .apply(transition.mode, transition.resolver.as_deref())?;

        info!(
            from = %observed.mode,
            to = transition.mode.as_str(),
            resolver = transition.resolver.as_deref().unwrap_or("-"),
            "private dns mode changed"
        );

        let projection = self.engine.project_transition(&transition);
        let notice = projection.is_none().then(|| {
            warn!(notice = Notice::ResolverMissing.message(), "tile notice");
            Notice::ResolverMissing
        });
        Ok(TileUpdate {
            projection,
            applied: Some(transition),
            notice,
        })
    }

    /// 磁贴变为可见，只读刷新
    pub fn on_start_listening(&self) -> Result<TileUpdate> {
        if !self.gate.is_granted() {
            return Ok(TileUpdate::notice(Notice::PermissionMissing));
        }

        let observed = self.settings.observe()?;
        match self.engine.project_for_display(&observed) {
            Some(projection) => Ok(TileUpdate {
                projection: Some(projection),
                ..Default::default()
            }),
            None => Ok(TileUpdate::notice(Notice::ResolverMissing)),
        }
    }
}
