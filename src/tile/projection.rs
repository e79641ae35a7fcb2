use serde::{Deserialize, Serialize};

/// 磁贴图标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TileIcon {
    Off,
    Auto,
    Private,
    Unknown,
}

/// 磁贴显示状态（只计算，不持久化）
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TileProjection {
    pub active: bool,
    pub label: String,
    pub icon: TileIcon,
}

impl TileProjection {
    /// 刚添加磁贴时的占位状态
    pub fn placeholder(labels: &TileLabels) -> Self {
        Self {
            active: false,
            label: labels.unknown.clone(),
            icon: TileIcon::Unknown,
        }
    }
}

/// 固定文案，宿主可按语言覆盖
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TileLabels {
    #[serde(default = "default_off")]
    pub off: String,
    #[serde(default = "default_unknown")]
    pub unknown: String,
    #[serde(default = "default_auto")]
    pub auto: String,
}

impl Default for TileLabels {
    fn default() -> Self {
        Self {
            off: default_off(),
            unknown: default_unknown(),
            auto: default_auto(),
        }
    }
}

fn default_off() -> String {
    "DNS off".to_string()
}

fn default_unknown() -> String {
    "DNS unknown".to_string()
}

fn default_auto() -> String {
    "DNS auto".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_json_shape() {
        let p = TileProjection {
            active: true,
            label: "dns.google".into(),
            icon: TileIcon::Private,
        };
        let json = serde_json::to_string(&p).unwrap();
        assert_eq!(json, r#"{"active":true,"label":"dns.google","icon":"private"}"#);
    }

    #[test]
    fn labels_partial_override() {
        let labels: TileLabels = serde_yml::from_str("off: \"Aus\"").unwrap();
        assert_eq!(labels.off, "Aus");
        assert_eq!(labels.auto, "DNS auto");
    }
}
