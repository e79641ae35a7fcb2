//! Android JNI 桥接
//!
//! Java 侧的 TileService 负责权限检查与 Settings.Global 读写，
//! 把读到的 `private_dns_mode` / `private_dns_specifier` 原样传进来，
//! 内核返回决策 JSON。偏好仍由内核按文件路径存储。
//! 非 Android 平台只编译方法表与纯 Rust 入口，便于测试。

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::common::error::Result;
use crate::dns::mode::SystemDnsState;
use crate::prefs::{JsonFileStore, Preferences};
use crate::tile::{ModeCycleEngine, Notice, TileProjection, Transition};

pub const BRIDGE_CLASS: &str = "io/privdns/toggle/NativeBridge";

/// JNI 方法签名
#[derive(Debug, Clone)]
pub struct JniMethodSignature {
    pub class: &'static str,
    pub method: &'static str,
    pub signature: &'static str,
}

impl JniMethodSignature {
    pub const fn new(class: &'static str, method: &'static str, signature: &'static str) -> Self {
        Self {
            class,
            method,
            signature,
        }
    }

    /// 检查签名格式：`(参数)返回类型`，返回类型为基本类型、对象或数组
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.class.is_empty() || self.method.is_empty() {
            return Err("class and method names cannot be empty".to_string());
        }
        let Some(params) = self.signature.strip_prefix('(') else {
            return Err(format!("signature must start with '(': {}", self.signature));
        };
        let Some((_, ret)) = params.split_once(')') else {
            return Err(format!("signature must contain ')': {}", self.signature));
        };
        match ret.chars().next() {
            Some('V' | 'Z' | 'B' | 'C' | 'S' | 'I' | 'J' | 'F' | 'D' | '[') => Ok(()),
            Some('L') if ret.ends_with(';') => Ok(()),
            _ => Err(format!("invalid return type descriptor: '{ret}'")),
        }
    }

    /// JNI 导出函数名（Java_io_privdns_toggle_NativeBridge_method 格式）
    pub fn export_name(&self) -> String {
        format!("Java_{}_{}", self.class.replace(['/', '.'], "_"), self.method)
    }
}

/// 桥接导出的全部方法
pub fn bridge_methods() -> [JniMethodSignature; 2] {
    [
        JniMethodSignature::new(
            BRIDGE_CLASS,
            "onClick",
            "(Ljava/lang/String;Ljava/lang/String;Ljava/lang/String;)Ljava/lang/String;",
        ),
        JniMethodSignature::new(
            BRIDGE_CLASS,
            "onStartListening",
            "(Ljava/lang/String;Ljava/lang/String;Ljava/lang/String;)Ljava/lang/String;",
        ),
    ]
}

/// 点击结果：Java 侧据此写入系统设置并刷新磁贴
#[derive(Debug, Serialize)]
pub struct ClickReply {
    pub transition: Transition,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<TileProjection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

/// 刷新结果
#[derive(Debug, Serialize)]
pub struct RefreshReply {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<TileProjection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<Notice>,
}

fn engine_for(prefs_path: &str) -> ModeCycleEngine {
    let store = JsonFileStore::load_or_default(PathBuf::from(prefs_path));
    ModeCycleEngine::new(Preferences::new(Arc::new(store)))
}

pub fn click(prefs_path: &str, mode: Option<&str>, specifier: Option<&str>) -> Result<ClickReply> {
    let engine = engine_for(prefs_path);
    let transition = engine.on_toggle(&SystemDnsState::from_raw(mode, specifier))?;
    let projection = engine.project_transition(&transition);
    let notice = projection.is_none().then_some(Notice::ResolverMissing);
    Ok(ClickReply {
        transition,
        projection,
        notice,
    })
}

pub fn refresh(prefs_path: &str, mode: Option<&str>, specifier: Option<&str>) -> RefreshReply {
    let engine = engine_for(prefs_path);
    match engine.project_for_display(&SystemDnsState::from_raw(mode, specifier)) {
        Some(projection) => RefreshReply {
            projection: Some(projection),
            notice: None,
        },
        None => RefreshReply {
            projection: None,
            notice: Some(Notice::ResolverMissing),
        },
    }
}

#[cfg(feature = "android")]
#[allow(non_snake_case)]
mod jni_exports {
    use std::sync::Once;

    use jni::objects::{JClass, JString};
    use jni::sys::jstring;
    use jni::JNIEnv;

    static LOGGER: Once = Once::new();

    fn init_logger() {
        LOGGER.call_once(|| {
            android_logger::init_once(
                android_logger::Config::default()
                    .with_max_level(log::LevelFilter::Info)
                    .with_tag("privdns"),
            );
        });
    }

    fn opt_string(env: &mut JNIEnv, s: &JString) -> Option<String> {
        if s.is_null() {
            return None;
        }
        env.get_string(s).ok().map(Into::into)
    }

    fn reply(env: &mut JNIEnv, json: Option<String>) -> jstring {
        match json.and_then(|j| env.new_string(j).ok()) {
            Some(s) => s.into_raw(),
            None => std::ptr::null_mut(),
        }
    }

    #[no_mangle]
    pub extern "system" fn Java_io_privdns_toggle_NativeBridge_onClick(
        mut env: JNIEnv,
        _class: JClass,
        prefs_path: JString,
        mode: JString,
        specifier: JString,
    ) -> jstring {
        init_logger();
        let Some(prefs_path) = opt_string(&mut env, &prefs_path) else {
            return std::ptr::null_mut();
        };
        let mode = opt_string(&mut env, &mode);
        let specifier = opt_string(&mut env, &specifier);

        let json = match super::click(&prefs_path, mode.as_deref(), specifier.as_deref()) {
            Ok(r) => {
                if let Some(notice) = r.notice {
                    log::warn!("{}", notice.message());
                }
                serde_json::to_string(&r).ok()
            }
            Err(e) => {
                log::error!("toggle failed: {e}");
                None
            }
        };
        reply(&mut env, json)
    }

    #[no_mangle]
    pub extern "system" fn Java_io_privdns_toggle_NativeBridge_onStartListening(
        mut env: JNIEnv,
        _class: JClass,
        prefs_path: JString,
        mode: JString,
        specifier: JString,
    ) -> jstring {
        init_logger();
        let Some(prefs_path) = opt_string(&mut env, &prefs_path) else {
            return std::ptr::null_mut();
        };
        let mode = opt_string(&mut env, &mode);
        let specifier = opt_string(&mut env, &specifier);

        let r = super::refresh(&prefs_path, mode.as_deref(), specifier.as_deref());
        if let Some(notice) = r.notice {
            log::warn!("{}", notice.message());
        }
        reply(&mut env, serde_json::to_string(&r).ok())
    }
}
