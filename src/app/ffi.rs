//! FFI 层：以 C ABI 导出磁贴宿主，供原生 UI 或其他语言调用。
//!
//! 所有导出函数使用统一约定：
//! - 句柄由 `privdns_tile_new` 创建、`privdns_tile_free` 释放；传入空句柄属于调用方 bug，直接 panic
//! - 返回 i32: 0 = 成功, -3 = 参数错误, -4 = 内部错误
//! - 返回 *mut c_char: Rust 分配的 JSON 字符串，调用方需通过 `privdns_free_string` 释放；出错时为 null

use std::ffi::{CStr, CString};
use std::os::raw::c_char;

use serde::Serialize;

use crate::app::build_host;
use crate::common::error::ToggleError;
use crate::config::{parse_config, Config};
use crate::tile::TileHost;

/// 不透明句柄
pub struct TileHandle {
    host: TileHost,
}

// ─── Helpers ────────────────────────────────────────────────────────────────

/// 将 Rust String 转为堆分配的 C 字符串指针
fn to_c_string(s: &str) -> *mut c_char {
    match CString::new(s) {
        Ok(cs) => cs.into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

fn to_c_json<T: Serialize>(value: &T) -> *mut c_char {
    match serde_json::to_string(value) {
        Ok(json) => to_c_string(&json),
        Err(_) => std::ptr::null_mut(),
    }
}

/// 安全地从 C 字符串指针读取 &str
unsafe fn from_c_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

/// 解引用句柄；空句柄是编程错误
unsafe fn host<'a>(handle: *const TileHandle) -> &'a TileHost {
    assert!(!handle.is_null(), "privdns: null tile handle");
    &(*handle).host
}

fn status(result: Result<(), ToggleError>) -> i32 {
    match result {
        Ok(()) => 0,
        Err(e) if e.is_user_error() => -3,
        Err(e) => {
            tracing::error!(error = %e, kind = e.kind().as_str(), "ffi call failed");
            -4
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// 生命周期
// ═══════════════════════════════════════════════════════════════════════════

/// 创建磁贴宿主
///
/// # Safety
/// `config_yaml` 为 null（使用默认配置）或合法的 C 字符串指针
#[no_mangle]
pub unsafe extern "C" fn privdns_tile_new(config_yaml: *const c_char) -> *mut TileHandle {
    let config = if config_yaml.is_null() {
        Config::default()
    } else {
        let parsed = from_c_str(config_yaml).map(parse_config);
        match parsed {
            Some(Ok(c)) => c,
            Some(Err(e)) => {
                tracing::error!(error = %e, "invalid tile config");
                return std::ptr::null_mut();
            }
            None => return std::ptr::null_mut(),
        }
    };

    match build_host(&config) {
        Ok(host) => Box::into_raw(Box::new(TileHandle { host })),
        Err(e) => {
            tracing::error!(error = %e, "tile init error");
            std::ptr::null_mut()
        }
    }
}

/// 释放句柄
///
/// # Safety
/// `handle` 必须来自 `privdns_tile_new` 且只释放一次
#[no_mangle]
pub unsafe extern "C" fn privdns_tile_free(handle: *mut TileHandle) {
    if !handle.is_null() {
        drop(Box::from_raw(handle));
    }
}

/// 获取版本号
#[no_mangle]
pub extern "C" fn privdns_version() -> *mut c_char {
    to_c_string(env!("CARGO_PKG_VERSION"))
}

/// 释放 Rust 分配的字符串
///
/// # Safety
/// `s` 必须来自本模块返回的字符串
#[no_mangle]
pub unsafe extern "C" fn privdns_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// 磁贴事件
// ═══════════════════════════════════════════════════════════════════════════

/// 磁贴被添加
///
/// # Safety
/// `handle` 必须是有效句柄
#[no_mangle]
pub unsafe extern "C" fn privdns_tile_added(handle: *const TileHandle) -> *mut c_char {
    to_c_json(&host(handle).on_tile_added())
}

/// 磁贴被点击，返回 TileUpdate JSON
///
/// # Safety
/// `handle` 必须是有效句柄
#[no_mangle]
pub unsafe extern "C" fn privdns_tile_click(handle: *const TileHandle) -> *mut c_char {
    match host(handle).on_click() {
        Ok(update) => to_c_json(&update),
        Err(e) => {
            tracing::error!(error = %e, "tile click failed");
            std::ptr::null_mut()
        }
    }
}

/// 磁贴可见时刷新，返回 TileUpdate JSON
///
/// # Safety
/// `handle` 必须是有效句柄
#[no_mangle]
pub unsafe extern "C" fn privdns_tile_refresh(handle: *const TileHandle) -> *mut c_char {
    match host(handle).on_start_listening() {
        Ok(update) => to_c_json(&update),
        Err(e) => {
            tracing::error!(error = %e, "tile refresh failed");
            std::ptr::null_mut()
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// 偏好编辑
// ═══════════════════════════════════════════════════════════════════════════

/// 设置自动模式偏好（非 0 为开启）
///
/// # Safety
/// `handle` 必须是有效句柄
#[no_mangle]
pub unsafe extern "C" fn privdns_set_auto_mode(handle: *const TileHandle, enabled: i32) -> i32 {
    status(host(handle).engine().preferences().set_auto_mode(enabled != 0))
}

/// 追加解析服务器
///
/// # Safety
/// `handle` 必须是有效句柄，`hostname` 必须是合法的 C 字符串指针
#[no_mangle]
pub unsafe extern "C" fn privdns_add_resolver(
    handle: *const TileHandle,
    hostname: *const c_char,
) -> i32 {
    let prefs = host(handle).engine().preferences();
    let Some(hostname) = from_c_str(hostname) else {
        return -3;
    };
    status(prefs.add_resolver(hostname).map(|_| ()))
}

/// 删除指定位置的解析服务器
///
/// # Safety
/// `handle` 必须是有效句柄
#[no_mangle]
pub unsafe extern "C" fn privdns_remove_resolver(handle: *const TileHandle, position: i32) -> i32 {
    let prefs = host(handle).engine().preferences();
    let Ok(position) = usize::try_from(position) else {
        return -3;
    };
    status(prefs.remove_resolver(position).map(|_| ()))
}

/// 获取解析服务器列表（JSON 数组）
///
/// # Safety
/// `handle` 必须是有效句柄
#[no_mangle]
pub unsafe extern "C" fn privdns_list_resolvers(handle: *const TileHandle) -> *mut c_char {
    match host(handle).engine().preferences().resolver_list() {
        Ok(list) => to_c_json(&list.entries()),
        Err(_) => std::ptr::null_mut(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    unsafe fn take_string(ptr: *mut c_char) -> String {
        assert!(!ptr.is_null());
        let s = CStr::from_ptr(ptr).to_str().unwrap().to_string();
        privdns_free_string(ptr);
        s
    }

    fn config_in(dir: &std::path::Path) -> CString {
        CString::new(format!(
            "preferences_path: {}\nsettings_path: {}\n",
            dir.join("prefs.json").display(),
            dir.join("settings.json").display()
        ))
        .unwrap()
    }

    #[test]
    fn click_cycle_through_c_abi() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        unsafe {
            let handle = privdns_tile_new(config.as_ptr());
            assert!(!handle.is_null());

            let host_name = CString::new("dns.quad9.net").unwrap();
            assert_eq!(privdns_add_resolver(handle, host_name.as_ptr()), 0);

            // 初始无模式 → 按 Auto 处理 → Private 第一个
            let json = take_string(privdns_tile_click(handle));
            assert!(json.contains("\"label\":\"dns.quad9.net\""));
            assert!(json.contains("\"mode\":\"hostname\""));

            let json = take_string(privdns_tile_click(handle));
            assert!(json.contains("\"mode\":\"off\""));

            let json = take_string(privdns_tile_refresh(handle));
            assert!(json.contains("\"label\":\"DNS off\""));

            privdns_tile_free(handle);
        }
    }

    #[test]
    fn resolver_editing_status_codes() {
        let dir = tempfile::tempdir().unwrap();
        let config = config_in(dir.path());
        unsafe {
            let handle = privdns_tile_new(config.as_ptr());
            let bad = CString::new("a,b").unwrap();
            assert_eq!(privdns_add_resolver(handle, bad.as_ptr()), -3);
            assert_eq!(privdns_add_resolver(handle, std::ptr::null()), -3);
            assert_eq!(privdns_remove_resolver(handle, 7), -3);
            assert_eq!(privdns_remove_resolver(handle, -1), -3);
            assert_eq!(privdns_set_auto_mode(handle, 1), 0);
            assert_eq!(take_string(privdns_list_resolvers(handle)), r#"[""]"#);
            privdns_tile_free(handle);
        }
    }

    #[test]
    fn invalid_config_yields_null_handle() {
        let config = CString::new("labels:\n  off: \"\"\n").unwrap();
        unsafe {
            assert!(privdns_tile_new(config.as_ptr()).is_null());
        }
    }

    #[test]
    #[should_panic(expected = "null tile handle")]
    fn null_handle_panics() {
        // extern "C" 函数内 panic 会直接 abort，这里测内部的解引用
        unsafe {
            host(std::ptr::null());
        }
    }

    #[test]
    fn version_string() {
        unsafe {
            assert_eq!(take_string(privdns_version()), env!("CARGO_PKG_VERSION"));
        }
    }
}
