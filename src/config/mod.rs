pub mod types;

use anyhow::Result;
use std::path::Path;

pub use types::{Config, LogConfig};

/// 展开 `${VAR}` 与 `${VAR:-default}`，未定义的变量展开为空
pub fn expand_env_vars(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(start) = rest.find("${") {
        result.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            result.push_str(&rest[start..]);
            return result;
        };
        let expr = &after[..end];
        let value = match expr.split_once(":-") {
            Some((name, default)) => std::env::var(name)
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string()),
            None => std::env::var(expr).unwrap_or_default(),
        };
        result.push_str(&value);
        rest = &after[end + 1..];
    }
    result.push_str(rest);
    result
}

pub fn load_config(path: &str) -> Result<Config> {
    let raw = std::fs::read_to_string(Path::new(path))?;
    parse_config(&raw)
}

pub fn parse_config(content: &str) -> Result<Config> {
    let content = expand_env_vars(content);
    // 空文件等同于全部默认值
    let config: Config = if content.trim().is_empty() {
        Config::default()
    } else {
        serde_yml::from_str(&content)?
    };
    config.validate()?;
    Ok(config)
}
