pub mod error;

pub use error::{Result, ToggleError, ToggleErrorKind};

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// `prefs.json` -> `prefs.json.tmp`，保留原扩展名，避免不同文件共用临时文件
fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// 原子写入：先写临时文件再重命名，读方不会看到写了一半的内容
pub fn write_atomic(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let tmp_path = tmp_path_for(path);
    std::fs::write(&tmp_path, content)?;
    std::fs::rename(&tmp_path, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_atomic_creates_parent_and_leaves_no_tmp() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a").join("b.json");
        write_atomic(&path, "{}").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}");
        assert!(!tmp_path_for(&path).exists());
        assert_eq!(std::fs::read_dir(path.parent().unwrap()).unwrap().count(), 1);
    }

    #[test]
    fn tmp_name_keeps_extension() {
        let json = tmp_path_for(Path::new("/data/prefs.json"));
        let yaml = tmp_path_for(Path::new("/data/prefs.yaml"));
        assert_eq!(json, Path::new("/data/prefs.json.tmp"));
        assert_eq!(yaml, Path::new("/data/prefs.yaml.tmp"));
        assert_ne!(json, yaml);
    }

    #[test]
    fn sibling_files_differing_by_extension_both_written() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("state.json");
        let b = dir.path().join("state.yaml");
        write_atomic(&a, "a").unwrap();
        write_atomic(&b, "b").unwrap();
        assert_eq!(std::fs::read_to_string(&a).unwrap(), "a");
        assert_eq!(std::fs::read_to_string(&b).unwrap(), "b");
    }
}
