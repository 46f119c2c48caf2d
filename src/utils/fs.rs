//! IO helper: read sources, write pretty JSON and reports

use std::fs;
use std::io;
use std::path::Path;

use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::Value;

use crate::model::data_core::SplitError;

fn io_at(path: &Path) -> impl FnOnce(io::Error) -> SplitError + '_ {
    move |source| SplitError::Io {
        path: path.to_path_buf(),
        source,
    }
}

/// 读取 UTF-8 源文件
pub fn read_source(p: &Path) -> Result<String, SplitError> {
    fs::read_to_string(p).map_err(io_at(p))
}

pub fn ensure_dir(p: &Path) -> Result<(), SplitError> {
    fs::create_dir_all(p).map_err(io_at(p))
}

/// 4 空格缩进、无结尾换行的 JSON 文本
pub fn to_pretty_json(value: &Value, p: &Path) -> Result<String, SplitError> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut ser)
        .map_err(|source| SplitError::Serialize {
            path: p.to_path_buf(),
            source,
        })?;
    // serde_json 只输出合法 UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// 将JSON数据保存到文件（截断后写入）
pub fn write_json_pretty(p: &Path, value: &Value) -> Result<(), SplitError> {
    let text = to_pretty_json(value, p)?;
    write_text(p, &text)
}

pub fn write_text(p: &Path, text: &str) -> Result<(), SplitError> {
    fs::write(p, text).map_err(io_at(p))
}

/// 文件不存在时写入默认内容；返回是否新建
pub fn ensure_file(p: &Path, default: &str) -> Result<bool, SplitError> {
    if p.exists() {
        return Ok(false);
    }
    write_text(p, default)?;
    Ok(true)
}

/// 返回是否真的删除了文件
pub fn remove_if_exists(p: &Path) -> Result<bool, SplitError> {
    match fs::remove_file(p) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(io_at(p)(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_pretty_json_uses_four_spaces() {
        let text = to_pretty_json(&json!({"key": "v", "key3": {"nested": "n"}}), Path::new("x.json")).unwrap();
        assert_eq!(
            text,
            "{\n    \"key\": \"v\",\n    \"key3\": {\n        \"nested\": \"n\"\n    }\n}"
        );
    }

    #[test]
    fn test_write_truncates_existing_content() {
        let dir = TempDir::new().expect("创建临时目录失败");
        let file = dir.path().join("one.json");
        write_text(&file, &"x".repeat(200)).unwrap();

        write_json_pretty(&file, &json!({"a": "ערך"})).unwrap();
        let content = fs::read_to_string(&file).unwrap();
        assert_eq!(content, "{\n    \"a\": \"ערך\"\n}");
    }

    #[test]
    fn test_ensure_file_does_not_overwrite() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("one.json");

        assert!(ensure_file(&file, "{}").unwrap());
        write_text(&file, "{\"a\": 1}").unwrap();
        assert!(!ensure_file(&file, "{}").unwrap());
        assert_eq!(fs::read_to_string(&file).unwrap(), "{\"a\": 1}");
    }

    #[test]
    fn test_remove_if_exists() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("lang.warnings.log");
        assert!(!remove_if_exists(&file).unwrap());
        write_text(&file, "w").unwrap();
        assert!(remove_if_exists(&file).unwrap());
        assert!(!file.exists());
    }

    #[test]
    fn test_read_missing_file_reports_path() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");
        match read_source(&missing) {
            Err(SplitError::Io { path, .. }) => assert_eq!(path, missing),
            other => panic!("应该返回IO错误: {:?}", other),
        }
    }
}
