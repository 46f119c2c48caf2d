//! 入口：处理单个源文档，或按顺序处理目录中的全部源文档

use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::data_core::{split, SplitError, Warning};
use crate::model::source_tree::SourceTree;
use crate::pipeline::materializer::{MaterializeSummary, Materializer};
use crate::utils::fs::read_source;
use crate::utils::jsonc::{SourceFormat, TreeParser};

#[derive(Debug, Clone)]
pub struct DocumentReport {
    pub source: PathBuf,
    pub namespaces: Vec<String>,
    pub languages: Vec<String>,
    pub warnings: Vec<Warning>,
    pub summary: MaterializeSummary,
}

/// 批量处理结果；单个文档失败不影响其余文档
#[derive(Debug, Default)]
pub struct BatchReport {
    pub documents: Vec<DocumentReport>,
    pub failures: Vec<(PathBuf, SplitError)>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn warning_count(&self) -> usize {
        self.documents.iter().map(|d| d.warnings.len()).sum()
    }
}

/// 读取、解析、拆分并写出一个源文件
pub fn process_file(input: &Path, output_dir: &Path) -> Result<DocumentReport, SplitError> {
    let format = SourceFormat::from_path(input)?;
    let text = read_source(input)?;
    process_source(&text, format.parser(), input, output_dir)
}

/// 处理已读入内存的源文本；`source` 只用于报错与警告文件命名
pub fn process_source(
    text: &str,
    parser: &dyn TreeParser,
    source: &Path,
    output_dir: &Path,
) -> Result<DocumentReport, SplitError> {
    // 解析失败时不写任何文件
    let value = parser.parse(text).map_err(|e| SplitError::Parse {
        path: source.to_path_buf(),
        source: e,
    })?;
    let tree = SourceTree::from_value(value)?;
    let split = split(&tree);

    let summary = Materializer::new(output_dir).materialize(source, &split)?;
    tracing::info!(
        "{}: {} 个命名空间, {} 种语言, {} 条警告",
        source.display(),
        split.namespaces.len(),
        split.languages.len(),
        split.warnings.len()
    );

    Ok(DocumentReport {
        source: source.to_path_buf(),
        namespaces: split.namespaces,
        languages: split.languages.as_slice().to_vec(),
        warnings: split.warnings,
        summary,
    })
}

/// 目录下（不递归）所有 .json / .jsonc 文件，按文件名排序
pub fn list_sources(input_dir: &Path) -> Result<Vec<PathBuf>, SplitError> {
    let io_err = |source: std::io::Error| SplitError::Io {
        path: input_dir.to_path_buf(),
        source,
    };
    let mut files = Vec::new();
    for entry in fs::read_dir(input_dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && SourceFormat::is_supported(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// 逐个顺序处理，共享同一个输出目录
pub fn process_dir(input_dir: &Path, output_dir: &Path) -> Result<BatchReport, SplitError> {
    let files = list_sources(input_dir)?;
    tracing::info!("在 {} 中找到 {} 个源文件", input_dir.display(), files.len());

    let mut report = BatchReport::default();
    // 警告报告按文件名（去掉扩展名）命名，同名的后来者不处理
    let mut stems: HashMap<OsString, PathBuf> = HashMap::new();
    for file in files {
        let stem = file.file_stem().map(OsString::from).unwrap_or_default();
        if let Some(first) = stems.get(&stem) {
            let e = SplitError::DuplicateStem {
                path: file.clone(),
                first: first.clone(),
            };
            tracing::warn!("跳过 {}: {}", file.display(), e);
            report.failures.push((file, e));
            continue;
        }
        stems.insert(stem, file.clone());

        match process_file(&file, output_dir) {
            Ok(doc) => report.documents.push(doc),
            Err(e) => {
                tracing::warn!("处理 {} 失败: {}", file.display(), e);
                report.failures.push((file, e));
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::jsonc::JsoncParser;
    use tempfile::TempDir;

    #[test]
    fn test_parse_failure_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("out");

        let err = process_source("{ not json", &JsoncParser, Path::new("bad.jsonc"), &out).unwrap_err();
        assert!(matches!(err, SplitError::Parse { .. }));
        assert!(!out.exists(), "解析失败时不应创建输出目录");
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = TempDir::new().unwrap();
        let input = dir.path().join("lang.yaml");
        fs::write(&input, "a: b").unwrap();

        assert!(matches!(
            process_file(&input, dir.path()),
            Err(SplitError::UnsupportedExtension(_))
        ));
    }

    #[test]
    fn test_list_sources_filters_and_sorts() {
        let dir = TempDir::new().unwrap();
        for name in ["second.jsonc", "first.json", "notes.txt"] {
            fs::write(dir.path().join(name), "{}").unwrap();
        }
        fs::create_dir(dir.path().join("nested.json")).unwrap();

        let files = list_sources(dir.path()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["first.json", "second.jsonc"]);
    }

    #[test]
    fn test_report_counts() {
        let dir = TempDir::new().unwrap();
        let doc = process_source(
            r#"{"one": {"a": {"en": "1"}, "b": {"he": "2"}}}"#,
            &JsoncParser,
            Path::new("lang.json"),
            dir.path(),
        )
        .unwrap();

        assert_eq!(doc.namespaces, vec!["one"]);
        assert_eq!(doc.languages, vec!["en", "he"]);

        let batch = BatchReport {
            documents: vec![doc],
            failures: Vec::new(),
        };
        assert!(batch.is_success());
        assert_eq!(batch.warning_count(), 2);
    }
}
