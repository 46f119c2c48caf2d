//! 输出落盘：`<out>/<lang>/<namespace>.json` 与 `<out>/<stem>.warnings.log`

use std::path::{Path, PathBuf};

use crate::model::data_core::{Split, SplitError, Warning};
use crate::utils::fs::{ensure_dir, ensure_file, remove_if_exists, write_json_pretty, write_text};

pub const PLACEHOLDER_CONTENT: &str = "{}";
pub const WARNINGS_SUFFIX: &str = ".warnings.log";

/// 一次落盘操作的结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterializeSummary {
    /// 写入了内容的命名空间文件
    pub written: Vec<PathBuf>,
    /// 新建的空占位文件
    pub placeholders: Vec<PathBuf>,
    pub warnings_file: Option<PathBuf>,
    pub removed_stale_warnings: bool,
}

pub struct Materializer<'a> {
    output_dir: &'a Path,
}

impl<'a> Materializer<'a> {
    pub fn new(output_dir: &'a Path) -> Self {
        Self { output_dir }
    }

    pub fn namespace_file(&self, language: &str, namespace: &str) -> PathBuf {
        self.output_dir
            .join(language)
            .join(format!("{}.json", namespace))
    }

    /// 以源文件名（去掉扩展名）命名
    pub fn warnings_file(&self, source: &Path) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.output_dir.join(format!("{}{}", stem, WARNINGS_SUFFIX))
    }

    pub fn materialize(&self, source: &Path, split: &Split) -> Result<MaterializeSummary, SplitError> {
        for name in split.languages.iter().chain(split.namespaces.iter().map(String::as_str)) {
            check_file_name(name)?;
        }

        let mut summary = MaterializeSummary::default();
        ensure_dir(self.output_dir)?;

        for lang in split.languages.iter() {
            ensure_dir(&self.output_dir.join(lang))?;
        }

        // 每个（语言, 命名空间）组合都要有文件，哪怕没有任何条目。
        // 已存在的文件不动：某语言在该命名空间下不再有条目时，上次生成的内容会保留
        for lang in split.languages.iter() {
            for ns in &split.namespaces {
                let file = self.namespace_file(lang, ns);
                if ensure_file(&file, PLACEHOLDER_CONTENT)? {
                    summary.placeholders.push(file);
                }
            }
        }

        for (lang, structure) in &split.partition.per_language {
            for (ns, subtree) in structure {
                let file = self.namespace_file(lang, ns);
                write_json_pretty(&file, subtree)?;
                tracing::debug!("写入 {}", file.display());
                summary.written.push(file);
            }
        }

        let warnings_file = self.warnings_file(source);
        if split.warnings.is_empty() {
            summary.removed_stale_warnings = remove_if_exists(&warnings_file)?;
        } else {
            write_text(&warnings_file, &render_warnings(source, &split.warnings))?;
            summary.warnings_file = Some(warnings_file);
        }

        Ok(summary)
    }
}

/// 首行标明源文件，其后每行一条警告
pub fn render_warnings(source: &Path, warnings: &[Warning]) -> String {
    let mut lines = Vec::with_capacity(warnings.len() + 1);
    lines.push(format!("--- Warnings for {} ---", source.display()));
    lines.extend(warnings.iter().map(|w| w.to_string()));
    lines.join("\n")
}

/// 语言代码和命名空间会直接成为路径的一部分
fn check_file_name(name: &str) -> Result<(), SplitError> {
    let bad = name.is_empty()
        || name == "."
        || name == ".."
        || name.contains(['/', '\\'])
        || name.contains('\0');
    if bad {
        return Err(SplitError::UnsafeName(name.to_string()));
    }
    Ok(())
}
