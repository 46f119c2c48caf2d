//! 运行配置：输入（单个文件或目录）与输出目录

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::model::data_core::SplitError;
use crate::utils::fs::read_source;

pub const DEFAULT_INPUT: &str = "src/i18n";
pub const DEFAULT_OUTPUT: &str = "public/locales";

/// 可从 JSON 配置文件读取，键名与前端插件选项一致（`inputDir` / `outputDir`）
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SplitConfig {
    #[serde(alias = "input")]
    pub input_dir: PathBuf,
    #[serde(alias = "output")]
    pub output_dir: PathBuf,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

impl SplitConfig {
    pub fn from_file(p: &Path) -> Result<Self, SplitError> {
        let text = read_source(p)?;
        serde_json::from_str(&text).map_err(|source| SplitError::Parse {
            path: p.to_path_buf(),
            source,
        })
    }

    /// 命令行给出的值优先于配置文件
    pub fn with_overrides(mut self, input: Option<PathBuf>, output: Option<PathBuf>) -> Self {
        if let Some(input) = input {
            self.input_dir = input;
        }
        if let Some(output) = output {
            self.output_dir = output;
        }
        self
    }

    /// 输入是目录时走批量处理
    pub fn is_batch(&self) -> bool {
        self.input_dir.is_dir()
    }
}
