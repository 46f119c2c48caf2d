//! 多语言翻译源文件拆分工具库
//!
//! 把一个嵌套的翻译源文档（命名空间 → 分组 → 语言 → 文本）拆成
//! `<输出目录>/<语言>/<命名空间>.json`，并报告缺失的语言

pub mod config;
pub mod model;
pub mod pipeline;
pub mod utils;

// 重新导出主要类型
pub use config::SplitConfig;
pub use model::data_core::{split, Split, SplitError, Warning};
pub use model::source_tree::{KeyPath, LanguageSet, Node, SourceTree};
pub use pipeline::process::{process_dir, process_file, process_source, BatchReport, DocumentReport};
pub use utils::jsonc::{SourceFormat, TreeParser};
