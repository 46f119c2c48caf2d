//! 拆分核心：按（命名空间, 语言）分组、重建嵌套结构、校验语言完整性

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::source_tree::{FlatEntry, KeyPath, LanguageSet, SourceTree};

#[derive(Error, Debug)]
pub enum SplitError {
    #[error("IO失败: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("JSON解析失败: {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("JSON序列化失败: {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("根节点必须是对象，实际是 {found}")]
    NotAnObject { found: &'static str },
    #[error("命名空间 \"{0}\" 必须是对象")]
    InvalidNamespace(String),
    #[error("名称不能用作文件名: \"{0}\"")]
    UnsafeName(String),
    #[error("不支持的文件类型: {0}")]
    UnsupportedExtension(PathBuf),
    #[error("警告报告重名: {path} 与 {first} 的文件名相同")]
    DuplicateStem { path: PathBuf, first: PathBuf },
}

/// 重建路径时遇到的类型冲突：标量挡住了分组，或目标位置已有值
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathConflict {
    pub path: KeyPath,
}

/// 写入警告报告的一行
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    MissingLanguage { language: String, path: KeyPath },
    Conflict { language: String, path: KeyPath },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MissingLanguage { language, path } => {
                write!(f, "Missing language \"{}\" for key \"{}\"", language, path)
            }
            Warning::Conflict { language, path } => {
                write!(
                    f,
                    "Conflicting value for key \"{}\" in language \"{}\"",
                    path, language
                )
            }
        }
    }
}

/// 按路径逐级创建对象并在最后一段写入值；已有的兄弟键保持不变
pub fn assign_path(
    target: &mut Map<String, Value>,
    path: &KeyPath,
    value: Value,
) -> Result<(), PathConflict> {
    let conflict = || PathConflict { path: path.clone() };
    let Some((last, parents)) = path.segments().split_last() else {
        return Err(conflict());
    };

    let mut current = target;
    for segment in parents {
        current = match current
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()))
        {
            Value::Object(map) => map,
            _ => return Err(conflict()),
        };
    }

    if current.contains_key(last) {
        return Err(conflict());
    }
    current.insert(last.clone(), value);
    Ok(())
}

/// 值路径（不含语言） → 出现过的语言，保持首次记录顺序
#[derive(Debug, Clone, Default)]
pub struct PresenceTable {
    entries: Vec<(KeyPath, Vec<String>)>,
    index: HashMap<KeyPath, usize>,
}

impl PresenceTable {
    pub fn record(&mut self, path: KeyPath, language: &str) {
        let slot = match self.index.get(&path) {
            Some(&i) => i,
            None => {
                self.index.insert(path.clone(), self.entries.len());
                self.entries.push((path, Vec::new()));
                self.entries.len() - 1
            }
        };
        let langs = &mut self.entries[slot].1;
        if !langs.iter().any(|l| l == language) {
            langs.push(language.to_string());
        }
    }

    pub fn get(&self, path: &KeyPath) -> Option<&[String]> {
        self.index.get(path).map(|&i| self.entries[i].1.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&KeyPath, &[String])> {
        self.entries.iter().map(|(p, l)| (p, l.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 分组结果：每种语言一个嵌套对象（命名空间 → …）
#[derive(Debug, Clone, Default)]
pub struct Partition {
    pub per_language: Vec<(String, Map<String, Value>)>,
    pub presence: PresenceTable,
    pub conflicts: Vec<Warning>,
}

impl Partition {
    pub fn structure(&self, language: &str) -> Option<&Map<String, Value>> {
        self.per_language
            .iter()
            .find(|(l, _)| l == language)
            .map(|(_, s)| s)
    }
}

/// 把叶子按（命名空间, 语言）分组，去掉语言段后重建到对应语言的结构中
pub fn partition(flat: &[FlatEntry], namespaces: &[String], languages: &LanguageSet) -> Partition {
    let mut per_language: Vec<(String, Map<String, Value>)> = languages
        .iter()
        .map(|l| (l.to_string(), Map::new()))
        .collect();
    let mut presence = PresenceTable::default();
    let mut conflicts = Vec::new();

    for ns in namespaces {
        for (lang, structure) in per_language.iter_mut() {
            let selected = flat.iter().filter(|e| {
                e.path.len() >= 2
                    && e.path.first() == Some(ns.as_str())
                    && e.path.last() == Some(lang.as_str())
            });
            for entry in selected {
                let Some(value_path) = entry.path.parent() else {
                    continue;
                };
                if let Err(PathConflict { path }) =
                    assign_path(structure, &value_path, entry.value.clone())
                {
                    tracing::warn!("路径冲突: {} ({})", path, lang);
                    conflicts.push(Warning::Conflict {
                        language: lang.clone(),
                        path,
                    });
                }
                presence.record(value_path, lang);
            }
        }
    }

    Partition {
        per_language,
        presence,
        conflicts,
    }
}

/// 对每个值路径检查所有语言是否齐全；外层按语言，内层按路径
pub fn validate(presence: &PresenceTable, languages: &LanguageSet) -> Vec<Warning> {
    let mut warnings = Vec::new();
    for lang in languages.iter() {
        for (path, present) in presence.iter() {
            if !present.iter().any(|l| l == lang) {
                warnings.push(Warning::MissingLanguage {
                    language: lang.to_string(),
                    path: path.clone(),
                });
            }
        }
    }
    warnings
}

/// 单个文档完整的内存拆分结果
#[derive(Debug, Clone)]
pub struct Split {
    pub namespaces: Vec<String>,
    pub languages: LanguageSet,
    pub partition: Partition,
    /// 缺失语言在前，冲突在后
    pub warnings: Vec<Warning>,
}

pub fn split(tree: &SourceTree) -> Split {
    let namespaces = tree.namespaces();
    let languages = tree.languages();
    let flat = tree.flatten();

    let partition = partition(&flat, &namespaces, &languages);
    let mut warnings = validate(&partition.presence, &languages);
    warnings.extend(partition.conflicts.iter().cloned());

    Split {
        namespaces,
        languages,
        partition,
        warnings,
    }
}
