//! 源树（Source Tree）：命名空间 → 分组 → 语言代码 → 翻译文本
//!
//! 顶层键是命名空间，叶子值的直接父键是语言代码。数组一律视为叶子。

use std::fmt;

use serde_json::Value;

use crate::model::data_core::SplitError;

/// 由键段组成的结构化路径，不依赖 `.` 拼接
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct KeyPath(Vec<String>);

impl KeyPath {
    pub fn new(segments: Vec<String>) -> Self {
        Self(segments)
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(String::as_str)
    }

    pub fn last(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    /// 去掉最后一段（语言代码）后的路径
    pub fn parent(&self) -> Option<KeyPath> {
        self.0
            .split_last()
            .map(|(_, rest)| KeyPath(rest.to_vec()))
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// 源树节点：标量叶子或有序分组
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(Value),
    Group(Vec<(String, Node)>),
}

impl Node {
    /// 对象递归转为分组，其余（包括数组）都是标量
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::Object(map) => Node::Group(
                map.into_iter()
                    .map(|(k, v)| (k, Node::from_value(v)))
                    .collect(),
            ),
            other => Node::Scalar(other),
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Node::Group(_))
    }
}

/// 一个叶子：完整路径（命名空间 … 语言）与其值
#[derive(Debug, Clone, PartialEq)]
pub struct FlatEntry {
    pub path: KeyPath,
    pub value: Value,
}

/// 去重后的语言集合，保持首次发现的顺序
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageSet(Vec<String>);

impl LanguageSet {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, lang: &str) -> bool {
        self.0.iter().any(|l| l == lang)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl FromIterator<String> for LanguageSet {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        let mut langs: Vec<String> = Vec::new();
        for lang in iter {
            if !langs.contains(&lang) {
                langs.push(lang);
            }
        }
        LanguageSet(langs)
    }
}

/// 整个翻译源文档
#[derive(Debug, Clone, PartialEq)]
pub struct SourceTree {
    namespaces: Vec<(String, Node)>,
}

impl SourceTree {
    /// 根必须是对象，且每个命名空间也必须是对象
    pub fn from_value(root: Value) -> Result<Self, SplitError> {
        let map = match root {
            Value::Object(map) => map,
            other => {
                return Err(SplitError::NotAnObject {
                    found: value_kind(&other),
                })
            }
        };

        let mut namespaces = Vec::with_capacity(map.len());
        for (key, value) in map {
            let node = Node::from_value(value);
            if !node.is_group() {
                return Err(SplitError::InvalidNamespace(key));
            }
            namespaces.push((key, node));
        }
        Ok(Self { namespaces })
    }

    /// 顶层命名空间，按文档顺序
    pub fn namespaces(&self) -> Vec<String> {
        self.namespaces.iter().map(|(k, _)| k.clone()).collect()
    }

    pub fn namespace(&self, name: &str) -> Option<&Node> {
        self.namespaces
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, node)| node)
    }

    /// 深度优先展开为叶子列表；空分组不产生任何条目
    pub fn flatten(&self) -> Vec<FlatEntry> {
        fn walk(out: &mut Vec<FlatEntry>, node: &Node, path: &mut Vec<String>) {
            match node {
                Node::Scalar(value) => out.push(FlatEntry {
                    path: KeyPath::new(path.clone()),
                    value: value.clone(),
                }),
                Node::Group(children) => {
                    for (key, child) in children {
                        path.push(key.clone());
                        walk(out, child, path);
                        path.pop();
                    }
                }
            }
        }

        let mut out = Vec::new();
        for (ns, node) in &self.namespaces {
            let mut path = vec![ns.clone()];
            walk(&mut out, node, &mut path);
        }
        out
    }

    /// 所有命名空间中出现的语言，按命名空间顺序去重
    pub fn languages(&self) -> LanguageSet {
        self.namespaces
            .iter()
            .flat_map(|(_, node)| discover_languages(node))
            .collect()
    }
}

/// 收集直接持有标量的键（即语言代码），保留重复项
pub fn discover_languages(node: &Node) -> Vec<String> {
    fn walk(out: &mut Vec<String>, node: &Node) {
        if let Node::Group(children) = node {
            for (key, child) in children {
                match child {
                    Node::Group(_) => walk(out, child),
                    Node::Scalar(_) => out.push(key.clone()),
                }
            }
        }
    }

    let mut out = Vec::new();
    walk(&mut out, node);
    out
}

fn value_kind(v: &Value) -> &'static str {
    match v {
        Value::Object(_) => "object",
        Value::Array(_) => "array",
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Bool(_) => "bool",
        Value::Null => "null",
    }
}
