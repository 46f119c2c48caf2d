//! 性能基准测试模块
//!
//! 生成多语言的大型源文档，测试解析、展开与拆分的耗时

use std::time::Instant;

use serde_json::{json, Map, Value};

use crate::model::data_core::split;
use crate::model::source_tree::SourceTree;

/// 性能测试结果
#[derive(Debug)]
pub struct PerformanceResult {
    pub operation: String,
    pub duration_ms: u128,
    pub success: bool,
    pub details: String,
}

impl PerformanceResult {
    pub fn new(operation: &str, duration_ms: u128, success: bool, details: &str) -> Self {
        Self {
            operation: operation.to_string(),
            duration_ms,
            success,
            details: details.to_string(),
        }
    }
}

/// 生成翻译源文档：每个命名空间下 `width` 个键，每隔一个键嵌套一层，直到 `depth`
pub fn generate_source_tree(namespaces: usize, depth: usize, width: usize, languages: &[&str]) -> Value {
    fn create_group(current_depth: usize, max_depth: usize, width: usize, languages: &[&str]) -> Value {
        let mut obj = Map::new();
        for i in 0..width {
            let key = format!("key_{}", i);
            let value = if i % 2 == 1 && current_depth + 1 < max_depth {
                create_group(current_depth + 1, max_depth, width, languages)
            } else {
                let mut leaf = Map::new();
                for lang in languages {
                    leaf.insert(lang.to_string(), json!(format!("{}_{}_{}", lang, current_depth, i)));
                }
                Value::Object(leaf)
            };
            obj.insert(key, value);
        }
        Value::Object(obj)
    }

    let mut root = Map::new();
    for n in 0..namespaces {
        root.insert(
            format!("namespace_{}", n),
            create_group(0, depth, width, languages),
        );
    }
    Value::Object(root)
}

/// 测试JSON解析性能
pub fn benchmark_json_parsing(json_str: &str) -> PerformanceResult {
    let start = Instant::now();
    let parse_result = serde_json::from_str::<Value>(json_str);
    let duration = start.elapsed();

    match parse_result {
        Ok(_) => PerformanceResult::new(
            "JSON解析",
            duration.as_millis(),
            true,
            &format!("解析了 {} 字节的JSON", json_str.len()),
        ),
        Err(e) => PerformanceResult::new(
            "JSON解析",
            duration.as_millis(),
            false,
            &format!("解析失败: {}", e),
        ),
    }
}

/// 测试展开性能
pub fn benchmark_flatten(tree: &SourceTree) -> PerformanceResult {
    let start = Instant::now();
    let flat = tree.flatten();
    let duration = start.elapsed();

    PerformanceResult::new(
        "展开",
        duration.as_millis(),
        !flat.is_empty(),
        &format!("展开了 {} 个叶子", flat.len()),
    )
}

/// 测试拆分（分组 + 校验）性能
pub fn benchmark_split(tree: &SourceTree) -> PerformanceResult {
    let start = Instant::now();
    let result = split(tree);
    let duration = start.elapsed();

    PerformanceResult::new(
        "拆分",
        duration.as_millis(),
        result.warnings.is_empty(),
        &format!(
            "{} 种语言, {} 个值路径",
            result.languages.len(),
            result.partition.presence.len()
        ),
    )
}

/// 运行综合性能测试
pub fn run_performance_suite() -> Vec<PerformanceResult> {
    let mut results = Vec::new();
    let languages = ["en", "he", "fr", "de"];

    // (命名空间数, 深度, 宽度)
    let test_cases = [(2, 3, 10), (5, 3, 20), (10, 4, 12)];

    for (namespaces, depth, width) in test_cases {
        let start = Instant::now();
        let value = generate_source_tree(namespaces, depth, width, &languages);
        results.push(PerformanceResult::new(
            &format!("数据生成({}x{}x{})", namespaces, depth, width),
            start.elapsed().as_millis(),
            true,
            "",
        ));

        match serde_json::to_string(&value) {
            Ok(text) => results.push(benchmark_json_parsing(&text)),
            Err(e) => results.push(PerformanceResult::new("JSON序列化", 0, false, &e.to_string())),
        }

        match SourceTree::from_value(value) {
            Ok(tree) => {
                results.push(benchmark_flatten(&tree));
                results.push(benchmark_split(&tree));
            }
            Err(e) => results.push(PerformanceResult::new("构建源树", 0, false, &e.to_string())),
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::source_tree::KeyPath;

    #[test]
    fn test_generate_source_tree_shape() {
        let value = generate_source_tree(2, 2, 3, &["en", "he"]);
        let obj = value.as_object().unwrap();
        assert_eq!(obj.len(), 2);
        assert_eq!(value["namespace_0"]["key_0"]["en"], json!("en_0_0"));
        assert_eq!(value["namespace_1"]["key_1"]["key_2"]["he"], json!("he_1_2"));
    }

    #[test]
    fn test_round_trip_on_generated_tree() {
        let languages = ["en", "he", "fr"];
        let value = generate_source_tree(3, 4, 6, &languages);
        let tree = SourceTree::from_value(value).unwrap();
        let result = split(&tree);

        assert!(result.warnings.is_empty(), "生成的数据所有语言齐全");
        // 每个叶子都能在对应语言的结构里按原路径找回
        for entry in tree.flatten() {
            let lang = entry.path.last().unwrap();
            let value_path: KeyPath = entry.path.parent().unwrap();
            let structure = Value::Object(result.partition.structure(lang).unwrap().clone());
            let found = value_path
                .segments()
                .iter()
                .fold(&structure, |node, segment| &node[segment.as_str()]);
            assert_eq!(found, &entry.value, "路径 {} 的值不一致", entry.path);
        }
    }

    #[test]
    fn test_performance_benchmarks() {
        let value = generate_source_tree(4, 3, 10, &["en", "he"]);
        let text = serde_json::to_string(&value).unwrap();
        let parse_result = benchmark_json_parsing(&text);
        assert!(parse_result.success);

        let tree = SourceTree::from_value(value).unwrap();
        let flatten_result = benchmark_flatten(&tree);
        assert!(flatten_result.success);
        assert!(flatten_result.duration_ms < 1000); // 应该在1秒内完成

        let split_result = benchmark_split(&tree);
        assert!(split_result.success);
        assert!(split_result.duration_ms < 5000);
    }

    #[test]
    fn test_performance_suite_succeeds() {
        let results = run_performance_suite();
        assert_eq!(results.len(), 12);
        for r in &results {
            assert!(r.success, "{} 失败: {}", r.operation, r.details);
        }
    }
}
