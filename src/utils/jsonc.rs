//! 源文本解析：严格 JSON 与带注释/尾逗号的 JSONC

use std::path::Path;

use serde_json::Value;

use crate::model::data_core::SplitError;

/// 把源文本解析为 JSON 值
pub trait TreeParser {
    fn parse(&self, text: &str) -> Result<Value, serde_json::Error>;
}

/// 严格 JSON
pub struct JsonParser;

impl TreeParser for JsonParser {
    fn parse(&self, text: &str) -> Result<Value, serde_json::Error> {
        serde_json::from_str(strip_bom(text))
    }
}

/// JSON with Comments：支持 `//`、`/* */` 注释与尾逗号
pub struct JsoncParser;

impl TreeParser for JsoncParser {
    fn parse(&self, text: &str) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&strip_jsonc(strip_bom(text)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Json,
    Jsonc,
}

impl SourceFormat {
    /// 按扩展名选择解析方式（不区分大小写）
    pub fn from_path(path: &Path) -> Result<Self, SplitError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match ext.as_deref() {
            Some("json") => Ok(SourceFormat::Json),
            Some("jsonc") => Ok(SourceFormat::Jsonc),
            _ => Err(SplitError::UnsupportedExtension(path.to_path_buf())),
        }
    }

    pub fn is_supported(path: &Path) -> bool {
        Self::from_path(path).is_ok()
    }

    pub fn parser(self) -> &'static dyn TreeParser {
        match self {
            SourceFormat::Json => &JsonParser,
            SourceFormat::Jsonc => &JsoncParser,
        }
    }
}

fn strip_bom(text: &str) -> &str {
    text.strip_prefix('\u{feff}').unwrap_or(text)
}

/// 去掉字符串外的注释，以及 `}` / `]` 前的尾逗号；换行保留以便报错行号不变
fn strip_jsonc(content: &str) -> String {
    let mut result = String::with_capacity(content.len());
    let mut chars = content.chars().peekable();
    let mut in_string = false;
    let mut escape_next = false;
    // 最近一个尚未确认的逗号在 result 中的位置
    let mut pending_comma: Option<usize> = None;

    while let Some(ch) = chars.next() {
        if in_string {
            result.push(ch);
            if escape_next {
                escape_next = false;
            } else if ch == '\\' {
                escape_next = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '/' if chars.peek() == Some(&'/') => {
                chars.next();
                for c in chars.by_ref() {
                    if c == '\n' {
                        result.push('\n');
                        break;
                    }
                }
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut prev = ' ';
                let mut closed = false;
                for c in chars.by_ref() {
                    if prev == '*' && c == '/' {
                        closed = true;
                        break;
                    }
                    if c == '\n' {
                        result.push('\n');
                    }
                    prev = c;
                }
                // 未闭合的块注释：原样交给 serde_json 报错
                if !closed {
                    return content.to_string();
                }
            }
            '}' | ']' => {
                if let Some(pos) = pending_comma.take() {
                    result.replace_range(pos..pos + 1, " ");
                }
                result.push(ch);
            }
            ',' => {
                pending_comma = Some(result.len());
                result.push(ch);
            }
            c if c.is_whitespace() => result.push(c),
            c => {
                pending_comma = None;
                if c == '"' {
                    in_string = true;
                }
                result.push(c);
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(SourceFormat::from_path(Path::new("a/lang.json")).unwrap(), SourceFormat::Json);
        assert_eq!(SourceFormat::from_path(Path::new("lang.JSONC")).unwrap(), SourceFormat::Jsonc);
        assert!(matches!(
            SourceFormat::from_path(Path::new("lang.yaml")),
            Err(SplitError::UnsupportedExtension(_))
        ));
        assert!(!SourceFormat::is_supported(Path::new("README")));
    }

    #[test]
    fn test_jsonc_comments_and_trailing_commas() {
        let text = r#"{
            // 行注释
            "one": {
                "key": { "en": "a // not a comment", /* 块注释 */ "he": "b", },
                "list": { "en": [1, 2, 3,], },
            },
        }"#;

        let value = JsoncParser.parse(text).expect("JSONC解析应该成功");
        assert_eq!(
            value,
            json!({"one": {"key": {"en": "a // not a comment", "he": "b"}, "list": {"en": [1, 2, 3]}}})
        );
    }

    #[test]
    fn test_jsonc_keeps_escaped_quotes() {
        let text = r#"{"ns": {"k": {"en": "say \"hi\", /* x */"}}}"#;
        let value = JsoncParser.parse(text).unwrap();
        assert_eq!(value["ns"]["k"]["en"], json!("say \"hi\", /* x */"));
    }

    #[test]
    fn test_strict_json_rejects_comments() {
        let text = "{ // comment\n \"a\": {} }";
        assert!(JsonParser.parse(text).is_err(), "严格JSON不应接受注释");
        assert!(SourceFormat::Jsonc.parser().parse(text).is_ok());
    }

    #[test]
    fn test_unterminated_block_comment_is_an_error() {
        let text = r#"{"a": {"en": "x"}} /* oops"#;
        assert!(JsoncParser.parse(text).is_err(), "未闭合的块注释应该解析失败");
        // "/*/" 不是闭合
        assert!(JsoncParser.parse("{\"a\": {}} /*/").is_err());
        assert!(JsoncParser.parse("{\"a\": {}} /* ok */").is_ok());
    }

    #[test]
    fn test_bom_is_ignored() {
        let text = "\u{feff}{\"a\": {}}";
        assert_eq!(JsonParser.parse(text).unwrap(), json!({"a": {}}));
        assert_eq!(JsoncParser.parse(text).unwrap(), json!({"a": {}}));
    }

    #[test]
    fn test_comment_only_between_comma_and_brace() {
        let text = "{\"a\": {\"en\": \"x\", // last\n}}";
        assert_eq!(JsoncParser.parse(text).unwrap(), json!({"a": {"en": "x"}}));
    }
}
