//! Rich-text body blocks (Portable Text document shape)

use serde::de::Error as _;
use serde::ser::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::ImageRef;

/// One unit of a post body
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    /// `_type: "block"`: a styled paragraph, heading or list item
    Text(TextBlock),
    /// `_type: "image"`
    Image(ImageRef),
    /// `_type: "code"`
    Code(CodeBlock),
    /// Any other block type, kept verbatim
    Unknown { type_name: String, raw: Value },
}

impl Block {
    /// The `_type` tag this block was read from
    pub fn type_name(&self) -> &str {
        match self {
            Block::Text(_) => "block",
            Block::Image(_) => "image",
            Block::Code(_) => "code",
            Block::Unknown { type_name, .. } => type_name,
        }
    }
}

impl<'de> Deserialize<'de> for Block {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        let type_name = value
            .get("_type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        match type_name.as_str() {
            "block" => serde_json::from_value(value)
                .map(Block::Text)
                .map_err(D::Error::custom),
            "image" => serde_json::from_value(value)
                .map(Block::Image)
                .map_err(D::Error::custom),
            "code" => serde_json::from_value(value)
                .map(Block::Code)
                .map_err(D::Error::custom),
            _ => Ok(Block::Unknown {
                type_name,
                raw: value,
            }),
        }
    }
}

impl Serialize for Block {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let tagged = |mut value: Value, tag: &str| {
            if let Value::Object(map) = &mut value {
                map.insert("_type".to_string(), Value::String(tag.to_string()));
            }
            value
        };

        let value = match self {
            Block::Text(block) => {
                tagged(serde_json::to_value(block).map_err(S::Error::custom)?, "block")
            }
            Block::Image(image) => {
                tagged(serde_json::to_value(image).map_err(S::Error::custom)?, "image")
            }
            Block::Code(code) => {
                tagged(serde_json::to_value(code).map_err(S::Error::custom)?, "code")
            }
            Block::Unknown { raw, .. } => raw.clone(),
        };
        value.serialize(serializer)
    }
}

/// A text block with inline spans
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TextBlock {
    /// `normal`, `h1`..`h6`, `blockquote`, or a custom style
    #[serde(default = "normal_style")]
    pub style: String,
    /// `bullet` or `number` when this block is a list item
    #[serde(rename = "listItem", default)]
    pub list_item: Option<String>,
    #[serde(default)]
    pub level: Option<u32>,
    #[serde(default)]
    pub children: Vec<Span>,
    #[serde(rename = "markDefs", default)]
    pub mark_defs: Vec<MarkDef>,
}

fn normal_style() -> String {
    "normal".to_string()
}

/// Inline text run
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Span {
    #[serde(default)]
    pub text: String,
    /// Decorator names (`strong`, `em`, ...) or keys into `markDefs`
    #[serde(default)]
    pub marks: Vec<String>,
}

/// Annotation definition referenced by span marks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkDef {
    #[serde(rename = "_key")]
    pub key: String,
    #[serde(rename = "_type")]
    pub kind: String,
    #[serde(default)]
    pub href: Option<String>,
}

/// Code block from the code-input plugin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeBlock {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub code: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_block_with_link() {
        let block: Block = serde_json::from_value(json!({
            "_type": "block",
            "_key": "a1",
            "style": "h2",
            "markDefs": [{ "_key": "l1", "_type": "link", "href": "https://example.com" }],
            "children": [
                { "_type": "span", "text": "see ", "marks": [] },
                { "_type": "span", "text": "here", "marks": ["l1", "strong"] }
            ]
        }))
        .unwrap();

        let Block::Text(text) = block else {
            panic!("expected text block");
        };
        assert_eq!(text.style, "h2");
        assert_eq!(text.children.len(), 2);
        assert_eq!(text.mark_defs[0].href.as_deref(), Some("https://example.com"));
    }

    #[test]
    fn test_missing_style_is_normal() {
        let block: Block =
            serde_json::from_value(json!({ "_type": "block", "children": [] })).unwrap();
        assert!(matches!(block, Block::Text(ref t) if t.style == "normal"));
    }

    #[test]
    fn test_unknown_block_keeps_payload() {
        let raw = json!({ "_type": "youtube", "url": "https://example.com/v" });
        let block: Block = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(block.type_name(), "youtube");
        assert_eq!(serde_json::to_value(&block).unwrap(), raw);
    }

    #[test]
    fn test_code_block() {
        let block: Block = serde_json::from_value(json!({
            "_type": "code",
            "language": "rust",
            "code": "fn main() {}"
        }))
        .unwrap();
        assert!(matches!(block, Block::Code(ref c) if c.language.as_deref() == Some("rust")));
    }
}
