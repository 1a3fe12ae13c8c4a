//! Rich-text rendering
//!
//! A post body is a list of typed blocks. Each block is reduced to a
//! [`Markup`] value tagged with a closed [`BlockTag`], then handed to the
//! serializer registered for that tag. Tags without a serializer go to the
//! fallback, which every renderer must be built with.

mod highlight;

pub use highlight::CodeHighlighter;

use std::collections::HashMap;

use crate::content::{Block, ImageRef, TextBlock};
use crate::helpers::{html_escape, image_tag};

/// Kinds of markup a serializer can be registered for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockTag {
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Blockquote,
    Normal,
    ListItem,
    Link,
    Image,
    Code,
    Unknown,
}

impl BlockTag {
    /// Map a text block style to its tag
    pub fn from_style(style: &str) -> Self {
        match style {
            "h1" => BlockTag::H1,
            "h2" => BlockTag::H2,
            "h3" => BlockTag::H3,
            "h4" => BlockTag::H4,
            "h5" => BlockTag::H5,
            "h6" => BlockTag::H6,
            "blockquote" => BlockTag::Blockquote,
            "normal" => BlockTag::Normal,
            _ => BlockTag::Unknown,
        }
    }

    fn heading_level(self) -> Option<u8> {
        match self {
            BlockTag::H1 => Some(1),
            BlockTag::H2 => Some(2),
            BlockTag::H3 => Some(3),
            BlockTag::H4 => Some(4),
            BlockTag::H5 => Some(5),
            BlockTag::H6 => Some(6),
            _ => None,
        }
    }
}

/// Input handed to a serializer
#[derive(Debug, Clone, Copy)]
pub struct Markup<'a> {
    pub tag: BlockTag,
    /// Block `_type`, text style, or annotation type this markup came from
    pub type_name: &'a str,
    /// Already rendered inner HTML
    pub children: &'a str,
    pub href: Option<&'a str>,
    pub src: Option<&'a str>,
    pub alt: Option<&'a str>,
}

impl<'a> Markup<'a> {
    fn new(tag: BlockTag, type_name: &'a str, children: &'a str) -> Self {
        Self {
            tag,
            type_name,
            children,
            href: None,
            src: None,
            alt: None,
        }
    }
}

/// A function turning one piece of markup into HTML
pub type Serializer = Box<dyn Fn(&Markup<'_>) -> String + Send + Sync>;

/// Renders rich-text blocks through a tag-to-serializer mapping
pub struct RichTextRenderer {
    serializers: HashMap<BlockTag, Serializer>,
    fallback: Serializer,
    highlighter: CodeHighlighter,
}

impl RichTextRenderer {
    /// Create a renderer whose unmapped tags use `fallback`
    pub fn new<F>(fallback: F) -> Self
    where
        F: Fn(&Markup<'_>) -> String + Send + Sync + 'static,
    {
        Self {
            serializers: HashMap::new(),
            fallback: Box::new(fallback),
            highlighter: CodeHighlighter::new(),
        }
    }

    /// Register the serializer for `tag`, replacing any previous one
    pub fn with<F>(mut self, tag: BlockTag, serializer: F) -> Self
    where
        F: Fn(&Markup<'_>) -> String + Send + Sync + 'static,
    {
        self.serializers.insert(tag, Box::new(serializer));
        self
    }

    /// The mapping used on post pages
    pub fn post_body() -> Self {
        Self::new(Self::default_markup)
            .with(BlockTag::H1, |m| {
                format!(r#"<h1 class="my-5 text-2xl font-bold">{}</h1>"#, m.children)
            })
            .with(BlockTag::H2, |m| {
                format!(r#"<h2 class="my-5 text-xl font-bold">{}</h2>"#, m.children)
            })
            .with(BlockTag::ListItem, |m| {
                format!(r#"<li class="ml-4 list-disc">{}</li>"#, m.children)
            })
            .with(BlockTag::Link, |m| {
                format!(
                    r#"<a href="{}" class="text-blue-500 hover:underline">{}</a>"#,
                    html_escape(m.href.unwrap_or("#")),
                    m.children
                )
            })
            .with(BlockTag::Image, |m| match m.src {
                Some(src) => image_tag(src, m.alt.unwrap_or(""), Some("mb-6 mt-4")),
                None => String::new(),
            })
    }

    /// Standard markup for every tag
    pub fn default_markup(markup: &Markup<'_>) -> String {
        if let Some(level) = markup.tag.heading_level() {
            return format!("<h{0}>{1}</h{0}>", level, markup.children);
        }

        match markup.tag {
            BlockTag::Blockquote => format!("<blockquote>{}</blockquote>", markup.children),
            BlockTag::ListItem => format!("<li>{}</li>", markup.children),
            BlockTag::Link => format!(
                r#"<a href="{}">{}</a>"#,
                html_escape(markup.href.unwrap_or("#")),
                markup.children
            ),
            BlockTag::Image => match markup.src {
                Some(src) => image_tag(src, markup.alt.unwrap_or(""), None),
                None => String::new(),
            },
            BlockTag::Code => markup.children.to_string(),
            BlockTag::Unknown if markup.children.is_empty() => String::new(),
            _ => format!("<p>{}</p>", markup.children),
        }
    }

    fn serialize(&self, markup: &Markup<'_>) -> String {
        match self.serializers.get(&markup.tag) {
            Some(serializer) => serializer(markup),
            None => (self.fallback)(markup),
        }
    }

    /// Render a block list to HTML; `image_url` resolves inline images
    pub fn render<F>(&self, blocks: &[Block], image_url: F) -> String
    where
        F: Fn(&ImageRef) -> Option<String>,
    {
        let mut html = String::new();
        let mut lists = ListStack::default();

        for block in blocks {
            match block {
                Block::Text(text) if text.list_item.is_some() => {
                    let level = text.level.unwrap_or(1).max(1) as usize;
                    let ordered = text.list_item.as_deref() == Some("number");
                    lists.enter(&mut html, level, ordered);

                    let children = self.render_spans(text);
                    html.push_str(&self.serialize(&Markup::new(
                        BlockTag::ListItem,
                        &text.style,
                        &children,
                    )));
                }
                Block::Text(text) => {
                    lists.close_all(&mut html);
                    let children = self.render_spans(text);
                    let tag = BlockTag::from_style(&text.style);
                    html.push_str(&self.serialize(&Markup::new(tag, &text.style, &children)));
                }
                Block::Image(image) => {
                    lists.close_all(&mut html);
                    let src = image_url(image);
                    if src.is_none() {
                        tracing::debug!("Skipping image without a resolvable asset");
                    }
                    let markup = Markup {
                        src: src.as_deref(),
                        alt: image.alt.as_deref(),
                        ..Markup::new(BlockTag::Image, "image", "")
                    };
                    html.push_str(&self.serialize(&markup));
                }
                Block::Code(code) => {
                    lists.close_all(&mut html);
                    let highlighted = self.highlighter.highlight(&code.code, code.language.as_deref());
                    html.push_str(&self.serialize(&Markup::new(BlockTag::Code, "code", &highlighted)));
                }
                Block::Unknown { type_name, .. } => {
                    lists.close_all(&mut html);
                    tracing::debug!("Unknown block type: {}", type_name);
                    html.push_str(&self.serialize(&Markup::new(BlockTag::Unknown, type_name, "")));
                }
            }
        }

        lists.close_all(&mut html);
        html
    }

    /// Render the inline spans of a text block
    fn render_spans(&self, block: &TextBlock) -> String {
        let mut html = String::new();

        for span in &block.children {
            let mut text = html_escape(&span.text).replace('\n', "<br>");

            for mark in &span.marks {
                text = match decorator(mark) {
                    Some((open, close)) => format!("{}{}{}", open, text, close),
                    None => match block.mark_defs.iter().find(|d| &d.key == mark) {
                        Some(def) if def.kind == "link" => {
                            let markup = Markup {
                                href: def.href.as_deref(),
                                ..Markup::new(BlockTag::Link, "link", &text)
                            };
                            self.serialize(&markup)
                        }
                        _ => text,
                    },
                };
            }

            html.push_str(&text);
        }

        html
    }
}

impl Default for RichTextRenderer {
    fn default() -> Self {
        Self::new(Self::default_markup)
    }
}

/// Opening and closing tags for span decorators
fn decorator(mark: &str) -> Option<(&'static str, &'static str)> {
    match mark {
        "strong" => Some(("<strong>", "</strong>")),
        "em" => Some(("<em>", "</em>")),
        "code" => Some(("<code>", "</code>")),
        "underline" => Some((r#"<span style="text-decoration:underline">"#, "</span>")),
        "strike-through" => Some(("<del>", "</del>")),
        _ => None,
    }
}

/// Open `<ul>`/`<ol>` elements while walking consecutive list items
#[derive(Default)]
struct ListStack {
    open: Vec<OpenList>,
}

struct OpenList {
    kind: &'static str,
    /// Opened inside the previous item, whose `</li>` is deferred
    in_item: bool,
}

impl ListStack {
    fn enter(&mut self, html: &mut String, level: usize, ordered: bool) {
        let kind = if ordered { "ol" } else { "ul" };

        while self.open.len() > level {
            self.close_one(html);
        }
        if self.open.len() == level && self.open.last().map(|list| list.kind) != Some(kind) {
            self.close_one(html);
        }
        while self.open.len() < level {
            let in_item = !self.open.is_empty() && html.ends_with("</li>");
            if in_item {
                html.truncate(html.len() - "</li>".len());
            }
            html.push_str(&format!("<{}>", kind));
            self.open.push(OpenList { kind, in_item });
        }
    }

    fn close_one(&mut self, html: &mut String) {
        if let Some(list) = self.open.pop() {
            html.push_str(&format!("</{}>", list.kind));
            if list.in_item {
                html.push_str("</li>");
            }
        }
    }

    fn close_all(&mut self, html: &mut String) {
        while !self.open.is_empty() {
            self.close_one(html);
        }
    }
}
