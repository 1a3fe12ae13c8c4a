//! HTML helper functions

/// Generate an anchor tag
///
/// # Examples
/// ```ignore
/// link_to("/post/hello", "Hello", None) // -> <a href="/post/hello">Hello</a>
/// ```
pub fn link_to(href: &str, text: &str, class: Option<&str>) -> String {
    let class_attr = class
        .map(|c| format!(r#" class="{}""#, html_escape(c)))
        .unwrap_or_default();

    if href.starts_with("http://") || href.starts_with("https://") {
        format!(
            r#"<a href="{}"{} target="_blank" rel="noopener">{}</a>"#,
            html_escape(href),
            class_attr,
            text
        )
    } else {
        format!(r#"<a href="{}"{}>{}</a>"#, html_escape(href), class_attr, text)
    }
}

/// Generate an image tag
///
/// # Examples
/// ```ignore
/// image_tag("https://cdn.example.com/a.jpg", "Hero", Some("w-full"))
/// ```
pub fn image_tag(src: &str, alt: &str, class: Option<&str>) -> String {
    let class_attr = class
        .map(|c| format!(r#" class="{}""#, html_escape(c)))
        .unwrap_or_default();

    format!(
        r#"<img src="{}" alt="{}"{}>"#,
        html_escape(src),
        html_escape(alt),
        class_attr
    )
}

/// Generate meta generator tag
pub fn meta_generator() -> String {
    format!(
        r#"<meta name="generator" content="inkpost {}">"#,
        env!("CARGO_PKG_VERSION")
    )
}

/// Escape HTML special characters
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
