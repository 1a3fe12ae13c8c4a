//! HTML for the post page

use crate::api::Field;
use crate::client::ContentStore;
use crate::config::SiteConfig;
use crate::content::{Comment, ImageRef, Post};
use crate::helpers::{date_xml, html_escape, image_tag, link_to, meta_generator, published_at};
use crate::render::RichTextRenderer;

use super::form::{CommentForm, FormState};
use super::paths::post_path;

/// Everything needed to draw a post page
pub struct PostView<'a> {
    pub config: &'a SiteConfig,
    pub store: &'a dyn ContentStore,
    pub renderer: &'a RichTextRenderer,
    pub post: &'a Post,
    pub form: &'a CommentForm,
}

impl PostView<'_> {
    /// Render the full HTML document
    pub fn render(&self) -> String {
        let post = self.post;
        let mut main = String::new();

        if let Some(src) = self.image(post.main_image.as_ref()) {
            main.push_str(&image_tag(&src, "main image", Some("h-40 w-full object-cover")));
        }

        main.push_str(r#"<article class="mx-auto max-w-3xl p-5">"#);
        main.push_str(&format!(
            r#"<h1 class="mt-10 mb-3 text-3xl">{}</h1>"#,
            html_escape(&post.title)
        ));
        if let Some(description) = post.description.as_deref() {
            main.push_str(&format!(
                r#"<h2 class="mb-2 text-xl font-light text-gray-500">{}</h2>"#,
                html_escape(description)
            ));
        }
        main.push_str(&self.byline());

        let body = self
            .renderer
            .render(&post.body, |image| self.store.image_url(image).ok());
        main.push_str(&format!(r#"<div class="mt-10">{}</div>"#, body));
        main.push_str("</article>");

        main.push_str(r#"<hr class="my-5 mx-auto max-w-lg border border-yellow-500">"#);
        if self.form.state() == FormState::Submitted {
            main.push_str(SUBMITTED_PANEL);
        } else {
            main.push_str(&self.comment_form());
        }
        main.push_str(&comment_section(&post.comments));

        let canonical = post.slug().map(|slug| {
            format!("{}{}", self.config.url.trim_end_matches('/'), post_path(slug))
        });
        layout(self.config, &post.title, canonical.as_deref(), &main)
    }

    fn image(&self, image: Option<&ImageRef>) -> Option<String> {
        let image = image?;
        match self.store.image_url(image) {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::debug!("Image not rendered: {}", e);
                None
            }
        }
    }

    fn byline(&self) -> String {
        let post = self.post;
        let author = post.author.as_ref();
        let avatar = self
            .image(author.and_then(|a| a.image.as_ref()))
            .map(|src| image_tag(&src, "", Some("h-10 w-10 rounded-full")))
            .unwrap_or_default();
        let name = author.map(|a| a.name.as_str()).unwrap_or("Anonymous");

        format!(
            concat!(
                r#"<div class="flex items-center space-x-2">{}"#,
                r#"<p class="text-sm font-extralight">Blog post by "#,
                r#"<span class="text-green-600">{}</span> - Published at "#,
                r#"<time datetime="{}">{}</time></p></div>"#
            ),
            avatar,
            html_escape(name),
            date_xml(&post.created_at),
            published_at(&post.created_at, &self.config.timezone)
        )
    }

    fn comment_form(&self) -> String {
        let input = &self.form.input;
        let action = self
            .post
            .slug()
            .map(post_path)
            .unwrap_or_else(|| "/api/createComment".to_string());

        let mut html = format!(
            concat!(
                r#"<form method="post" action="{}" class="my-10 mx-auto flex max-w-2xl flex-col p-10">"#,
                r#"<h3 class="text-sm text-yellow-500">Enjoyed this article?</h3>"#,
                r#"<h4 class="text-3xl font-bold">Contribute by leaving a comment below.</h4>"#,
                r#"<hr class="mt-2 py-3">"#,
                r#"<input type="hidden" name="_id" value="{}">"#
            ),
            html_escape(&action),
            html_escape(&self.post.id)
        );

        html.push_str(&text_input(Field::Name, "text", &input.name, None));
        html.push_str(&text_input(Field::Email, "email", &input.email, Some("Janie.Doe@gmail.com")));
        html.push_str(&format!(
            concat!(
                r#"<label class="mb-5 block"><span class="text-gray-700">{}</span>"#,
                r#"<textarea name="{}" required rows="8" class="form-textarea mt-1 block w-full rounded border py-2 px-3 shadow">{}</textarea></label>"#
            ),
            Field::Comment.label(),
            Field::Comment.key(),
            html_escape(&input.comment)
        ));

        let errors = self.form.errors();
        if !errors.is_empty() || self.form.state() == FormState::Failed {
            html.push_str(r#"<div class="flex flex-col p-5">"#);
            for field in errors {
                html.push_str(&format!(
                    r#"<span class="inline-block text-sm text-red-500">- The {} field is required!</span>"#,
                    field.label()
                ));
            }
            if self.form.state() == FormState::Failed {
                html.push_str(
                    r#"<span class="inline-block text-sm text-red-500">Your comment could not be submitted. Please try again.</span>"#,
                );
            }
            html.push_str("</div>");
        }

        html.push_str(
            r#"<input type="submit" class="cursor-pointer rounded bg-yellow-500 px-4 py-2 font-bold hover:bg-yellow-400"></form>"#,
        );
        html
    }
}

const SUBMITTED_PANEL: &str = concat!(
    r#"<div class="mx-auto my-10 flex max-w-2xl flex-col items-center justify-center bg-yellow-500 py-10 text-white">"#,
    r#"<h1 class="mb-4 text-3xl font-bold">Submitted!</h1>"#,
    r#"<p>The comment will be pending approval by an admin.</p></div>"#
);

fn text_input(field: Field, kind: &str, value: &str, placeholder: Option<&str>) -> String {
    let placeholder = placeholder
        .map(|p| format!(r#" placeholder="{}""#, html_escape(p)))
        .unwrap_or_default();
    format!(
        concat!(
            r#"<label class="mb-5 block"><span class="text-gray-700">{}</span>"#,
            r#"<input name="{}" type="{}" value="{}"{} required class="form-input mt-1 block w-full rounded border py-2 px-3 shadow"></label>"#
        ),
        field.label(),
        field.key(),
        kind,
        html_escape(value),
        placeholder
    )
}

fn comment_section(comments: &[Comment]) -> String {
    let mut html = String::from(concat!(
        r#"<div class="my-10 mx-auto flex max-w-2xl flex-col space-y-2 p-10 shadow shadow-yellow-500">"#,
        r#"<h3 class="text-4xl">Comment Section</h3><hr class="pb-2">"#
    ));
    for comment in comments {
        html.push_str(&format!(
            r#"<div id="comment-{}"><p><span class="text-yellow-500">{}</span>: {}</p></div>"#,
            html_escape(&comment.id),
            html_escape(&comment.name),
            html_escape(&comment.comment)
        ));
    }
    html.push_str("</div>");
    html
}

fn header(config: &SiteConfig) -> String {
    format!(
        r#"<header class="mx-auto flex max-w-7xl justify-between p-5">{}</header>"#,
        link_to("/", &html_escape(&config.title), Some("text-2xl font-bold"))
    )
}

/// Wrap page content in the site layout
pub fn layout(config: &SiteConfig, title: &str, canonical: Option<&str>, main: &str) -> String {
    let mut head = String::new();
    if !config.description.is_empty() {
        head.push_str(&format!(
            r#"<meta name="description" content="{}">"#,
            html_escape(&config.description)
        ));
    }
    if let Some(href) = canonical {
        head.push_str(&format!(r#"<link rel="canonical" href="{}">"#, html_escape(href)));
    }

    format!(
        concat!(
            "<!DOCTYPE html>\n",
            r#"<html lang="en"><head><meta charset="utf-8">"#,
            r#"<meta name="viewport" content="width=device-width, initial-scale=1">"#,
            "{}{}<title>{} | {}</title></head>",
            "<body><main>{}{}</main></body></html>\n"
        ),
        meta_generator(),
        head,
        html_escape(title),
        html_escape(&config.title),
        header(config),
        main
    )
}

/// Page shown for unknown slugs
pub fn render_not_found(config: &SiteConfig) -> String {
    layout(
        config,
        "Not found",
        None,
        r#"<article class="mx-auto max-w-3xl p-5"><h1 class="mt-10 mb-3 text-3xl">404 - This post could not be found.</h1></article>"#,
    )
}

/// Page shown when the content store could not be read
pub fn render_error(config: &SiteConfig) -> String {
    layout(
        config,
        "Error",
        None,
        r#"<article class="mx-auto max-w-3xl p-5"><h1 class="mt-10 mb-3 text-3xl">500 - The post could not be loaded.</h1></article>"#,
    )
}
