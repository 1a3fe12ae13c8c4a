//! GROQ queries issued by the post page

/// Every post id and slug, for path enumeration
pub const POST_PATHS: &str = r#"*[_type == "post"] {
  _id,
  slug {
    current
  }
}"#;

/// One post by `$slug`, with its author and approved comments
pub const POST_BY_SLUG: &str = r#"*[_type == "post" && slug.current == $slug][0] {
  _id,
  _createdAt,
  title,
  author -> {
    name,
    image
  },
  'comments': *[_type == "comment" && approved == true && post._ref == ^._id],
  description,
  mainImage,
  slug,
  body
}"#;
