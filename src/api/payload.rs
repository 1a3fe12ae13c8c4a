//! Comment submission payload

use serde::{Deserialize, Serialize};

/// Body of a comment submission: `{ _id, name, email, comment }`
///
/// Missing fields read as empty strings so they surface through
/// [`missing_fields`](CommentPayload::missing_fields) rather than as parse errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommentPayload {
    #[serde(rename = "_id")]
    pub post_id: String,
    pub name: String,
    pub email: String,
    pub comment: String,
}

/// A required submission field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    PostId,
    Name,
    Email,
    Comment,
}

impl Field {
    pub fn label(self) -> &'static str {
        match self {
            Field::PostId => "Post",
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Comment => "Comment",
        }
    }

    /// Wire name of the field
    pub fn key(self) -> &'static str {
        match self {
            Field::PostId => "_id",
            Field::Name => "name",
            Field::Email => "email",
            Field::Comment => "comment",
        }
    }
}

impl CommentPayload {
    /// Fields that are empty or whitespace only, in form order
    ///
    /// The email address is only checked for presence.
    pub fn missing_fields(&self) -> Vec<Field> {
        [
            (Field::PostId, &self.post_id),
            (Field::Name, &self.name),
            (Field::Email, &self.email),
            (Field::Comment, &self.comment),
        ]
        .into_iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(field, _)| field)
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_payload() {
        let payload: CommentPayload = serde_json::from_str(
            r#"{"_id":"post1","name":"Jane","email":"jane@x.com","comment":"Great read!"}"#,
        )
        .unwrap();
        assert_eq!(payload.post_id, "post1");
        assert!(payload.missing_fields().is_empty());
    }

    #[test]
    fn test_missing_and_blank_fields() {
        let payload: CommentPayload =
            serde_json::from_str(r#"{"_id":"post1","name":"  ","email":"not-an-email"}"#).unwrap();
        assert_eq!(payload.missing_fields(), vec![Field::Name, Field::Comment]);
    }

    #[test]
    fn test_non_string_field_is_rejected() {
        let result = serde_json::from_str::<CommentPayload>(r#"{"_id":1}"#);
        assert!(result.is_err());
    }
}
