//! In-memory content store for tests
//!
//! Answers the orchestrator's queries by applying their filters to stored
//! JSON documents, in insertion order.

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{ClientError, ContentStore, ImageUrlBuilder, QueryParams};
use crate::content::ImageRef;
use crate::page::queries;

pub struct MemoryStore {
    documents: Mutex<Vec<Value>>,
    images: ImageUrlBuilder,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    fetches: AtomicUsize,
    creates: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            documents: Mutex::new(Vec::new()),
            images: ImageUrlBuilder::new("test", "production"),
            fail_reads: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            fetches: AtomicUsize::new(0),
            creates: AtomicUsize::new(0),
        }
    }

    /// Store with one author and one post per `(id, slug, title)`
    pub fn with_posts(posts: &[(&str, &str, &str)]) -> Self {
        let store = Self::new();
        store.insert(json!({
            "_id": "author1",
            "_type": "author",
            "name": "Ada Lovelace",
            "image": { "asset": { "_ref": "image-face-64x64-png" } }
        }));
        for (id, slug, title) in posts {
            store.insert(json!({
                "_id": id,
                "_type": "post",
                "_createdAt": "2022-03-01T10:00:00Z",
                "title": title,
                "description": format!("About {}", title),
                "mainImage": { "asset": { "_ref": "image-hero-1200x400-jpg" } },
                "slug": { "_type": "slug", "current": slug },
                "author": { "_type": "reference", "_ref": "author1" },
                "body": [{
                    "_type": "block",
                    "style": "normal",
                    "children": [{ "_type": "span", "text": format!("Body of {}", title) }]
                }]
            }));
        }
        store
    }

    pub fn insert(&self, doc: Value) {
        self.documents.lock().unwrap().push(doc);
    }

    /// Moderator action: flip a comment's approval flag
    pub fn approve(&self, id: &str) {
        let mut docs = self.documents.lock().unwrap();
        for doc in docs.iter_mut() {
            if doc["_id"] == id {
                doc["approved"] = json!(true);
            }
        }
    }

    /// Edit a post title, as an editor would
    pub fn set_title(&self, id: &str, title: &str) {
        let mut docs = self.documents.lock().unwrap();
        for doc in docs.iter_mut() {
            if doc["_id"] == id {
                doc["title"] = json!(title);
            }
        }
    }

    pub fn remove(&self, id: &str) {
        self.documents.lock().unwrap().retain(|doc| doc["_id"] != id);
    }

    /// All stored comment documents
    pub fn comments(&self) -> Vec<Value> {
        self.of_type("comment")
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn create_count(&self) -> usize {
        self.creates.load(Ordering::SeqCst)
    }

    fn of_type(&self, kind: &str) -> Vec<Value> {
        self.documents
            .lock()
            .unwrap()
            .iter()
            .filter(|doc| doc["_type"] == kind)
            .cloned()
            .collect()
    }

    fn by_id(&self, id: &str) -> Option<Value> {
        self.documents
            .lock()
            .unwrap()
            .iter()
            .find(|doc| doc["_id"] == id)
            .cloned()
    }

    fn post_paths(&self) -> Value {
        self.of_type("post")
            .into_iter()
            .map(|post| {
                let slug = match &post["slug"] {
                    Value::Null => Value::Null,
                    slug => json!({ "current": slug["current"] }),
                };
                json!({ "_id": post["_id"], "slug": slug })
            })
            .collect()
    }

    fn post_by_slug(&self, slug: &str) -> Value {
        let Some(post) = self
            .of_type("post")
            .into_iter()
            .find(|post| post["slug"]["current"] == slug)
        else {
            return Value::Null;
        };

        let author = post["author"]["_ref"]
            .as_str()
            .and_then(|id| self.by_id(id))
            .map(|a| json!({ "name": a["name"], "image": a["image"] }))
            .unwrap_or(Value::Null);

        let comments: Vec<Value> = self
            .comments()
            .into_iter()
            .filter(|c| c["approved"] == true && c["post"]["_ref"] == post["_id"])
            .collect();

        let mut projection = Map::new();
        for field in ["_id", "_createdAt", "title", "description", "mainImage", "slug", "body"] {
            projection.insert(field.to_string(), post[field].clone());
        }
        projection.insert("author".to_string(), author);
        projection.insert("comments".to_string(), Value::Array(comments));
        Value::Object(projection)
    }
}

#[async_trait]
impl ContentStore for MemoryStore {
    async fn fetch(&self, query: &str, params: &QueryParams) -> Result<Value, ClientError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(ClientError::Status {
                status: 503,
                body: "read failure".to_string(),
            });
        }

        if query == queries::POST_PATHS {
            Ok(self.post_paths())
        } else if query == queries::POST_BY_SLUG {
            let slug = params.get("slug").and_then(Value::as_str).unwrap_or_default();
            Ok(self.post_by_slug(slug))
        } else {
            Err(ClientError::Unsupported(query.to_string()))
        }
    }

    async fn create(&self, mut doc: Value) -> Result<Value, ClientError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(ClientError::Status {
                status: 500,
                body: "write failure".to_string(),
            });
        }

        let id = uuid::Uuid::new_v4().to_string();
        doc["_id"] = json!(id);
        doc["_createdAt"] = json!(chrono::Utc::now().to_rfc3339());
        let kind = doc["_type"].clone();
        self.insert(doc);
        self.creates.fetch_add(1, Ordering::SeqCst);

        Ok(json!({ "_id": id, "_type": kind }))
    }

    fn image_url(&self, image: &ImageRef) -> Result<String, ClientError> {
        self.images.url(image)
    }
}
