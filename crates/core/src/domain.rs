use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Selector that spans every catalog of a user. It can never name a real catalog.
pub const ALL_CATALOGS: &str = "All";

pub const MAX_NAME_LEN: usize = 200;
pub const MAX_DESCRIPTION_LEN: usize = 1000;

/// Opaque identity supplied by whatever authenticates the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct UserId(pub i64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named grouping of images owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Catalog {
    pub id: i64,
    pub user: UserId,
    pub name: String,
    pub created_at: i64,
}

/// An uploaded image. `file` is relative to the media root.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Image {
    pub id: i64,
    pub user: UserId,
    pub catalog_id: i64,
    pub name: String,
    pub file: PathBuf,
    pub description: String,
    pub created_at: i64,
}

/// Fields needed to insert an image row.
#[derive(Debug, Clone)]
pub struct NewImage {
    pub user: UserId,
    pub catalog_id: i64,
    pub name: String,
    pub file: PathBuf,
    pub description: String,
}

/// HTTP verb of the incoming request. Only the read/write distinction matters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    #[default]
    Get,
    Post,
}

/// Posted form fields, in submission order. Repeated keys are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormData {
    fields: Vec<(String, String)>,
}

impl FormData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push((key.into(), value.into()));
    }

    /// Last value posted under `key`, matching how browsers' repeated fields are usually read.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value posted under `key`, in order.
    pub fn get_list(&self, key: &str) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// A field counts as set when it is present with a non-empty value.
    pub fn is_truthy(&self, key: &str) -> bool {
        self.get(key).is_some_and(|v| !v.is_empty())
    }

    pub fn contains_value(&self, value: &str) -> bool {
        self.fields.iter().any(|(_, v)| v == value)
    }

    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormData {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut form = FormData::new();
        for (k, v) in iter {
            form.push(k, v);
        }
        form
    }
}

/// A file attached to a multipart request.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Everything the core needs to know about one request.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub user: UserId,
    pub method: Method,
    pub form: FormData,
    pub upload: Option<UploadedFile>,
}

impl RequestContext {
    pub fn get(user: UserId) -> Self {
        Self {
            user,
            method: Method::Get,
            form: FormData::new(),
            upload: None,
        }
    }

    pub fn post(user: UserId, form: FormData) -> Self {
        Self {
            user,
            method: Method::Post,
            form,
            upload: None,
        }
    }

    pub fn with_upload(mut self, upload: UploadedFile) -> Self {
        self.upload = Some(upload);
        self
    }

    pub fn is_post(&self) -> bool {
        self.method == Method::Post
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticeLevel {
    Info,
    Success,
}

/// A user-visible message produced while handling a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            text: text.into(),
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
