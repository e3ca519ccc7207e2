// models/image.rs

use serde::{Deserialize, Serialize};

/// Image embedded in a record document. The payload and its content type only
/// ever change together, so they live in one value.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StoredImage {
    pub base64: String,
    pub content_type: String,
}

impl StoredImage {
    pub fn new(base64: String, content_type: String) -> Self {
        StoredImage { base64, content_type }
    }

    /// `data:` URI used by the views.
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.content_type, self.base64)
    }
}

/// A file received with a form, already read from the upload directory.
#[derive(Debug, Clone)]
pub struct Upload {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub file_name: String,
}
