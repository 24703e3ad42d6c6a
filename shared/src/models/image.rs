//! Proof Image Model

use serde::{Deserialize, Serialize};

/// Proof image attached to a record (receipt photo, transfer voucher, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofImage {
    pub id: String,
    pub related_id: String,
    pub url: String,
    pub hash: Option<String>,
    #[serde(default)]
    pub index: i32,
    #[serde(default)]
    pub format: String,
}

/// Proof image as submitted by a client
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofImageInput {
    pub url: String,
    pub hash: Option<String>,
    #[serde(default)]
    pub index: i32,
    #[serde(default)]
    pub format: String,
}

impl ProofImageInput {
    pub fn into_image(self, related_id: &str) -> ProofImage {
        ProofImage {
            id: crate::util::new_id(),
            related_id: related_id.to_string(),
            url: self.url,
            hash: self.hash,
            index: self.index,
            format: self.format,
        }
    }
}
