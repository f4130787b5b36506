// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Pending mutations and their payload references.
//!
//! A [`PendingMutation`] records a user change that has not yet reached the
//! remote service. Mutations that carry a photo hold it in a
//! [`DraftAttachment`] whose [`Payload`] is either the raw bytes (only while
//! the record is being enqueued or after it has been hydrated) or a
//! [`BlobRef`] pointing into the blob store.
//!
//! Serialized form (one element of the persisted JSON array):
//!
//! ```json
//! {
//!   "id": "pending_1718000000000_k3j9x0a1b",
//!   "createdAt": "2024-06-10T06:13:20Z",
//!   "kind": "attach_to_entity",
//!   "draftAttachment": {
//!     "userId": "u1",
//!     "userName": "Ada",
//!     "payload": { "blob": "native:pending_1718000000000_k3j9x0a1b" }
//!   },
//!   "targetEntityId": "loc-42"
//! }
//! ```

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Storage driver a blob reference belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Scheme {
    /// One file per blob in a cache directory.
    Native,
    /// Key/value object store table.
    Idb,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Native => "native",
            Scheme::Idb => "idb",
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "native" => Ok(Scheme::Native),
            "idb" => Ok(Scheme::Idb),
            other => Err(format!("unknown blob scheme '{}'", other)),
        }
    }
}

/// Reference to a stored blob, written as `{scheme}:{key}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobRef {
    pub scheme: Scheme,
    pub key: String,
}

impl BlobRef {
    pub fn new(scheme: Scheme, key: impl Into<String>) -> Self {
        BlobRef {
            scheme,
            key: key.into(),
        }
    }
}

impl fmt::Display for BlobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.scheme, self.key)
    }
}

impl FromStr for BlobRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (scheme, key) = s
            .split_once(':')
            .ok_or_else(|| format!("blob reference '{}' is missing a scheme", s))?;
        if key.is_empty() {
            return Err(format!("blob reference '{}' has an empty key", s));
        }
        Ok(BlobRef {
            scheme: scheme.parse()?,
            key: key.to_string(),
        })
    }
}

impl Serialize for BlobRef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BlobRef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

/// Attachment payload: raw bytes or a reference into the blob store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    Blob(BlobRef),
    Inline(#[serde(with = "base64_bytes")] Vec<u8>),
}

impl Payload {
    pub fn is_inline(&self) -> bool {
        matches!(self, Payload::Inline(_))
    }

    pub fn blob_ref(&self) -> Option<&BlobRef> {
        match self {
            Payload::Blob(blob) => Some(blob),
            Payload::Inline(_) => None,
        }
    }

    pub fn inline_data(&self) -> Option<&[u8]> {
        match self {
            Payload::Inline(data) => Some(data),
            Payload::Blob(_) => None,
        }
    }
}

/// A new location drafted while offline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftEntity {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}

impl DraftEntity {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        DraftEntity {
            name: name.into(),
            latitude,
            longitude,
            description: None,
            user_id: None,
        }
    }
}

/// A photo drafted while offline, together with who took it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftAttachment {
    pub user_id: String,
    pub user_name: String,
    pub payload: Payload,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
}

impl DraftAttachment {
    /// Creates an attachment holding `data` inline.
    pub fn new(user_id: impl Into<String>, user_name: impl Into<String>, data: Vec<u8>) -> Self {
        DraftAttachment {
            user_id: user_id.into(),
            user_name: user_name.into(),
            payload: Payload::Inline(data),
            caption: None,
            content_type: None,
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// The change a pending mutation will apply remotely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "kind",
    rename_all = "snake_case",
    rename_all_fields = "camelCase"
)]
pub enum MutationKind {
    /// Create a location together with its first photo.
    CreateEntity {
        draft_entity: DraftEntity,
        draft_attachment: DraftAttachment,
    },

    /// Add a photo to an existing location.
    AttachToEntity {
        draft_attachment: DraftAttachment,
        target_entity_id: String,
    },

    /// Supersede an existing photo.
    ReplaceAttachment {
        draft_attachment: DraftAttachment,
        attachment_id: String,
        target_entity_id: String,
    },

    /// Remove a photo. Carries no payload.
    DeleteAttachment {
        attachment_id: String,
        owner_id: String,
    },
}

impl MutationKind {
    /// Returns the serialized tag of this variant.
    pub fn name(&self) -> &'static str {
        match self {
            MutationKind::CreateEntity { .. } => "create_entity",
            MutationKind::AttachToEntity { .. } => "attach_to_entity",
            MutationKind::ReplaceAttachment { .. } => "replace_attachment",
            MutationKind::DeleteAttachment { .. } => "delete_attachment",
        }
    }
}

/// A queued mutation awaiting replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingMutation {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub kind: MutationKind,
}

impl PendingMutation {
    pub fn new(id: impl Into<String>, created_at: DateTime<Utc>, kind: MutationKind) -> Self {
        PendingMutation {
            id: id.into(),
            created_at,
            kind,
        }
    }

    pub fn draft_attachment(&self) -> Option<&DraftAttachment> {
        match &self.kind {
            MutationKind::CreateEntity {
                draft_attachment, ..
            }
            | MutationKind::AttachToEntity {
                draft_attachment, ..
            }
            | MutationKind::ReplaceAttachment {
                draft_attachment, ..
            } => Some(draft_attachment),
            MutationKind::DeleteAttachment { .. } => None,
        }
    }

    pub fn draft_attachment_mut(&mut self) -> Option<&mut DraftAttachment> {
        match &mut self.kind {
            MutationKind::CreateEntity {
                draft_attachment, ..
            }
            | MutationKind::AttachToEntity {
                draft_attachment, ..
            }
            | MutationKind::ReplaceAttachment {
                draft_attachment, ..
            } => Some(draft_attachment),
            MutationKind::DeleteAttachment { .. } => None,
        }
    }

    pub fn payload(&self) -> Option<&Payload> {
        self.draft_attachment().map(|a| &a.payload)
    }

    pub fn blob_ref(&self) -> Option<&BlobRef> {
        self.payload().and_then(Payload::blob_ref)
    }

    pub fn has_inline_payload(&self) -> bool {
        self.payload().is_some_and(Payload::is_inline)
    }

    /// Returns the remote object this mutation is about.
    ///
    /// For a new location this is the drafted name, since it has no id yet.
    pub fn subject(&self) -> &str {
        match &self.kind {
            MutationKind::CreateEntity { draft_entity, .. } => &draft_entity.name,
            MutationKind::AttachToEntity {
                target_entity_id, ..
            } => target_entity_id,
            MutationKind::ReplaceAttachment { attachment_id, .. } => attachment_id,
            MutationKind::DeleteAttachment { attachment_id, .. } => attachment_id,
        }
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        STANDARD
            .decode(text.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[path = "mutation_tests.rs"]
mod tests;
