use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of media a stored record refers to.
///
/// Order matters elsewhere: the upload handler probes attachments in this
/// declaration order and the first match wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Document,
    Photo,
    Video,
    Audio,
    Voice,
    Animation,
    Sticker,
}

impl MediaKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaKind::Document => "document",
            MediaKind::Photo => "photo",
            MediaKind::Video => "video",
            MediaKind::Audio => "audio",
            MediaKind::Voice => "voice",
            MediaKind::Animation => "animation",
            MediaKind::Sticker => "sticker",
        }
    }

    /// Parse the stored tag back into a kind. Unknown tags fall back to
    /// `Document`, which matches the generic send path used for them.
    pub fn parse(tag: &str) -> MediaKind {
        match tag {
            "photo" => MediaKind::Photo,
            "video" => MediaKind::Video,
            "audio" => MediaKind::Audio,
            "voice" => MediaKind::Voice,
            "animation" => MediaKind::Animation,
            "sticker" => MediaKind::Sticker,
            _ => MediaKind::Document,
        }
    }

    /// Default display name used when an upload carries no usable label.
    pub fn default_name(&self) -> &'static str {
        self.as_str()
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A persisted file record: one row per accepted upload.
///
/// Records are immutable; nothing in the system updates or deletes them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredFile {
    /// Short opaque token embedded in share links.
    pub id: String,
    /// Platform-issued `file_id` for the already-uploaded blob. The bot
    /// never touches the blob itself.
    pub file_ref: String,
    /// Human-readable label, defaulted by media kind when absent.
    pub display_name: String,
    pub kind: MediaKind,
    /// Advisory only; never read back.
    pub created_at: DateTime<Utc>,
}

impl StoredFile {
    pub fn new(id: impl Into<String>, attachment: MediaAttachment) -> Self {
        Self {
            id: id.into(),
            file_ref: attachment.file_ref,
            display_name: attachment.display_name,
            kind: attachment.kind,
            created_at: Utc::now(),
        }
    }
}

/// Normalized media tuple extracted once at the transport boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaAttachment {
    pub file_ref: String,
    pub display_name: String,
    pub kind: MediaKind,
}
