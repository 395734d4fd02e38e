//! Attachment extraction at the transport boundary.
//!
//! Probes an inbound Telegram message for a supported media kind in fixed
//! precedence order (document, photo, video, audio, voice, animation,
//! sticker) and normalizes the first match into a `MediaAttachment`. The
//! rest of the system never looks at raw teloxide types.

use droplink_core::{MediaAttachment, MediaKind};
use teloxide::types::Message;

/// Extract the first supported attachment from a message, if any.
pub fn media_attachment(msg: &Message) -> Option<MediaAttachment> {
    let caption = msg.caption();

    if let Some(doc) = msg.document() {
        return Some(MediaAttachment {
            file_ref: doc.file.id.clone(),
            display_name: named(doc.file_name.as_deref(), None, MediaKind::Document),
            kind: MediaKind::Document,
        });
    }

    if let Some(sizes) = msg.photo() {
        // Telegram orders photo sizes ascending; the last is the largest.
        let best = sizes.last()?;
        return Some(MediaAttachment {
            file_ref: best.file.id.clone(),
            display_name: named(None, caption, MediaKind::Photo),
            kind: MediaKind::Photo,
        });
    }

    if let Some(video) = msg.video() {
        return Some(MediaAttachment {
            file_ref: video.file.id.clone(),
            display_name: named(video.file_name.as_deref(), caption, MediaKind::Video),
            kind: MediaKind::Video,
        });
    }

    if let Some(audio) = msg.audio() {
        return Some(MediaAttachment {
            file_ref: audio.file.id.clone(),
            display_name: named(audio.file_name.as_deref(), None, MediaKind::Audio),
            kind: MediaKind::Audio,
        });
    }

    if let Some(voice) = msg.voice() {
        return Some(MediaAttachment {
            file_ref: voice.file.id.clone(),
            display_name: MediaKind::Voice.default_name().to_string(),
            kind: MediaKind::Voice,
        });
    }

    if let Some(animation) = msg.animation() {
        return Some(MediaAttachment {
            file_ref: animation.file.id.clone(),
            display_name: MediaKind::Animation.default_name().to_string(),
            kind: MediaKind::Animation,
        });
    }

    if let Some(sticker) = msg.sticker() {
        return Some(MediaAttachment {
            file_ref: sticker.file.id.clone(),
            display_name: MediaKind::Sticker.default_name().to_string(),
            kind: MediaKind::Sticker,
        });
    }

    None
}

/// Pick a display name: explicit file name first, then caption, then the
/// kind-specific default.
fn named(file_name: Option<&str>, caption: Option<&str>, kind: MediaKind) -> String {
    file_name
        .or(caption)
        .filter(|s| !s.is_empty())
        .unwrap_or(kind.default_name())
        .to_string()
}
