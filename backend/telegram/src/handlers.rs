//! Upload and retrieval handler logic.
//!
//! The two flows are plain async functions over the `FileStore` trait,
//! returning outcome enums; the teloxide endpoints in `bot` translate the
//! outcomes into replies. Keeping the decisions transport-free is what makes
//! them testable against an in-memory store.

use anyhow::{bail, Result};
use tracing::{info, warn};

use droplink_core::{short_id, DropError, MediaAttachment, StoredFile};
use droplink_storage::FileStore;

/// How many fresh ids to try before giving up on an upload.
const MAX_ID_ATTEMPTS: u32 = 3;

pub const WELCOME_TEXT: &str =
    "Welcome! If you have a file link, open it or send /start <id>.";
pub const NOT_FOUND_TEXT: &str =
    "This link is invalid or the file has been deleted.";
pub const ADMIN_ONLY_TEXT: &str = "Only the admin can upload files.";
pub const UNSUPPORTED_TEXT: &str =
    "Send a supported file (document, photo, video or audio).";

/// Result of an upload attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// Sender is not the configured admin; nothing was stored.
    NotAuthorized,
    /// No supported attachment on the message; nothing was stored.
    Unsupported,
    /// Record persisted; `link` is the shareable deep link.
    Saved { id: String, link: String },
}

/// Result of a `/start` invocation.
#[derive(Debug, Clone)]
pub enum StartReply {
    /// No id argument was given.
    Welcome,
    /// The id did not resolve to a record.
    NotFound,
    /// Send the referenced media back to the requester.
    Send(StoredFile),
}

/// Handle an inbound non-command message as an upload attempt.
///
/// Only the admin may create records; everyone else gets a rejection with no
/// side effect. On an id collision the insert is retried with a fresh id, up
/// to [`MAX_ID_ATTEMPTS`] times.
pub async fn process_upload(
    store: &dyn FileStore,
    admin_id: u64,
    sender: Option<u64>,
    attachment: Option<MediaAttachment>,
    bot_username: &str,
) -> Result<UploadOutcome> {
    if sender != Some(admin_id) {
        return Ok(UploadOutcome::NotAuthorized);
    }

    let Some(attachment) = attachment else {
        return Ok(UploadOutcome::Unsupported);
    };

    for _ in 0..MAX_ID_ATTEMPTS {
        let id = short_id();
        let record = StoredFile::new(&id, attachment.clone());
        match store.insert(&record).await {
            Ok(()) => {
                info!(id = %id, kind = %record.kind, name = %record.display_name, "Stored upload");
                let link = deep_link(bot_username, &id);
                return Ok(UploadOutcome::Saved { id, link });
            }
            Err(e) if e.downcast_ref::<DropError>().is_some_and(duplicate) => {
                warn!(id = %id, "Generated id collided, retrying with a fresh one");
                continue;
            }
            Err(e) => return Err(e),
        }
    }

    bail!("exhausted {MAX_ID_ATTEMPTS} id generation attempts");
}

fn duplicate(e: &DropError) -> bool {
    matches!(e, DropError::DuplicateId(_))
}

/// Handle a `/start` command with an optional id argument.
///
/// Lookup faults are deliberately collapsed into `NotFound`: the requester
/// sees "invalid link" either way, and the fault is logged.
pub async fn process_start(store: &dyn FileStore, arg: &str) -> StartReply {
    let id = arg.trim();
    if id.is_empty() {
        return StartReply::Welcome;
    }

    match store.find(id).await {
        Ok(Some(file)) => StartReply::Send(file),
        Ok(None) => StartReply::NotFound,
        Err(e) => {
            warn!(id = %id, error = %e, "Lookup failed; treating as not found");
            StartReply::NotFound
        }
    }
}

/// Build the shareable deep link for a stored id.
pub fn deep_link(bot_username: &str, id: &str) -> String {
    format!("https://t.me/{bot_username}?start={id}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};

    use droplink_core::MediaKind;
    use droplink_storage::SqliteFileStore;

    const ADMIN: u64 = 42;

    fn doc(name: &str) -> MediaAttachment {
        MediaAttachment {
            file_ref: "tg-doc-1".to_string(),
            display_name: name.to_string(),
            kind: MediaKind::Document,
        }
    }

    #[tokio::test]
    async fn non_admin_upload_creates_no_record() {
        let store = SqliteFileStore::in_memory().unwrap();
        let outcome = process_upload(&store, ADMIN, Some(7), Some(doc("x")), "sharebot")
            .await
            .unwrap();
        assert_eq!(outcome, UploadOutcome::NotAuthorized);

        // A later lookup with any id must still miss.
        assert!(matches!(
            process_start(&store, "whatever").await,
            StartReply::NotFound
        ));
    }

    #[tokio::test]
    async fn anonymous_sender_is_rejected() {
        let store = SqliteFileStore::in_memory().unwrap();
        let outcome = process_upload(&store, ADMIN, None, Some(doc("x")), "sharebot")
            .await
            .unwrap();
        assert_eq!(outcome, UploadOutcome::NotAuthorized);
    }

    #[tokio::test]
    async fn upload_without_attachment_creates_no_record() {
        let store = SqliteFileStore::in_memory().unwrap();
        let outcome = process_upload(&store, ADMIN, Some(ADMIN), None, "sharebot")
            .await
            .unwrap();
        assert_eq!(outcome, UploadOutcome::Unsupported);
    }

    #[tokio::test]
    async fn document_upload_then_retrieval_roundtrip() {
        let store = SqliteFileStore::in_memory().unwrap();
        let outcome =
            process_upload(&store, ADMIN, Some(ADMIN), Some(doc("report.pdf")), "sharebot")
                .await
                .unwrap();

        let UploadOutcome::Saved { id, link } = outcome else {
            panic!("expected Saved");
        };
        assert!(!id.is_empty());
        assert_eq!(link, format!("https://t.me/sharebot?start={id}"));

        match process_start(&store, &id).await {
            StartReply::Send(file) => {
                assert_eq!(file.kind, MediaKind::Document);
                assert_eq!(file.file_ref, "tg-doc-1");
                assert_eq!(file.display_name, "report.pdf");
            }
            other => panic!("expected Send, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn photo_caption_becomes_display_name() {
        let store = SqliteFileStore::in_memory().unwrap();
        let photo = MediaAttachment {
            file_ref: "tg-photo-1".to_string(),
            display_name: "sunset".to_string(),
            kind: MediaKind::Photo,
        };
        let outcome = process_upload(&store, ADMIN, Some(ADMIN), Some(photo), "sharebot")
            .await
            .unwrap();
        let UploadOutcome::Saved { id, .. } = outcome else {
            panic!("expected Saved");
        };

        match process_start(&store, &id).await {
            StartReply::Send(file) => {
                assert_eq!(file.kind, MediaKind::Photo);
                assert_eq!(file.display_name, "sunset");
            }
            other => panic!("expected Send, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn start_without_argument_is_welcome() {
        let store = SqliteFileStore::in_memory().unwrap();
        assert!(matches!(process_start(&store, "").await, StartReply::Welcome));
        assert!(matches!(process_start(&store, "   ").await, StartReply::Welcome));
    }

    #[tokio::test]
    async fn start_with_unknown_id_is_not_found() {
        let store = SqliteFileStore::in_memory().unwrap();
        assert!(matches!(
            process_start(&store, "doesnotexist").await,
            StartReply::NotFound
        ));
    }

    /// Store that reports a duplicate id a fixed number of times before
    /// delegating to a real in-memory store.
    struct CollidingStore {
        inner: SqliteFileStore,
        remaining_collisions: AtomicU32,
    }

    #[async_trait]
    impl FileStore for CollidingStore {
        async fn insert(&self, file: &StoredFile) -> Result<()> {
            if self.remaining_collisions.fetch_sub(1, Ordering::SeqCst) > 0 {
                return Err(DropError::DuplicateId(file.id.clone()).into());
            }
            self.inner.insert(file).await
        }

        async fn find(&self, id: &str) -> Result<Option<StoredFile>> {
            self.inner.find(id).await
        }
    }

    #[tokio::test]
    async fn upload_retries_past_id_collision() {
        let store = CollidingStore {
            inner: SqliteFileStore::in_memory().unwrap(),
            remaining_collisions: AtomicU32::new(2),
        };
        let outcome = process_upload(&store, ADMIN, Some(ADMIN), Some(doc("x")), "sharebot")
            .await
            .unwrap();
        assert!(matches!(outcome, UploadOutcome::Saved { .. }));
    }

    #[tokio::test]
    async fn upload_gives_up_after_bounded_collisions() {
        let store = CollidingStore {
            inner: SqliteFileStore::in_memory().unwrap(),
            remaining_collisions: AtomicU32::new(u32::MAX / 2),
        };
        let err = process_upload(&store, ADMIN, Some(ADMIN), Some(doc("x")), "sharebot")
            .await
            .expect_err("must give up eventually");
        assert!(err.to_string().contains("exhausted"));
    }
}
