pub mod error;
pub mod id;
pub mod types;

pub use error::DropError;
pub use id::short_id;
pub use types::{MediaAttachment, MediaKind, StoredFile};
