pub mod bot;
pub mod extract;
pub mod handlers;

pub use bot::{run, BotConfig, SharedStore};
pub use handlers::{process_start, process_upload, StartReply, UploadOutcome};
