//! Teloxide wiring: command surface, dispatcher, and reply sends.

use std::sync::Arc;

use anyhow::{Context, Result};
use teloxide::payloads::setters::*;
use teloxide::prelude::*;
use teloxide::types::InputFile;
use teloxide::utils::command::{BotCommands, ParseError};
use tracing::info;

use droplink_core::{MediaKind, StoredFile};
use droplink_storage::FileStore;

use crate::extract;
use crate::handlers::{
    self, StartReply, UploadOutcome, ADMIN_ONLY_TEXT, NOT_FOUND_TEXT, UNSUPPORTED_TEXT,
    WELCOME_TEXT,
};

/// Runtime configuration for the Telegram adapter.
#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Bot API access token.
    pub token: String,
    /// Telegram user id of the only sender allowed to upload.
    pub admin_id: u64,
}

/// Shared handle to the file record store, injected into endpoints.
pub type SharedStore = Arc<dyn FileStore>;

#[derive(Debug, Clone)]
struct BotIdentity {
    username: String,
}

#[derive(BotCommands, Clone)]
#[command(rename_rule = "lowercase")]
enum Command {
    /// Retrieve a shared file by id; plain /start greets instead.
    #[command(parse_with = optional_arg)]
    Start(String),
}

/// `/start` takes zero or one argument; teloxide's default parser would
/// reject the zero-argument form.
fn optional_arg(input: String) -> Result<(String,), ParseError> {
    Ok((input.trim().to_string(),))
}

/// Connect to Telegram and run the long-polling dispatcher until shutdown.
pub async fn run(config: BotConfig, store: SharedStore) -> Result<()> {
    let bot = Bot::new(config.token.clone());
    let me = bot
        .get_me()
        .await
        .context("Failed to reach Telegram; check the bot token")?;
    let identity = BotIdentity { username: me.username().to_string() };
    info!(username = %identity.username, "Droplink bot running (polling mode)");

    let handler = Update::filter_message()
        .branch(
            dptree::entry()
                .filter_command::<Command>()
                .endpoint(on_command),
        )
        .branch(dptree::endpoint(on_message));

    Dispatcher::builder(bot, handler)
        .dependencies(dptree::deps![Arc::new(config), store, identity])
        .enable_ctrlc_handler()
        .build()
        .dispatch()
        .await;

    Ok(())
}

/// Retrieval surface: `/start [id]`.
async fn on_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    store: SharedStore,
) -> Result<()> {
    let Command::Start(arg) = cmd;
    match handlers::process_start(store.as_ref(), &arg).await {
        StartReply::Welcome => {
            bot.send_message(msg.chat.id, WELCOME_TEXT).await?;
        }
        StartReply::NotFound => {
            bot.send_message(msg.chat.id, NOT_FOUND_TEXT).await?;
        }
        StartReply::Send(file) => {
            send_stored_file(&bot, msg.chat.id, &file).await?;
        }
    }
    Ok(())
}

/// Upload surface: every other inbound message.
async fn on_message(
    bot: Bot,
    msg: Message,
    config: Arc<BotConfig>,
    store: SharedStore,
    identity: BotIdentity,
) -> Result<()> {
    let sender = msg.from.as_ref().map(|user| user.id.0);
    let attachment = extract::media_attachment(&msg);

    let outcome = handlers::process_upload(
        store.as_ref(),
        config.admin_id,
        sender,
        attachment,
        &identity.username,
    )
    .await?;

    let reply = match outcome {
        UploadOutcome::NotAuthorized => ADMIN_ONLY_TEXT.to_string(),
        UploadOutcome::Unsupported => UNSUPPORTED_TEXT.to_string(),
        UploadOutcome::Saved { link, .. } => format!("File saved ✅\nLink: {link}"),
    };
    bot.send_message(msg.chat.id, reply).await?;
    Ok(())
}

/// Re-send a stored record, dispatching on its kind. Photo, video and audio
/// get their dedicated send operations; everything else goes out as a
/// document.
async fn send_stored_file(bot: &Bot, chat_id: ChatId, file: &StoredFile) -> Result<()> {
    let media = InputFile::file_id(file.file_ref.clone());
    let caption = file.display_name.clone();
    match file.kind {
        MediaKind::Photo => {
            bot.send_photo(chat_id, media).caption(caption).await?;
        }
        MediaKind::Video => {
            bot.send_video(chat_id, media).caption(caption).await?;
        }
        MediaKind::Audio => {
            bot.send_audio(chat_id, media).caption(caption).await?;
        }
        _ => {
            bot.send_document(chat_id, media).caption(caption).await?;
        }
    }
    Ok(())
}
