use log::{error, info, warn};
use std::error::Error;
use std::future::Future;
use std::sync::Arc;
use teloxide::prelude::*;
use teloxide::types::{
    CallbackQuery, InlineKeyboardButton, InlineKeyboardMarkup, MessageId, ParseMode, Recipient,
    ReplyParameters,
};
use teloxide::utils::command::BotCommands;

use crate::config::BotConfig;
use crate::handlers::{CallbackHandler, CommandHandler, MessageHandler};
use crate::localization::Lang;
use crate::reply::Reply;
use crate::router::Router;
use crate::store::Role;

pub type HandlerResult = Result<(), Box<dyn Error + Send + Sync>>;

#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Supported commands:")]
pub enum Command {
    #[command(description = "register as a translator or client")]
    Start,
    #[command(description = "cancel the current registration")]
    Cancel,
    #[command(description = "show help")]
    Help,
    #[command(description = "tell the group you found a translator")]
    Found,
    #[command(description = "data summary (admins only)")]
    Admin,
}

#[derive(Clone)]
pub struct BotContext {
    pub bot: Bot,
    pub router: Arc<Router>,
    pub config: Arc<BotConfig>,
}

impl BotContext {
    pub fn lang_for(&self, language_code: Option<&str>) -> Lang {
        Lang::from_code(language_code, self.config.default_lang)
    }
}

/// where the replies to one inbound update go
#[derive(Debug, Clone, Copy)]
pub struct ReplyTarget {
    pub chat_id: ChatId,
    /// message answered by quoted replies
    pub message_id: Option<MessageId>,
    /// message carrying the role buttons, edited in place
    pub prompt_message_id: Option<MessageId>,
}

pub struct TelegramBot {
    bot: Bot,
    router: Arc<Router>,
    config: Arc<BotConfig>,
}

impl TelegramBot {
    pub fn new(config: Arc<BotConfig>, router: Arc<Router>) -> Self {
        Self {
            bot: Bot::new(&config.bot_token),
            router,
            config,
        }
    }

    /// looks the configured group up so its chat id shows in the logs
    async fn resolve_group(&self) {
        let Some(group_username) = &self.config.group_username else {
            return;
        };

        info!("Attempting to get information for group @{}", group_username);
        match self
            .bot
            .get_chat(Recipient::ChannelUsername(format!("@{}", group_username)))
            .await
        {
            Ok(chat) => info!("Group @{} resolved to chat id {}", group_username, chat.id),
            Err(e) => warn!(
                "Failed to resolve group @{}: {}. The bot keeps running until it is added to the group.",
                group_username, e
            ),
        }
    }

    pub async fn run(&self) {
        info!("Starting Telegram bot...");

        self.resolve_group().await;
        if let Err(e) = self.bot.set_my_commands(Command::bot_commands()).await {
            warn!("Failed to register bot commands: {}", e);
        }

        let ctx = BotContext {
            bot: self.bot.clone(),
            router: self.router.clone(),
            config: self.config.clone(),
        };

        let handler = dptree::entry()
            .branch(Update::filter_callback_query().endpoint({
                let ctx = ctx.clone();
                move |query: CallbackQuery| {
                    let ctx = ctx.clone();
                    async move { CallbackHandler::handle_callback_query(ctx, query).await }
                }
            }))
            .branch(
                Update::filter_message()
                    .branch(dptree::entry().filter_command::<Command>().endpoint({
                        let ctx = ctx.clone();
                        move |msg: Message, cmd: Command| {
                            let ctx = ctx.clone();
                            async move { CommandHandler::handle_command(ctx, msg, cmd).await }
                        }
                    }))
                    .branch(dptree::endpoint({
                        let ctx = ctx.clone();
                        move |msg: Message| {
                            let ctx = ctx.clone();
                            async move { MessageHandler::handle_message(ctx, msg).await }
                        }
                    })),
            );

        Dispatcher::builder(self.bot.clone(), handler)
            .error_handler(
                teloxide::error_handlers::LoggingErrorHandler::with_custom_text(
                    "An error from the update listener",
                ),
            )
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;
    }

    /// runs a handler, turning any failure into a log line and a generic notice to the chat
    pub async fn guarded<F>(ctx: &BotContext, chat_id: ChatId, lang: Lang, work: F) -> ResponseResult<()>
    where
        F: Future<Output = HandlerResult>,
    {
        if let Err(e) = work.await {
            error!("Failed to handle update in chat {}: {}", chat_id, e);
            if let Err(send_err) = ctx.bot.send_message(chat_id, lang.error_generic()).await {
                error!("Failed to send error notice to chat {}: {}", chat_id, send_err);
            }
        }
        Ok(())
    }

    pub fn role_keyboard(lang: Lang) -> InlineKeyboardMarkup {
        InlineKeyboardMarkup::new(vec![vec![
            InlineKeyboardButton::callback(lang.translator_button(), Role::Translator.as_str()),
            InlineKeyboardButton::callback(lang.client_button(), Role::Client.as_str()),
        ]])
    }

    /// sends the replies in order; the first failure aborts the rest
    pub async fn deliver(
        ctx: &BotContext,
        target: ReplyTarget,
        lang: Lang,
        replies: Vec<Reply>,
    ) -> HandlerResult {
        for reply in replies {
            match reply {
                Reply::Text { text, html, quote } => {
                    let mut request = ctx.bot.send_message(target.chat_id, text);
                    if html {
                        request = request.parse_mode(ParseMode::Html);
                    }
                    if quote {
                        if let Some(message_id) = target.message_id {
                            request = request.reply_parameters(ReplyParameters::new(message_id));
                        }
                    }
                    request.await?;
                }
                Reply::EditPrompt { text, html } => match target.prompt_message_id {
                    Some(message_id) => {
                        let mut request = ctx.bot.edit_message_text(target.chat_id, message_id, text);
                        if html {
                            request = request.parse_mode(ParseMode::Html);
                        }
                        request.await?;
                    }
                    None => {
                        let mut request = ctx.bot.send_message(target.chat_id, text);
                        if html {
                            request = request.parse_mode(ParseMode::Html);
                        }
                        request.await?;
                    }
                },
                Reply::RoleChoice { text } => {
                    ctx.bot
                        .send_message(target.chat_id, text)
                        .reply_markup(Self::role_keyboard(lang))
                        .await?;
                }
            }
        }
        Ok(())
    }
}
