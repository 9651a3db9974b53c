use log::info;
use teloxide::prelude::*;

use crate::bot::{BotContext, Command, HandlerResult, ReplyTarget, TelegramBot};
use crate::handlers::chat_type_of;
use crate::router::{EventKind, InboundEvent};

pub struct CommandHandler;

impl CommandHandler {
    pub async fn handle_command(ctx: BotContext, msg: Message, cmd: Command) -> ResponseResult<()> {
        let lang = ctx.lang_for(msg.from.as_ref().and_then(|user| user.language_code.as_deref()));
        TelegramBot::guarded(&ctx, msg.chat.id, lang, Self::process(&ctx, &msg, cmd)).await
    }

    async fn process(ctx: &BotContext, msg: &Message, cmd: Command) -> HandlerResult {
        let Some(user) = msg.from.as_ref() else {
            // channel posts and anonymous admins carry no sender
            return Ok(());
        };
        let user_id = user.id.0 as i64;
        let lang = ctx.lang_for(user.language_code.as_deref());

        info!("User {} sent /{:?} in chat {}", user_id, cmd, msg.chat.id);

        let kind = match cmd {
            Command::Start => EventKind::Start {
                first_name: user.first_name.clone(),
            },
            Command::Cancel => EventKind::Cancel,
            Command::Help => EventKind::Help,
            Command::Found => EventKind::Found,
            Command::Admin => EventKind::Admin,
        };

        let replies = ctx
            .router
            .handle(InboundEvent {
                user_id,
                chat_id: msg.chat.id.0,
                chat: chat_type_of(&msg.chat),
                lang,
                kind,
            })
            .await;

        let target = ReplyTarget {
            chat_id: msg.chat.id,
            message_id: Some(msg.id),
            prompt_message_id: None,
        };
        TelegramBot::deliver(ctx, target, lang, replies).await
    }
}
