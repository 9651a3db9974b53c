use teloxide::prelude::*;

use crate::bot::{BotContext, HandlerResult, ReplyTarget, TelegramBot};
use crate::handlers::chat_type_of;
use crate::router::{EventKind, InboundEvent};

pub struct MessageHandler;

impl MessageHandler {
    pub async fn handle_message(ctx: BotContext, msg: Message) -> ResponseResult<()> {
        let lang = ctx.lang_for(msg.from.as_ref().and_then(|user| user.language_code.as_deref()));
        TelegramBot::guarded(&ctx, msg.chat.id, lang, Self::process(&ctx, &msg)).await
    }

    async fn process(ctx: &BotContext, msg: &Message) -> HandlerResult {
        let (Some(user), Some(text)) = (msg.from.as_ref(), msg.text()) else {
            return Ok(());
        };
        // unknown commands are neither form input nor group chatter
        if text.starts_with('/') {
            return Ok(());
        }

        let lang = ctx.lang_for(user.language_code.as_deref());
        let replies = ctx
            .router
            .handle(InboundEvent {
                user_id: user.id.0 as i64,
                chat_id: msg.chat.id.0,
                chat: chat_type_of(&msg.chat),
                lang,
                kind: EventKind::Text(text.to_string()),
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
