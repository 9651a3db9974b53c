use log::debug;
use teloxide::prelude::*;
use teloxide::types::{CallbackQuery, ChatId, MaybeInaccessibleMessage, MessageId};

use crate::bot::{BotContext, HandlerResult, ReplyTarget, TelegramBot};
use crate::handlers::chat_type_of;
use crate::router::{ChatType, EventKind, InboundEvent};
use crate::store::Role;

pub struct CallbackHandler;

impl CallbackHandler {
    fn message_location(message: &MaybeInaccessibleMessage) -> (ChatId, MessageId, ChatType) {
        match message {
            MaybeInaccessibleMessage::Regular(msg) => (msg.chat.id, msg.id, chat_type_of(&msg.chat)),
            MaybeInaccessibleMessage::Inaccessible(msg) => {
                (msg.chat.id, msg.message_id, chat_type_of(&msg.chat))
            }
        }
    }

    pub async fn handle_callback_query(ctx: BotContext, query: CallbackQuery) -> ResponseResult<()> {
        let lang = ctx.lang_for(query.from.language_code.as_deref());

        if let Some(message) = &query.message {
            let (chat_id, _, _) = Self::message_location(message);
            TelegramBot::guarded(&ctx, chat_id, lang, Self::process(&ctx, &query, message)).await?;
        }

        ctx.bot.answer_callback_query(query.id.clone()).await?;
        Ok(())
    }

    async fn process(
        ctx: &BotContext,
        query: &CallbackQuery,
        message: &MaybeInaccessibleMessage,
    ) -> HandlerResult {
        let Some(role) = query.data.as_deref().and_then(Role::from_callback) else {
            debug!("Ignoring unknown callback data {:?}", query.data);
            return Ok(());
        };

        let (chat_id, message_id, chat) = Self::message_location(message);
        let lang = ctx.lang_for(query.from.language_code.as_deref());

        let replies = ctx
            .router
            .handle(InboundEvent {
                user_id: query.from.id.0 as i64,
                chat_id: chat_id.0,
                chat,
                lang,
                kind: EventKind::RoleSelected(role),
            })
            .await;

        let target = ReplyTarget {
            chat_id,
            message_id: None,
            prompt_message_id: Some(message_id),
        };
        TelegramBot::deliver(ctx, target, lang, replies).await
    }
}
