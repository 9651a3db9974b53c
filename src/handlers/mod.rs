pub mod callback_handler;
pub mod command_handler;
pub mod message_handler;

pub use callback_handler::CallbackHandler;
pub use command_handler::CommandHandler;
pub use message_handler::MessageHandler;

use teloxide::types::Chat;

use crate::router::ChatType;

pub(crate) fn chat_type_of(chat: &Chat) -> ChatType {
    if chat.is_private() {
        ChatType::Private
    } else {
        ChatType::Group
    }
}
