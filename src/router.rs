use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::config::BotConfig;
use crate::localization::Lang;
use crate::moderation::{self, SenderStatus, Verdict};
use crate::rate_limiters::FloodGuard;
use crate::registration::RegistrationFlow;
use crate::reply::Reply;
use crate::store::{ProfileStore, Role};
use crate::summary::AdminSummary;
use crate::utils::message_formatter::{MessageFormatter, TELEGRAM_MESSAGE_LIMIT};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatType {
    Private,
    Group,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventKind {
    Start { first_name: String },
    Cancel,
    Help,
    Admin,
    Found,
    RoleSelected(Role),
    Text(String),
}

/// an inbound update reduced to what the bot logic needs
#[derive(Debug, Clone)]
pub struct InboundEvent {
    pub user_id: i64,
    pub chat_id: i64,
    pub chat: ChatType,
    pub lang: Lang,
    pub kind: EventKind,
}

/// per-user locks so one user's events are handled strictly one after another
#[derive(Default)]
pub struct UserLocks {
    inner: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl UserLocks {
    pub async fn lock_user(&self, user_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.inner.lock().await;
            locks
                .entry(user_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }

    /// forgets the user's lock once no task holds or waits for it
    pub async fn release_idle(&self, user_id: i64) {
        let mut locks = self.inner.lock().await;
        if let Some(lock) = locks.get(&user_id) {
            if Arc::strong_count(lock) == 1 {
                locks.remove(&user_id);
            }
        }
    }

    pub async fn tracked_users(&self) -> usize {
        self.inner.lock().await.len()
    }
}

/// routes events to registration, moderation or the commands, independent of Telegram
pub struct Router {
    config: Arc<BotConfig>,
    store: Arc<ProfileStore>,
    registration: RegistrationFlow,
    flood_guard: FloodGuard,
    user_locks: UserLocks,
}

impl Router {
    pub fn new(config: Arc<BotConfig>, store: Arc<ProfileStore>) -> Self {
        let registration = RegistrationFlow::new(store.clone(), config.retry_policy);
        let flood_guard = FloodGuard::new(config.max_messages_per_minute);
        Self {
            config,
            store,
            registration,
            flood_guard,
            user_locks: UserLocks::default(),
        }
    }

    pub fn store(&self) -> &Arc<ProfileStore> {
        &self.store
    }

    pub fn registration(&self) -> &RegistrationFlow {
        &self.registration
    }

    pub fn user_locks(&self) -> &UserLocks {
        &self.user_locks
    }

    pub async fn handle(&self, event: InboundEvent) -> Vec<Reply> {
        let user_id = event.user_id;
        let user_guard = self.user_locks.lock_user(user_id).await;
        let replies = self.route(event).await;
        drop(user_guard);
        self.user_locks.release_idle(user_id).await;
        replies
    }

    async fn route(&self, event: InboundEvent) -> Vec<Reply> {
        let lang = event.lang;

        match event.kind {
            EventKind::Start { first_name } => {
                self.registration
                    .start(event.user_id, event.chat_id, &first_name, lang)
                    .await
            }
            EventKind::Cancel => self.registration.cancel(event.user_id, lang).await,
            EventKind::Help => vec![Reply::html(
                lang.help_message(self.config.is_admin(event.user_id)),
            )],
            EventKind::Admin => self.admin_summary(event.user_id, lang).await,
            EventKind::Found => Verdict::TranslatorFound.reply(lang).into_iter().collect(),
            EventKind::RoleSelected(role) => {
                self.registration
                    .select_role(event.user_id, event.chat_id, role, lang)
                    .await
            }
            EventKind::Text(text) => {
                if let Some(replies) = self
                    .registration
                    .handle_text(event.user_id, event.chat_id, &text, lang)
                    .await
                {
                    return replies;
                }

                match event.chat {
                    ChatType::Group => self.moderate(event.user_id, &text, lang).await,
                    ChatType::Private => {
                        debug!("Ignoring private text from user {} outside registration", event.user_id);
                        Vec::new()
                    }
                }
            }
        }
    }

    async fn moderate(&self, user_id: i64, text: &str, lang: Lang) -> Vec<Reply> {
        let flooding = self.flood_guard.record(user_id).await;
        let role = self.store.role(user_id).await;
        let client_profile = match role {
            Some(Role::Client) => self.store.client(user_id).await,
            _ => None,
        };

        let sender = SenderStatus {
            role,
            client_profile,
            flooding,
        };
        let verdict = moderation::evaluate(text, &sender);
        debug!("Group message from user {} judged {:?}", user_id, verdict);

        verdict.reply(lang).into_iter().collect()
    }

    async fn admin_summary(&self, user_id: i64, lang: Lang) -> Vec<Reply> {
        if !self.config.is_admin(user_id) {
            warn!("User {} tried to access the admin summary", user_id);
            return vec![Reply::plain(lang.admin_not_allowed())];
        }

        info!("Admin {} requested the data summary", user_id);
        let snapshot = self.store.snapshot().await;
        let summary = AdminSummary::from_collections(&snapshot).render(lang);

        MessageFormatter::split_by_lines(&summary, TELEGRAM_MESSAGE_LIMIT)
            .into_iter()
            .map(Reply::html)
            .collect()
    }
}
