use log::{debug, info, warn};
use std::sync::Arc;

use crate::detection::is_suspicious_client_verification;
use crate::localization::Lang;
use crate::reply::Reply;
use crate::session::{SessionManager, SessionState};
use crate::store::{ClientProfile, ProfileStore, Role, TranslatorProfile};
use crate::utils::MessageFormatter;
use crate::validation::{normalize_language_level, validate_price};

/// where the form goes after an invalid language level or price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RetryPolicy {
    /// invalid level re-asks the city, invalid price re-asks the level
    #[default]
    PreviousStep,
    /// the rejected step is asked again
    SameStep,
}

impl RetryPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "previous" | "previous_step" => Some(RetryPolicy::PreviousStep),
            "same" | "same_step" => Some(RetryPolicy::SameStep),
            _ => None,
        }
    }
}

/// drives the translator and client registration forms.
///
/// Translator: name → city → level → price → contact. Client: city → verification.
/// Profiles are written only once the last field arrives; the role is written as soon
/// as it is chosen.
pub struct RegistrationFlow {
    sessions: SessionManager,
    store: Arc<ProfileStore>,
    retry_policy: RetryPolicy,
}

impl RegistrationFlow {
    pub fn new(store: Arc<ProfileStore>, retry_policy: RetryPolicy) -> Self {
        Self {
            sessions: SessionManager::new(),
            store,
            retry_policy,
        }
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// (re)starts the form from the role choice, dropping any earlier progress
    pub async fn start(&self, user_id: i64, chat_id: i64, first_name: &str, lang: Lang) -> Vec<Reply> {
        if self.sessions.clear_session(user_id).await {
            info!("User {} restarted registration", user_id);
        } else {
            info!("User {} started registration", user_id);
        }
        self.sessions.start_session(user_id, chat_id).await;

        vec![Reply::RoleChoice {
            text: lang.start_message(first_name),
        }]
    }

    pub async fn cancel(&self, user_id: i64, lang: Lang) -> Vec<Reply> {
        if self.sessions.clear_session(user_id).await {
            info!("User {} cancelled registration", user_id);
        }
        vec![Reply::plain(lang.cancel_message())]
    }

    /// handles a role button press; ignored unless the user is choosing a role
    /// in the chat where the buttons were sent
    pub async fn select_role(&self, user_id: i64, chat_id: i64, role: Role, lang: Lang) -> Vec<Reply> {
        match self.sessions.get_session(user_id).await {
            Some(session)
                if session.state == SessionState::SelectingRole && session.chat_id == chat_id => {}
            _ => {
                debug!("Ignoring role button from user {} outside role selection", user_id);
                return Vec::new();
            }
        }

        self.store.set_role(user_id, role).await;

        let (next_state, prompt) = match role {
            Role::Translator => (SessionState::TranslatorName, lang.translator_selected()),
            Role::Client => (SessionState::ClientCity, lang.client_selected()),
        };
        self.sessions.set_state(user_id, next_state).await;

        vec![Reply::EditPrompt {
            text: prompt.to_string(),
            html: true,
        }]
    }

    /// feeds free text into the form.
    ///
    /// Returns `None` when the text is not form input: no session, a session bound to
    /// another chat, or a session still waiting for the role buttons.
    pub async fn handle_text(
        &self,
        user_id: i64,
        chat_id: i64,
        text: &str,
        lang: Lang,
    ) -> Option<Vec<Reply>> {
        let session = self.sessions.get_session(user_id).await?;
        if session.chat_id != chat_id {
            return None;
        }

        let replies = match session.state {
            SessionState::SelectingRole => return None,
            SessionState::TranslatorName => {
                let reply = Reply::plain(lang.translator_city_prompt(text));
                self.advance(user_id, SessionState::TranslatorCity { name: text.to_string() })
                    .await;
                vec![reply]
            }
            SessionState::TranslatorCity { name } => {
                self.advance(
                    user_id,
                    SessionState::TranslatorLevel {
                        name,
                        city: text.to_string(),
                    },
                )
                .await;
                vec![Reply::plain(lang.translator_level_prompt())]
            }
            SessionState::TranslatorLevel { name, city } => match normalize_language_level(text) {
                Some(language_level) => {
                    self.advance(
                        user_id,
                        SessionState::TranslatorPrice {
                            name,
                            city,
                            language_level,
                        },
                    )
                    .await;
                    vec![Reply::plain(lang.translator_price_prompt())]
                }
                None => {
                    let invalid = Reply::plain(lang.translator_level_invalid());
                    match self.retry_policy {
                        RetryPolicy::PreviousStep => {
                            self.advance(user_id, SessionState::TranslatorCity { name })
                                .await;
                            vec![invalid, Reply::plain(lang.translator_city_again())]
                        }
                        RetryPolicy::SameStep => {
                            self.advance(user_id, SessionState::TranslatorLevel { name, city })
                                .await;
                            vec![invalid]
                        }
                    }
                }
            },
            SessionState::TranslatorPrice {
                name,
                city,
                language_level,
            } => {
                if validate_price(text) {
                    self.advance(
                        user_id,
                        SessionState::TranslatorContact {
                            name,
                            city,
                            language_level,
                            price: text.to_string(),
                        },
                    )
                    .await;
                    vec![Reply::plain(lang.translator_contact_prompt())]
                } else {
                    let invalid = Reply::plain(lang.translator_price_invalid());
                    match self.retry_policy {
                        RetryPolicy::PreviousStep => {
                            self.advance(user_id, SessionState::TranslatorLevel { name, city })
                                .await;
                            vec![invalid, Reply::plain(lang.translator_level_prompt())]
                        }
                        RetryPolicy::SameStep => {
                            self.advance(
                                user_id,
                                SessionState::TranslatorPrice {
                                    name,
                                    city,
                                    language_level,
                                },
                            )
                            .await;
                            vec![invalid]
                        }
                    }
                }
            }
            SessionState::TranslatorContact {
                name,
                city,
                language_level,
                price,
            } => {
                let profile = TranslatorProfile {
                    user_id,
                    name,
                    city,
                    language_level,
                    price,
                    contact: text.to_string(),
                };
                self.finish_translator(profile, lang).await
            }
            SessionState::ClientCity => {
                self.advance(user_id, SessionState::ClientVerification { city: text.to_string() })
                    .await;
                vec![Reply::plain(lang.client_verification_prompt())]
            }
            SessionState::ClientVerification { city } => {
                self.finish_client(user_id, city, text, lang).await
            }
        };

        Some(replies)
    }

    async fn advance(&self, user_id: i64, state: SessionState) {
        debug!("User {} registration moves to {:?}", user_id, state);
        self.sessions.set_state(user_id, state).await;
    }

    async fn finish_translator(&self, profile: TranslatorProfile, lang: Lang) -> Vec<Reply> {
        let user_id = profile.user_id;
        let confirmation = lang.translator_registration_complete(
            &MessageFormatter::escape_html(&profile.name),
            &MessageFormatter::escape_html(&profile.city),
            &MessageFormatter::escape_html(&profile.language_level),
            &MessageFormatter::escape_html(&profile.price),
            &MessageFormatter::escape_html(&profile.contact),
        );

        self.store.upsert_translator(profile).await;
        self.sessions.clear_session(user_id).await;
        info!("Translator {} completed registration", user_id);

        vec![
            Reply::html(confirmation),
            Reply::html(lang.translator_instructions()),
        ]
    }

    async fn finish_client(&self, user_id: i64, city: String, verification: &str, lang: Lang) -> Vec<Reply> {
        self.sessions.clear_session(user_id).await;

        if is_suspicious_client_verification(verification) {
            warn!(
                "Rejected client registration of user {}: verification looks like a translator",
                user_id
            );
            return vec![Reply::plain(lang.client_suspicious())];
        }

        let confirmation = lang.client_registration_complete(&MessageFormatter::escape_html(&city));
        self.store
            .upsert_client(ClientProfile {
                user_id,
                city,
                service_needed: verification.to_string(),
                registration_complete: true,
            })
            .await;
        info!("Client {} completed registration", user_id);

        vec![Reply::html(confirmation), Reply::html(lang.client_instructions())]
    }
}
