use std::collections::HashMap;
use tokio::sync::Mutex;

/// step of the registration form; each variant carries the fields collected so far
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    SelectingRole,
    // translator form
    TranslatorName,
    TranslatorCity {
        name: String,
    },
    TranslatorLevel {
        name: String,
        city: String,
    },
    TranslatorPrice {
        name: String,
        city: String,
        language_level: String,
    },
    TranslatorContact {
        name: String,
        city: String,
        language_level: String,
        price: String,
    },
    // client form
    ClientCity,
    ClientVerification {
        city: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserSession {
    pub user_id: i64,
    /// chat the registration was started in; text from other chats is not form input
    pub chat_id: i64,
    pub state: SessionState,
}

/// transient per-user registration state, never persisted
#[derive(Default)]
pub struct SessionManager {
    sessions: Mutex<HashMap<i64, UserSession>>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get_session(&self, user_id: i64) -> Option<UserSession> {
        self.sessions.lock().await.get(&user_id).cloned()
    }

    /// discards whatever the user had in progress and waits for a role choice
    pub async fn start_session(&self, user_id: i64, chat_id: i64) {
        self.sessions.lock().await.insert(
            user_id,
            UserSession {
                user_id,
                chat_id,
                state: SessionState::SelectingRole,
            },
        );
    }

    /// moves an existing session to `state`; returns false when the user has no session
    pub async fn set_state(&self, user_id: i64, state: SessionState) -> bool {
        match self.sessions.lock().await.get_mut(&user_id) {
            Some(session) => {
                session.state = state;
                true
            }
            None => false,
        }
    }

    /// returns true if a session existed
    pub async fn clear_session(&self, user_id: i64) -> bool {
        self.sessions.lock().await.remove(&user_id).is_some()
    }

    pub async fn active_sessions(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
