use log::{error, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::persistence::Persistence;

#[derive(Debug)]
pub enum StoreError {
    Io(std::io::Error),
    Serialization(serde_json::Error),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "Storage I/O error: {}", e),
            StoreError::Serialization(e) => write!(f, "Storage serialization error: {}", e),
        }
    }
}

impl Error for StoreError {}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        StoreError::Io(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serialization(err)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Translator,
    Client,
}

impl Role {
    /// callback payload carried by the role buttons
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Translator => "translator",
            Role::Client => "client",
        }
    }

    pub fn from_callback(data: &str) -> Option<Self> {
        match data {
            "translator" => Some(Role::Translator),
            "client" => Some(Role::Client),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslatorProfile {
    // files written by older deployments keep the id only as the map key
    #[serde(default)]
    pub user_id: i64,
    pub name: String,
    pub city: String,
    pub language_level: String,
    /// kept exactly as typed, e.g. "20,5"
    pub price: String,
    pub contact: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientProfile {
    #[serde(default)]
    pub user_id: i64,
    pub city: String,
    /// the verification answer describing what the client needs
    #[serde(default)]
    pub service_needed: String,
    #[serde(default)]
    pub registration_complete: bool,
}

/// the three persisted collections, keyed by Telegram user id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collections {
    pub users: BTreeMap<i64, Role>,
    pub translators: BTreeMap<i64, TranslatorProfile>,
    pub clients: BTreeMap<i64, ClientProfile>,
}

impl Collections {
    /// makes the map key authoritative for the `user_id` stored inside each profile
    pub fn rekey(&mut self) {
        for (user_id, profile) in self.translators.iter_mut() {
            profile.user_id = *user_id;
        }
        for (user_id, profile) in self.clients.iter_mut() {
            profile.user_id = *user_id;
        }
    }
}

/// aggregate numbers for the read-only dashboard
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub translator_count: usize,
    pub client_count: usize,
    pub cities: DashboardCities,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardCities {
    pub translators: Vec<String>,
    pub clients: Vec<String>,
}

/// repository over roles and profiles with a write-through policy:
/// every mutation rewrites all collections through the backend before the write lock is released
pub struct ProfileStore {
    data: RwLock<Collections>,
    persistence: Arc<dyn Persistence>,
}

impl ProfileStore {
    pub fn open(persistence: Arc<dyn Persistence>) -> Self {
        let data = persistence.load();
        info!(
            "Loaded {} users, {} translators, {} clients",
            data.users.len(),
            data.translators.len(),
            data.clients.len()
        );
        Self {
            data: RwLock::new(data),
            persistence,
        }
    }

    async fn mutate<F>(&self, change: F)
    where
        F: FnOnce(&mut Collections),
    {
        let mut data = self.data.write().await;
        change(&mut data);
        // the write guard is held until the save finishes so saves land in mutation order.
        // in-memory state stays authoritative when the backend fails
        if let Err(e) = self.save(data.clone()).await {
            error!("Failed to persist profile data: {}", e);
        }
    }

    /// runs the backend's blocking save on tokio's blocking pool
    async fn save(&self, data: Collections) -> Result<(), StoreError> {
        let persistence = self.persistence.clone();
        tokio::task::spawn_blocking(move || persistence.save(&data))
            .await
            .map_err(|e| StoreError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?
    }

    /// saves the current state explicitly, surfacing the backend error
    pub async fn flush(&self) -> Result<(), StoreError> {
        let data = self.data.read().await;
        self.save(data.clone()).await
    }

    pub async fn role(&self, user_id: i64) -> Option<Role> {
        self.data.read().await.users.get(&user_id).copied()
    }

    /// records the role and drops any profile belonging to the other role
    pub async fn set_role(&self, user_id: i64, role: Role) {
        self.mutate(|data| {
            data.users.insert(user_id, role);
            match role {
                Role::Translator => {
                    data.clients.remove(&user_id);
                }
                Role::Client => {
                    data.translators.remove(&user_id);
                }
            }
        })
        .await;
        info!("User {} selected role {}", user_id, role.as_str());
    }

    pub async fn translator(&self, user_id: i64) -> Option<TranslatorProfile> {
        self.data.read().await.translators.get(&user_id).cloned()
    }

    pub async fn upsert_translator(&self, profile: TranslatorProfile) {
        let user_id = profile.user_id;
        self.mutate(|data| {
            data.users.insert(user_id, Role::Translator);
            data.clients.remove(&user_id);
            data.translators.insert(user_id, profile);
        })
        .await;
        info!("Stored translator profile for user {}", user_id);
    }

    pub async fn client(&self, user_id: i64) -> Option<ClientProfile> {
        self.data.read().await.clients.get(&user_id).cloned()
    }

    pub async fn upsert_client(&self, profile: ClientProfile) {
        let user_id = profile.user_id;
        self.mutate(|data| {
            data.users.insert(user_id, Role::Client);
            data.translators.remove(&user_id);
            data.clients.insert(user_id, profile);
        })
        .await;
        info!("Stored client profile for user {}", user_id);
    }

    pub async fn translators(&self) -> Vec<TranslatorProfile> {
        self.data.read().await.translators.values().cloned().collect()
    }

    pub async fn clients(&self) -> Vec<ClientProfile> {
        self.data.read().await.clients.values().cloned().collect()
    }

    pub async fn translators_in_city(&self, city: &str) -> Vec<TranslatorProfile> {
        let city = city.to_lowercase();
        self.data
            .read()
            .await
            .translators
            .values()
            .filter(|t| t.city.to_lowercase() == city)
            .cloned()
            .collect()
    }

    pub async fn clients_in_city(&self, city: &str) -> Vec<ClientProfile> {
        let city = city.to_lowercase();
        self.data
            .read()
            .await
            .clients
            .values()
            .filter(|c| c.city.to_lowercase() == city)
            .cloned()
            .collect()
    }

    /// consistent copy of every collection for read-only aggregation
    pub async fn snapshot(&self) -> Collections {
        self.data.read().await.clone()
    }

    pub async fn dashboard_stats(&self) -> DashboardStats {
        let data = self.data.read().await;
        let translator_cities: BTreeSet<String> =
            data.translators.values().map(|t| t.city.clone()).collect();
        let client_cities: BTreeSet<String> =
            data.clients.values().map(|c| c.city.clone()).collect();

        DashboardStats {
            translator_count: data.translators.len(),
            client_count: data.clients.len(),
            cities: DashboardCities {
                translators: translator_cities.into_iter().collect(),
                clients: client_cities.into_iter().collect(),
            },
        }
    }
}
