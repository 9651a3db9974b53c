use std::env;
use std::error::Error;
use std::fmt;
use std::path::PathBuf;

use crate::localization::Lang;
use crate::registration::RetryPolicy;

pub const DEFAULT_DATA_DIR: &str = "data";
/// 0 leaves the flood guard off
pub const DEFAULT_MAX_MESSAGES_PER_MINUTE: u32 = 0;

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} environment variable is required", key),
            ConfigError::Invalid { key, value } => {
                write!(f, "Invalid value for {}: {:?}", key, value)
            }
        }
    }
}

impl Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub bot_token: String,
    pub admin_user_ids: Vec<i64>,
    pub data_dir: PathBuf,
    /// group username without the leading @
    pub group_username: Option<String>,
    pub max_messages_per_minute: u32,
    pub default_lang: Lang,
    pub retry_policy: RetryPolicy,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            admin_user_ids: Vec::new(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            group_username: None,
            max_messages_per_minute: DEFAULT_MAX_MESSAGES_PER_MINUTE,
            default_lang: Lang::default(),
            retry_policy: RetryPolicy::default(),
        }
    }
}

impl BotConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// builds the config from any key lookup, so tests need not touch the process environment
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let bot_token = lookup("BOT_TOKEN")
            .filter(|token| !token.trim().is_empty())
            .ok_or(ConfigError::Missing("BOT_TOKEN"))?;

        let admin_user_ids = match lookup("ADMIN_USER_IDS") {
            Some(raw) => parse_admin_ids(&raw)?,
            None => Vec::new(),
        };

        let data_dir = lookup("DATA_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let group_username = lookup("GROUP_USERNAME")
            .map(|name| name.trim().trim_start_matches('@').to_string())
            .filter(|name| !name.is_empty());

        let max_messages_per_minute = match lookup("MAX_MESSAGES_PER_MINUTE") {
            Some(raw) => raw.trim().parse::<u32>().map_err(|_| ConfigError::Invalid {
                key: "MAX_MESSAGES_PER_MINUTE",
                value: raw,
            })?,
            None => DEFAULT_MAX_MESSAGES_PER_MINUTE,
        };

        let default_lang = match lookup("DEFAULT_LANGUAGE") {
            Some(raw) => Lang::parse(&raw).ok_or(ConfigError::Invalid {
                key: "DEFAULT_LANGUAGE",
                value: raw,
            })?,
            None => Lang::default(),
        };

        let retry_policy = match lookup("REGISTRATION_RETRY") {
            Some(raw) => RetryPolicy::parse(&raw).ok_or(ConfigError::Invalid {
                key: "REGISTRATION_RETRY",
                value: raw,
            })?,
            None => RetryPolicy::default(),
        };

        Ok(Self {
            bot_token,
            admin_user_ids,
            data_dir,
            group_username,
            max_messages_per_minute,
            default_lang,
            retry_policy,
        })
    }

    pub fn is_admin(&self, user_id: i64) -> bool {
        self.admin_user_ids.contains(&user_id)
    }
}

/// comma-separated ids; blank entries are skipped
fn parse_admin_ids(raw: &str) -> Result<Vec<i64>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(|id| {
            id.parse::<i64>().map_err(|_| ConfigError::Invalid {
                key: "ADMIN_USER_IDS",
                value: id.to_string(),
            })
        })
        .collect()
}
