use log::info;
use std::collections::{HashMap, VecDeque};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const WINDOW: Duration = Duration::from_secs(60);

/// per-user sliding-window counter for group messages
pub struct FloodGuard {
    max_per_minute: u32,
    recent: Mutex<HashMap<i64, VecDeque<Instant>>>,
}

impl FloodGuard {
    /// `max_per_minute` of 0 disables the guard
    pub fn new(max_per_minute: u32) -> Self {
        Self {
            max_per_minute,
            recent: Mutex::new(HashMap::new()),
        }
    }

    /// records a message and reports whether the user is over the limit
    pub async fn record(&self, user_id: i64) -> bool {
        self.record_at(user_id, Instant::now()).await
    }

    pub async fn record_at(&self, user_id: i64, now: Instant) -> bool {
        if self.max_per_minute == 0 {
            return false;
        }

        let mut recent = self.recent.lock().await;
        for timestamps in recent.values_mut() {
            while let Some(oldest) = timestamps.front() {
                if now.saturating_duration_since(*oldest) >= WINDOW {
                    timestamps.pop_front();
                } else {
                    break;
                }
            }
        }
        // users quiet for a whole window are forgotten
        recent.retain(|_, timestamps| !timestamps.is_empty());

        let timestamps = recent.entry(user_id).or_default();
        timestamps.push_back(now);

        let flooding = timestamps.len() > self.max_per_minute as usize;
        if flooding {
            info!(
                "User {} sent {} group messages within a minute",
                user_id,
                timestamps.len()
            );
        }
        flooding
    }

    /// number of users with messages inside the current window
    pub async fn tracked_users(&self) -> usize {
        self.recent.lock().await.len()
    }
}
