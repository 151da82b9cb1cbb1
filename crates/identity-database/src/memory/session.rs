//! In-memory device session repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

use identity_core::result::AppResult;
use identity_entity::session::DeviceSession;

use crate::traits::SessionRepository;

/// Device sessions keyed by device id, with a refresh-hash index.
///
/// Lock order is always `sessions` before `by_hash`. The index may briefly
/// point at a session whose hash has moved on; rotation re-checks the hash
/// under the session's shard lock, so a stale index entry never matches.
#[derive(Debug, Default)]
pub struct MemorySessionRepository {
    sessions: DashMap<String, DeviceSession>,
    by_hash: DashMap<String, String>,
}

impl MemorySessionRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether no sessions are stored.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

#[async_trait]
impl SessionRepository for MemorySessionRepository {
    async fn upsert_for_device(&self, session: &DeviceSession) -> AppResult<DeviceSession> {
        let mut entry = self.sessions.entry(session.device_id.clone()).or_insert_with(|| session.clone());
        let previous_hash = std::mem::replace(entry.value_mut(), session.clone()).refresh_token_hash;
        if previous_hash != session.refresh_token_hash {
            self.by_hash.remove(&previous_hash);
        }
        self.by_hash
            .insert(session.refresh_token_hash.clone(), session.device_id.clone());
        Ok(entry.value().clone())
    }

    async fn rotate_secret(
        &self,
        user_id: Uuid,
        current_hash: &str,
        new_hash: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Option<DeviceSession>> {
        let device_id = match self.by_hash.get(current_hash) {
            Some(device) => device.value().clone(),
            None => return Ok(None),
        };

        let Some(mut entry) = self.sessions.get_mut(&device_id) else {
            return Ok(None);
        };
        let session = entry.value_mut();
        if session.user_id != user_id
            || session.refresh_token_hash != current_hash
            || !session.is_rotatable(now)
        {
            return Ok(None);
        }

        session.refresh_token_hash = new_hash.to_string();
        session.refresh_count += 1;
        session.updated_at = now;
        session.updated_by = user_id;
        let rotated = session.clone();

        self.by_hash.remove(current_hash);
        self.by_hash.insert(new_hash.to_string(), device_id);
        Ok(Some(rotated))
    }

    async fn find_latest_by_user(&self, user_id: Uuid) -> AppResult<Option<DeviceSession>> {
        Ok(self
            .sessions
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .max_by_key(|entry| entry.updated_at)
            .map(|entry| entry.value().clone()))
    }

    async fn delete_for_device(&self, user_id: Uuid, device_id: &str) -> AppResult<u64> {
        match self
            .sessions
            .remove_if(device_id, |_, session| session.user_id == user_id)
        {
            Some((_, removed)) => {
                self.by_hash.remove(&removed.refresh_token_hash);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
