//! Per-user advice history
//!
//! A bounded ring buffer per user, owned by the application state. When the
//! user limit is reached the least recently updated user is dropped.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};
use serde::Serialize;
use shared::{GpsCoordinates, ProbabilityTier, SoilReading, SuitabilityTier};
use uuid::Uuid;

pub const DEFAULT_USER_ID: &str = "default_user";

/// Summary of one advice response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdviceRecord {
    pub id: Uuid,
    pub user_id: String,
    pub created_at: DateTime<Utc>,
    pub region: String,
    pub coordinates: GpsCoordinates,
    pub crop: String,
    pub soil: SoilReading,
    pub score: f64,
    pub suitability: SuitabilityTier,
    pub probability: ProbabilityTier,
    pub source: String,
}

#[derive(Debug)]
struct UserHistory {
    records: VecDeque<AdviceRecord>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug)]
pub struct AdviceHistory {
    per_user_capacity: usize,
    max_users: usize,
    users: HashMap<String, UserHistory>,
}

impl AdviceHistory {
    pub fn new(per_user_capacity: usize, max_users: usize) -> Self {
        Self {
            per_user_capacity: per_user_capacity.max(1),
            max_users: max_users.max(1),
            users: HashMap::new(),
        }
    }

    /// Append a record, dropping the user's oldest entry when full
    pub fn record(&mut self, record: AdviceRecord) {
        if !self.users.contains_key(&record.user_id) && self.users.len() >= self.max_users {
            self.evict_stalest_user();
        }

        let updated_at = record.created_at;
        let capacity = self.per_user_capacity;
        let entry = self
            .users
            .entry(record.user_id.clone())
            .or_insert_with(|| UserHistory {
                records: VecDeque::with_capacity(capacity),
                updated_at,
            });

        if entry.records.len() >= capacity {
            entry.records.pop_front();
        }
        entry.records.push_back(record);
        entry.updated_at = updated_at;
    }

    /// Records for a user, newest first
    pub fn for_user(&self, user_id: &str) -> Vec<AdviceRecord> {
        self.users
            .get(user_id)
            .map(|h| h.records.iter().rev().cloned().collect())
            .unwrap_or_default()
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    fn evict_stalest_user(&mut self) {
        let stalest = self
            .users
            .iter()
            .min_by_key(|(_, h)| h.updated_at)
            .map(|(id, _)| id.clone());

        if let Some(user_id) = stalest {
            tracing::debug!("Evicting advice history for user {}", user_id);
            self.users.remove(&user_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn record(user_id: &str, crop: &str, offset_secs: i64) -> AdviceRecord {
        AdviceRecord {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            created_at: Utc::now() + Duration::seconds(offset_secs),
            region: "Kakamega".to_string(),
            coordinates: GpsCoordinates::new(0.28, 34.75),
            crop: crop.to_string(),
            soil: SoilReading::new(6.0, 10.0, 15.0, 20.0),
            score: 0.45,
            suitability: SuitabilityTier::Poor,
            probability: ProbabilityTier::Low,
            source: "provided".to_string(),
        }
    }

    #[test]
    fn test_newest_first() {
        let mut history = AdviceHistory::new(20, 10);
        history.record(record("amina", "maize", 0));
        history.record(record("amina", "beans", 1));

        let records = history.for_user("amina");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].crop, "beans");
        assert_eq!(records[1].crop, "maize");
    }

    #[test]
    fn test_ring_buffer_drops_oldest() {
        let mut history = AdviceHistory::new(3, 10);
        for (i, crop) in ["maize", "beans", "peas", "potatoes"].iter().enumerate() {
            history.record(record("amina", crop, i as i64));
        }

        let crops: Vec<String> = history.for_user("amina").into_iter().map(|r| r.crop).collect();
        assert_eq!(crops, vec!["potatoes", "peas", "beans"]);
    }

    #[test]
    fn test_least_recently_updated_user_evicted() {
        let mut history = AdviceHistory::new(5, 2);
        history.record(record("first", "maize", 0));
        history.record(record("second", "maize", 1));
        history.record(record("first", "beans", 2));
        history.record(record("third", "peas", 3));

        assert_eq!(history.user_count(), 2);
        assert!(history.for_user("second").is_empty());
        assert_eq!(history.for_user("first").len(), 2);
        assert_eq!(history.for_user("third").len(), 1);
    }

    #[test]
    fn test_unknown_user_is_empty() {
        let history = AdviceHistory::new(20, 1000);
        assert!(history.for_user("nobody").is_empty());
    }
}
