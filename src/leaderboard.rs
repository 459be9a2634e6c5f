//! Local top-N score list, persisted as a flat JSON array.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use crate::error::Result;
use crate::persist::{read_document, write_document, Storage, LEADERBOARD_KEY};
use crate::rules::Rules;

pub const PLAYER_NAME: &str = "Player";
pub const DEFAULT_CAPACITY: usize = Rules::standard().leaderboard_size;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: String,
    pub name: String,
    pub score: u32,
    /// ISO-8601 UTC timestamp.
    pub date: String,
}

impl LeaderboardEntry {
    /// Entry for a finished session; the id is the millisecond timestamp.
    pub fn new(score: u32, now: DateTime<Utc>) -> Self {
        Self {
            id: now.timestamp_millis().to_string(),
            name: PLAYER_NAME.to_string(),
            score,
            date: now.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

/// Descending by score; ties keep their existing order. Truncated to `capacity`.
pub fn rank_entries(entries: &mut Vec<LeaderboardEntry>, capacity: usize) {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
    entries.truncate(capacity);
}

/// Stored entries. A missing or unparseable document reads as an empty list;
/// rows that parse but do not fit the entry shape are dropped one by one.
pub fn load_leaderboard<S: Storage + ?Sized>(storage: &S) -> Vec<LeaderboardEntry> {
    let rows: Vec<Value> = read_document(storage, LEADERBOARD_KEY).unwrap_or_default();
    rows.into_iter()
        .enumerate()
        .filter_map(|(i, row)| match serde_json::from_value(row) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!(row = i, error = %e, "dropping malformed leaderboard row");
                None
            }
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recorded {
    pub entry: LeaderboardEntry,
    /// 1-based position, or `None` when the score did not make the cut.
    pub rank: Option<usize>,
}

/// Append a finished session's score, re-rank, truncate and write back.
pub fn record_score<S: Storage + ?Sized>(
    storage: &S,
    score: u32,
    now: DateTime<Utc>,
    capacity: usize,
) -> Result<Recorded> {
    let mut entries = load_leaderboard(storage);
    let entry = LeaderboardEntry::new(score, now);
    entries.push(entry.clone());
    rank_entries(&mut entries, capacity);
    write_document(storage, LEADERBOARD_KEY, &entries)?;

    let rank = entries.iter().position(|e| *e == entry).map(|i| i + 1);
    info!(score, ?rank, "recorded score");
    Ok(Recorded { entry, rank })
}

pub fn clear_leaderboard<S: Storage + ?Sized>(storage: &S) -> Result<()> {
    storage.remove(LEADERBOARD_KEY)
}
