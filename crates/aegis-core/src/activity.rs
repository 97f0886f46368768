//! Activity log collaborator.
//!
//! The chat core reports one entry per processed message through the
//! [`ActivityLog`] trait. Sinks are append-only; readers such as a log
//! viewer use [`MemoryActivityLog`] to list, filter, and export entries.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AegisError, Result};

/// Append-only sink for activity events.
///
/// Callers treat failures as non-fatal: an `Err` is reported on a
/// diagnostic channel and never surfaced to the user.
pub trait ActivityLog: Send + Sync {
    fn log_activity(&self, category: &str, action: &str, details: &str) -> Result<()>;
}

/// A single recorded activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub category: String,
    pub action: String,
    pub details: String,
}

impl ActivityEntry {
    fn matches(&self, needle_lower: &str) -> bool {
        self.category.to_lowercase().contains(needle_lower)
            || self.action.to_lowercase().contains(needle_lower)
            || self.details.to_lowercase().contains(needle_lower)
    }
}

// =============================================================================
// TracingActivityLog
// =============================================================================

/// Emits each activity as a `tracing` event on the `aegis::activity` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingActivityLog;

impl ActivityLog for TracingActivityLog {
    fn log_activity(&self, category: &str, action: &str, details: &str) -> Result<()> {
        tracing::info!(target: "aegis::activity", category, action, details, "activity");
        Ok(())
    }
}

// =============================================================================
// NullActivityLog
// =============================================================================

/// Discards every activity.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullActivityLog;

impl ActivityLog for NullActivityLog {
    fn log_activity(&self, _category: &str, _action: &str, _details: &str) -> Result<()> {
        Ok(())
    }
}

// =============================================================================
// MemoryActivityLog
// =============================================================================

/// Bounded in-memory activity log with read-back.
///
/// Once `capacity` entries are stored the oldest entry is evicted.
pub struct MemoryActivityLog {
    capacity: usize,
    entries: Mutex<VecDeque<ActivityEntry>>,
}

impl MemoryActivityLog {
    /// Create a log that keeps at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: Mutex::new(VecDeque::new()),
        }
    }

    /// All entries, oldest first.
    pub fn entries(&self) -> Vec<ActivityEntry> {
        self.entries
            .lock()
            .map(|e| e.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Entries whose category equals `category` (case-insensitive).
    pub fn by_category(&self, category: &str) -> Vec<ActivityEntry> {
        self.entries()
            .into_iter()
            .filter(|e| e.category.eq_ignore_ascii_case(category))
            .collect()
    }

    /// Entries where any field contains `needle` (case-insensitive).
    pub fn search(&self, needle: &str) -> Vec<ActivityEntry> {
        let needle_lower = needle.to_lowercase();
        self.entries()
            .into_iter()
            .filter(|e| e.matches(&needle_lower))
            .collect()
    }

    /// Remove every entry.
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.clear();
        }
    }

    /// Serialize all entries as a pretty-printed JSON array.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries())?)
    }
}

impl ActivityLog for MemoryActivityLog {
    fn log_activity(&self, category: &str, action: &str, details: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| AegisError::ActivityLog(format!("activity lock poisoned: {}", e)))?;
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(ActivityEntry {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            category: category.to_string(),
            action: action.to_string(),
            details: details.to_string(),
        });
        Ok(())
    }
}
