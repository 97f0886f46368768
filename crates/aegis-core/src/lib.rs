//! Shared configuration, error type, and activity-log collaborator for Aegis.

pub mod activity;
pub mod config;
pub mod error;

pub use activity::{
    ActivityEntry, ActivityLog, MemoryActivityLog, NullActivityLog, TracingActivityLog,
};
pub use config::AegisConfig;
pub use error::{AegisError, Result};
