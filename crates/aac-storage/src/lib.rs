//! Persistence for autocomplete selection history
//!
//! History is stored as a JSON snapshot of the form
//! `{ "<prefix>": { "<value>": <count> } }` with sorted keys, so saved files
//! diff cleanly. Timestamps are not persisted: loading replays each count as
//! fresh selections stamped with the load time, which means recency ranking
//! starts over after a restart.
//!
//! Loading is best-effort. Entries with a non-object value or a count that is
//! not a non-negative integer are skipped with a warning and listed in the
//! [`HydrationReport`]; the rest of the file still loads.

pub mod error;
pub mod json_store;

pub use error::{IoOperation, StorageError, StorageResult};
pub use json_store::{hydrate, HydrationReport, JsonHistoryStore, SkippedEntry, MAX_REPLAY_PER_ENTRY};
