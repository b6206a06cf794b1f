mod snapshot;
mod source;

pub use snapshot::{Classification, PersonOpinion, Suggestion, parse_snapshot};
pub use source::{PollResult, SnapshotSource, spawn_poller};
