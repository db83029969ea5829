pub mod dump_format;
pub mod finding;
pub mod storage;
pub mod verifier;

pub use finding::{Finding, Report};
pub use storage::{MetadataStore, Snapshot, SnapshotBuilder};
pub use verifier::Verifier;
