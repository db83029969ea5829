/// Reading a snapshot from a dump file.
mod dump;
/// The metadata store abstraction.
mod metadata_store;
/// The in-memory metadata snapshot.
mod snapshot;

pub use metadata_store::*;
pub use snapshot::*;
