/// Perform a const assertion.
macro_rules! const_assert {
    ($($tt:tt)*) => {
        const _: () = assert!($($tt)*);
    }
}

/// Directory entries and entry names.
pub mod directory_entry;
/// Flattened pointer slots of indirect blocks.
pub mod indirect;
/// Inode records.
pub mod inode;
/// The superblock and the group descriptor.
pub mod superblock;

pub use directory_entry::DirectoryEntry;
pub use indirect::{BlockKind, IndirectRecord};
pub use inode::{InodeRecord, InodeType};
pub use superblock::{GroupDescriptor, Superblock};

// block numbers are `int`s in the dump and out-of-range (even negative) values are
// exactly what we're looking for, so we keep them signed.
pub type BlockNumber = i64;

pub type InodeNumber = u32;

/// The size of one block address inside an indirect block.
pub const BLOCK_ADDRESS_SIZE: u64 = 4;
