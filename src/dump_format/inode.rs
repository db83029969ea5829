use anyhow::{bail, Result};

use super::{BlockNumber, InodeNumber};

pub const NUM_DIRECT: usize = 12;

/// Direct slots followed by the single, double and triple indirect pointers.
pub const NUM_BLOCK_POINTERS: usize = NUM_DIRECT + 3;
const_assert!(NUM_BLOCK_POINTERS == 15);

/// The root directory's inode number.
pub const ROOT_INODE: InodeNumber = 2;

/// Inodes below this number are reserved by the filesystem and may legitimately be
/// neither allocated nor on the free list.
pub const FIRST_UNRESERVED_INODE: InodeNumber = 11;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InodeRecord {
    /// inode number (1-based)
    pub number: InodeNumber,
    /// file type (or [`InodeType::Free`])
    pub type_: InodeType,
    /// number of hard links to inode
    pub link_count: u32,
    /// block #s for 1st NUM_DIRECT blocks
    pub direct: [BlockNumber; NUM_DIRECT],
    /// block number of the single indirect block
    pub indirect: BlockNumber,
    /// block number of the double indirect block
    pub double_indirect: BlockNumber,
    /// block number of the triple indirect block
    pub triple_indirect: BlockNumber,
}

impl InodeRecord {
    /// Constructs an inode record without any block pointers.
    pub fn new(number: InodeNumber, type_: InodeType, link_count: u32) -> Self {
        InodeRecord {
            number,
            type_,
            link_count,
            direct: [0; NUM_DIRECT],
            indirect: 0,
            double_indirect: 0,
            triple_indirect: 0,
        }
    }

    /// Sets all block pointers from the 15 block fields of an `INODE` row.
    pub fn with_block_pointers(mut self, pointers: [BlockNumber; NUM_BLOCK_POINTERS]) -> Self {
        self.direct.copy_from_slice(&pointers[..NUM_DIRECT]);
        self.indirect = pointers[NUM_DIRECT];
        self.double_indirect = pointers[NUM_DIRECT + 1];
        self.triple_indirect = pointers[NUM_DIRECT + 2];
        self
    }

    pub fn is_allocated(&self) -> bool {
        self.type_ != InodeType::Free
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum InodeType {
    /// This inode is not in use for any file.
    Free,
    /// This inode describes a directory.
    Directory,
    /// This inode describes a regular data file.
    Regular,
    /// This inode describes a symbolic link.
    Symlink,
    /// This inode is in use, but for something other than the above.
    Other,
}

impl TryFrom<&str> for InodeType {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Ok(match value {
            "0" => InodeType::Free,
            "d" => InodeType::Directory,
            "f" => InodeType::Regular,
            "s" => InodeType::Symlink,
            "?" => InodeType::Other,
            _ => bail!("unknown file type: {value:?}"),
        })
    }
}
