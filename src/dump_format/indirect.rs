use std::fmt;

use anyhow::{bail, Result};

use super::{BlockNumber, InodeNumber};

/// One non-empty pointer slot inside an indirect block, already located by the dump tool.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IndirectRecord {
    /// The inode whose block tree contains the slot.
    pub owner: InodeNumber,
    /// What the referenced block is.
    pub kind: BlockKind,
    /// The logical offset within the file of the referenced block.
    pub logical_offset: u64,
    /// The indirect block holding the slot. The short form of the row omits it.
    pub containing_block: Option<BlockNumber>,
    /// The block number stored in the slot.
    pub referenced_block: BlockNumber,
}

/// What a referenced block is used for, by indirection level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BlockKind {
    /// A data block (level 1).
    Data,
    /// A single indirect block (level 2).
    Indirect,
    /// A double indirect block (level 3).
    DoubleIndirect,
    /// A triple indirect block (level 4).
    TripleIndirect,
}

impl BlockKind {
    pub fn level(self) -> u8 {
        match self {
            BlockKind::Data => 1,
            BlockKind::Indirect => 2,
            BlockKind::DoubleIndirect => 3,
            BlockKind::TripleIndirect => 4,
        }
    }
}

impl TryFrom<u8> for BlockKind {
    type Error = anyhow::Error;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Ok(match level {
            1 => BlockKind::Data,
            2 => BlockKind::Indirect,
            3 => BlockKind::DoubleIndirect,
            4 => BlockKind::TripleIndirect,
            _ => bail!("invalid indirection level: {level}"),
        })
    }
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let label = match self {
            BlockKind::Data => "BLOCK",
            BlockKind::Indirect => "INDIRECT BLOCK",
            BlockKind::DoubleIndirect => "DOUBLE INDIRECT BLOCK",
            BlockKind::TripleIndirect => "TRIPLE INDIRECT BLOCK",
        };

        write!(f, "{label}")
    }
}
