//! Consistency findings and the report that collects them.

use std::fmt;

use crate::dump_format::{
    directory_entry::DirectoryEntryName, BlockKind, BlockNumber, InodeNumber,
};

/// One inode's claim on a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockClaim {
    pub block: BlockNumber,
    pub inum: InodeNumber,
    pub logical_offset: u64,
    pub kind: BlockKind,
}

impl fmt::Display for BlockClaim {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{} {} IN INODE {} AT OFFSET {}",
            self.kind, self.block, self.inum, self.logical_offset
        )
    }
}

/// A violation of one of the filesystem's structural invariants.
///
/// The [`fmt::Display`] implementation renders the exact line that is reported for it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Finding {
    /// An inode is neither in use nor on the free list.
    UnallocatedInodeNotOnFreeList { inum: InodeNumber },
    /// An inode is in use and also on the free list.
    AllocatedInodeOnFreeList { inum: InodeNumber },
    /// A block number lies outside the volume.
    InvalidBlock(BlockClaim),
    /// A block number lies in the metadata area.
    ReservedBlock(BlockClaim),
    /// A referenced block is on the free list.
    AllocatedBlockOnFreeList { block: BlockNumber },
    /// A block is claimed more than once. Reported once per claim.
    DuplicateBlock(BlockClaim),
    /// A data block is neither referenced nor free.
    UnreferencedBlock { block: BlockNumber },
    /// A directory entry names an inode number outside the volume.
    InvalidEntryInode {
        directory: InodeNumber,
        name: DirectoryEntryName,
        target: InodeNumber,
    },
    /// A directory entry names an inode that is not in use.
    UnallocatedEntryInode {
        directory: InodeNumber,
        name: DirectoryEntryName,
        target: InodeNumber,
    },
    /// A `.` entry doesn't point to its own directory.
    DotLink {
        directory: InodeNumber,
        target: InodeNumber,
    },
    /// A `..` entry doesn't point to the directory's parent.
    DotDotLink {
        directory: InodeNumber,
        target: InodeNumber,
        parent: InodeNumber,
    },
    /// The number of entries naming an inode differs from its link count.
    LinkCountMismatch {
        inum: InodeNumber,
        links: u32,
        link_count: u32,
    },
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Finding::UnallocatedInodeNotOnFreeList { inum } => {
                write!(f, "UNALLOCATED INODE {inum} NOT ON FREELIST")
            }
            Finding::AllocatedInodeOnFreeList { inum } => {
                write!(f, "ALLOCATED INODE {inum} ON FREELIST")
            }
            Finding::InvalidBlock(claim) => write!(f, "INVALID {claim}"),
            Finding::ReservedBlock(claim) => write!(f, "RESERVED {claim}"),
            Finding::AllocatedBlockOnFreeList { block } => {
                write!(f, "ALLOCATED BLOCK {block} ON FREELIST")
            }
            Finding::DuplicateBlock(claim) => write!(f, "DUPLICATE {claim}"),
            Finding::UnreferencedBlock { block } => write!(f, "UNREFERENCED BLOCK {block}"),
            Finding::InvalidEntryInode {
                directory,
                name,
                target,
            } => write!(
                f,
                "DIRECTORY INODE {directory} NAME {name} INVALID INODE {target}"
            ),
            Finding::UnallocatedEntryInode {
                directory,
                name,
                target,
            } => write!(
                f,
                "DIRECTORY INODE {directory} NAME {name} UNALLOCATED INODE {target}"
            ),
            Finding::DotLink { directory, target } => write!(
                f,
                "DIRECTORY INODE {directory} NAME '.' LINK TO INODE {target} SHOULD BE {directory}"
            ),
            Finding::DotDotLink {
                directory,
                target,
                parent,
            } => write!(
                f,
                "DIRECTORY INODE {directory} NAME '..' LINK TO INODE {target} SHOULD BE {parent}"
            ),
            Finding::LinkCountMismatch {
                inum,
                links,
                link_count,
            } => write!(
                f,
                "INODE {inum} HAS {links} LINKS BUT LINKCOUNT IS {link_count}"
            ),
        }
    }
}

/// Every finding of one verification run, in reporting order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    findings: Vec<Finding>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extend(&mut self, findings: impl IntoIterator<Item = Finding>) {
        self.findings.extend(findings);
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Whether the volume passed every check.
    pub fn is_clean(&self) -> bool {
        self.is_empty()
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for finding in &self.findings {
            writeln!(f, "{finding}")?;
        }

        Ok(())
    }
}
