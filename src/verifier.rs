use bitvec::vec::BitVec;
use log::{debug, info, warn};

use crate::dump_format::{BlockNumber, InodeNumber};
use crate::finding::Report;
use crate::storage::MetadataStore;

/// Block-level checks: range, reservation, free-list conflicts, duplicates, leaks.
mod blocks;
/// Directory entry targets, `.`/`..` links and link counts.
mod directories;
/// Allocation state of the inode table against the free-inode list.
mod inodes;
/// Enumerating the blocks an inode references.
pub mod references;

#[cfg(test)]
mod fixtures;

/// Checks one volume's metadata for consistency.
///
/// All checks are read-only and run to completion; the checker never stops at the first
/// violation.
pub struct Verifier<S: MetadataStore> {
    store: S,
    /// The first block that may hold file data.
    first_data_block: BlockNumber,
    /// Tracks which inode numbers the inode table marks as in use.
    /// Inodes are one-indexed; we add one to simplify indexing.
    allocated_inodes: BitVec,
}

impl<S: MetadataStore> Verifier<S> {
    pub fn new(store: S) -> Self {
        let first_data_block = store.first_data_block();
        info!("first data block is {first_data_block}");

        let total_inodes = store.superblock().total_inodes as usize;
        let mut allocated_inodes = BitVec::new();
        allocated_inodes.resize(total_inodes + 1, false);

        for inode in store.inodes() {
            if !inode.is_allocated() {
                continue;
            }

            let index = inode.number as usize;
            if index == 0 || index >= allocated_inodes.len() {
                warn!("inode table has out-of-range inode {}", inode.number);
                continue;
            }

            allocated_inodes.set(index, true);
        }

        Verifier {
            store,
            first_data_block,
            allocated_inodes,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn first_data_block(&self) -> BlockNumber {
        self.first_data_block
    }

    /// Runs every check, in reporting order: inodes, then blocks, then directories.
    pub fn run(&self) -> Report {
        let mut report = Report::new();

        debug!("checking inode allocation");
        report.extend(self.check_inodes());

        debug!("checking block references");
        report.extend(self.check_blocks());

        debug!("checking directory entries");
        report.extend(self.check_directories());

        info!("{} findings", report.len());
        report
    }

    fn is_inode_allocated(&self, inum: InodeNumber) -> bool {
        inum != 0
            && self
                .allocated_inodes
                .get(inum as usize)
                .is_some_and(|allocated| *allocated)
    }

    fn total_inodes(&self) -> InodeNumber {
        self.store.superblock().total_inodes
    }

    fn total_blocks(&self) -> BlockNumber {
        self.store.superblock().total_blocks
    }
}
