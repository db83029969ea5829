use log::debug;

use crate::dump_format::inode::FIRST_UNRESERVED_INODE;
use crate::finding::Finding;
use crate::storage::MetadataStore;

use super::Verifier;

impl<S: MetadataStore> Verifier<S> {
    /// Cross-checks the inode table against the free-inode list.
    ///
    /// Every unreserved inode must be either in use or free. No inode may be both.
    pub fn check_inodes(&self) -> Vec<Finding> {
        let mut findings = vec![];

        for inum in 1..=self.total_inodes() {
            let allocated = self.is_inode_allocated(inum);
            let free = self.store.is_inode_free(inum);

            if inum >= FIRST_UNRESERVED_INODE && !allocated && !free {
                findings.push(Finding::UnallocatedInodeNotOnFreeList { inum });
            }

            if allocated && free {
                findings.push(Finding::AllocatedInodeOnFreeList { inum });
            }
        }

        debug!("inode check produced {} findings", findings.len());
        findings
    }
}
