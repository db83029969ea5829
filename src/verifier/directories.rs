use std::collections::HashMap;

use log::debug;

use crate::dump_format::{inode::ROOT_INODE, InodeNumber};
use crate::finding::Finding;
use crate::storage::MetadataStore;

use super::Verifier;

impl<S: MetadataStore> Verifier<S> {
    /// Checks directory entry targets, `.` and `..` links, and link counts.
    pub fn check_directories(&self) -> Vec<Finding> {
        let mut findings = vec![];
        let entries = self.store.directory_entries();

        for entry in entries {
            if entry.target < 1 || entry.target > self.total_inodes() {
                findings.push(Finding::InvalidEntryInode {
                    directory: entry.parent,
                    name: entry.name.clone(),
                    target: entry.target,
                });
            } else if !self.is_inode_allocated(entry.target) {
                findings.push(Finding::UnallocatedEntryInode {
                    directory: entry.parent,
                    name: entry.name.clone(),
                    target: entry.target,
                });
            }
        }

        let parents = self.directory_parents();

        for inode in self.store.inodes().iter().filter(|inode| inode.is_allocated()) {
            let mut links = 0;

            for entry in entries.iter().filter(|entry| entry.target == inode.number) {
                links += 1;

                if entry.name.is_dot() && entry.target != entry.parent {
                    findings.push(Finding::DotLink {
                        directory: entry.parent,
                        target: entry.target,
                    });
                }

                if entry.name.is_dot_dot() {
                    // a directory that no other directory names is the root, which is its own
                    // parent
                    let parent = parents.get(&entry.parent).copied().unwrap_or(ROOT_INODE);

                    if entry.target != parent {
                        findings.push(Finding::DotDotLink {
                            directory: entry.parent,
                            target: entry.target,
                            parent,
                        });
                    }
                }
            }

            if links != inode.link_count {
                findings.push(Finding::LinkCountMismatch {
                    inum: inode.number,
                    links,
                    link_count: inode.link_count,
                });
            }
        }

        debug!("directory check produced {} findings", findings.len());
        findings
    }

    /// Maps each inode to the directory holding the first entry (other than `.` and `..`) that
    /// names it.
    fn directory_parents(&self) -> HashMap<InodeNumber, InodeNumber> {
        let mut parents = HashMap::new();

        for entry in self.store.directory_entries() {
            if entry.name.is_dot() || entry.name.is_dot_dot() {
                continue;
            }

            parents.entry(entry.target).or_insert(entry.parent);
        }

        parents
    }
}
