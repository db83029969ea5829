use std::collections::{HashMap, HashSet};
use std::ops::Range;

use anyhow::{Context, Result};
use log::info;

use crate::dump_format::{
    BlockNumber, DirectoryEntry, GroupDescriptor, IndirectRecord, InodeNumber, InodeRecord,
    Superblock,
};

use super::metadata_store::MetadataStore;

/// An immutable, in-memory copy of one volume's metadata.
#[derive(Debug)]
pub struct Snapshot {
    superblock: Superblock,
    group: GroupDescriptor,
    inodes: Vec<InodeRecord>,
    /// Sorted by owner (stably, so each owner's records stay in dump order).
    indirect_records: Vec<IndirectRecord>,
    indirect_ranges: HashMap<InodeNumber, Range<usize>>,
    directory_entries: Vec<DirectoryEntry>,
    free_inodes: HashSet<InodeNumber>,
    free_blocks: HashSet<BlockNumber>,
}

impl MetadataStore for Snapshot {
    fn superblock(&self) -> &Superblock {
        &self.superblock
    }

    fn group(&self) -> &GroupDescriptor {
        &self.group
    }

    fn inodes(&self) -> &[InodeRecord] {
        &self.inodes
    }

    fn indirect_records(&self) -> &[IndirectRecord] {
        &self.indirect_records
    }

    fn indirect_records_of(&self, owner: InodeNumber) -> Vec<&IndirectRecord> {
        match self.indirect_ranges.get(&owner) {
            Some(range) => self.indirect_records[range.clone()].iter().collect(),
            None => vec![],
        }
    }

    fn directory_entries(&self) -> &[DirectoryEntry] {
        &self.directory_entries
    }

    fn is_inode_free(&self, inum: InodeNumber) -> bool {
        self.free_inodes.contains(&inum)
    }

    fn is_block_free(&self, block_number: BlockNumber) -> bool {
        self.free_blocks.contains(&block_number)
    }
}

/// Collects metadata records and freezes them into a [`Snapshot`].
#[derive(Default)]
pub struct SnapshotBuilder {
    superblock: Option<Superblock>,
    group: Option<GroupDescriptor>,
    inodes: Vec<InodeRecord>,
    indirect_records: Vec<IndirectRecord>,
    directory_entries: Vec<DirectoryEntry>,
    free_inodes: HashSet<InodeNumber>,
    free_blocks: HashSet<BlockNumber>,
}

impl SnapshotBuilder {
    /// Constructs a new [`SnapshotBuilder`] instance.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn superblock(mut self, superblock: Superblock) -> Self {
        self.set_superblock(superblock);
        self
    }

    pub fn group(mut self, group: GroupDescriptor) -> Self {
        self.set_group(group);
        self
    }

    pub fn inode(mut self, inode: InodeRecord) -> Self {
        self.add_inode(inode);
        self
    }

    pub fn indirect(mut self, record: IndirectRecord) -> Self {
        self.add_indirect(record);
        self
    }

    pub fn directory_entry(mut self, entry: DirectoryEntry) -> Self {
        self.add_directory_entry(entry);
        self
    }

    pub fn indirect_records(mut self, records: impl IntoIterator<Item = IndirectRecord>) -> Self {
        self.indirect_records.extend(records);
        self
    }

    pub fn directory_entries(mut self, entries: impl IntoIterator<Item = DirectoryEntry>) -> Self {
        self.directory_entries.extend(entries);
        self
    }

    pub fn free_inodes(mut self, inums: impl IntoIterator<Item = InodeNumber>) -> Self {
        self.free_inodes.extend(inums);
        self
    }

    pub fn free_blocks(mut self, block_numbers: impl IntoIterator<Item = BlockNumber>) -> Self {
        self.free_blocks.extend(block_numbers);
        self
    }

    pub fn set_superblock(&mut self, superblock: Superblock) {
        self.superblock = Some(superblock);
    }

    pub fn set_group(&mut self, group: GroupDescriptor) {
        self.group = Some(group);
    }

    pub fn has_group(&self) -> bool {
        self.group.is_some()
    }

    pub fn add_inode(&mut self, inode: InodeRecord) {
        self.inodes.push(inode);
    }

    pub fn add_indirect(&mut self, record: IndirectRecord) {
        self.indirect_records.push(record);
    }

    pub fn add_directory_entry(&mut self, entry: DirectoryEntry) {
        self.directory_entries.push(entry);
    }

    pub fn add_free_inode(&mut self, inum: InodeNumber) {
        self.free_inodes.insert(inum);
    }

    pub fn add_free_block(&mut self, block_number: BlockNumber) {
        self.free_blocks.insert(block_number);
    }

    /// Validates the volume parameters and freezes the collected records.
    pub fn build(self) -> Result<Snapshot> {
        let superblock = self.superblock.context("missing superblock")?;
        let group = self.group.context("missing group descriptor")?;

        superblock
            .validate()
            .context("superblock has invalid parameters")?;

        let mut indirect_records = self.indirect_records;
        indirect_records.sort_by_key(|record| record.owner);

        let mut indirect_ranges: HashMap<InodeNumber, Range<usize>> = HashMap::new();
        for (index, record) in indirect_records.iter().enumerate() {
            indirect_ranges
                .entry(record.owner)
                .and_modify(|range| range.end = index + 1)
                .or_insert(index..index + 1);
        }

        info!("{} total blocks", superblock.total_blocks);
        info!("{} total inodes", superblock.total_inodes);
        info!(
            "{} inode records, {} indirect records, {} directory entries",
            self.inodes.len(),
            indirect_records.len(),
            self.directory_entries.len()
        );

        Ok(Snapshot {
            superblock,
            group,
            inodes: self.inodes,
            indirect_records,
            indirect_ranges,
            directory_entries: self.directory_entries,
            free_inodes: self.free_inodes,
            free_blocks: self.free_blocks,
        })
    }
}
