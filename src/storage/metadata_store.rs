use crate::dump_format::{
    BlockNumber, DirectoryEntry, GroupDescriptor, IndirectRecord, InodeNumber, InodeRecord,
    Superblock,
};

/// Read-only access to one volume's parsed metadata.
pub trait MetadataStore {
    fn superblock(&self) -> &Superblock;

    fn group(&self) -> &GroupDescriptor;

    /// The inode table, in dump order.
    fn inodes(&self) -> &[InodeRecord];

    /// Every flattened indirect-block slot.
    fn indirect_records(&self) -> &[IndirectRecord];

    /// The flattened indirect-block slots that belong to `owner`.
    fn indirect_records_of(&self, owner: InodeNumber) -> Vec<&IndirectRecord> {
        self.indirect_records()
            .iter()
            .filter(|record| record.owner == owner)
            .collect()
    }

    /// Every directory entry, in dump order.
    fn directory_entries(&self) -> &[DirectoryEntry];

    fn is_inode_free(&self, inum: InodeNumber) -> bool;

    fn is_block_free(&self, block_number: BlockNumber) -> bool;

    /// The first block that may hold file data.
    fn first_data_block(&self) -> BlockNumber {
        self.group().first_data_block(self.superblock())
    }
}
