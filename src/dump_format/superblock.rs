use anyhow::{ensure, Result};

use super::{BlockNumber, InodeNumber, BLOCK_ADDRESS_SIZE};

/// Volume-wide parameters, as found in the `SUPERBLOCK` row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Superblock {
    /// The number of blocks in the volume.
    pub total_blocks: BlockNumber,
    /// The number of inodes in the volume.
    pub total_inodes: InodeNumber,
    /// The size of a block in bytes.
    pub block_size: u64,
    /// The size of an on-disk inode in bytes.
    pub inode_size: u64,
    /// Blocks per group, when the dump carries it.
    pub blocks_per_group: Option<u64>,
    /// Inodes per group, when the dump carries it.
    pub inodes_per_group: Option<u64>,
    /// The first non-reserved inode, when the dump carries it.
    pub first_unreserved_inode: Option<InodeNumber>,
}

impl Superblock {
    /// Constructs a new [`Superblock`] with the four parameters the checks depend on.
    pub fn new(
        total_blocks: BlockNumber,
        total_inodes: InodeNumber,
        block_size: u64,
        inode_size: u64,
    ) -> Self {
        Superblock {
            total_blocks,
            total_inodes,
            block_size,
            inode_size,
            blocks_per_group: None,
            inodes_per_group: None,
            first_unreserved_inode: None,
        }
    }

    /// Rejects parameters that would make block arithmetic meaningless.
    pub fn validate(&self) -> Result<()> {
        ensure!(self.block_size > 0, "invalid block size: {}", self.block_size);
        ensure!(
            self.block_size % BLOCK_ADDRESS_SIZE == 0,
            "block size {} is not a multiple of the block address size",
            self.block_size
        );
        ensure!(
            self.total_blocks >= 0,
            "invalid number of blocks: {}",
            self.total_blocks
        );

        Ok(())
    }

    /// The number of block addresses that fit in one indirect block.
    pub fn addresses_per_block(&self) -> u64 {
        self.block_size / BLOCK_ADDRESS_SIZE
    }
}

/// The parameters of the (single) block group, as found in the `GROUP` row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GroupDescriptor {
    /// The number of inodes in the group.
    pub inode_count: u64,
    /// The block number at which the inode table starts.
    pub inode_table_block: BlockNumber,
}

impl GroupDescriptor {
    /// The first block that may hold file data. Everything below it is occupied by the
    /// superblock, the group descriptor, the bitmaps and the inode table.
    pub fn first_data_block(&self, superblock: &Superblock) -> BlockNumber {
        let inode_table_bytes = self.inode_count * superblock.inode_size;
        let inode_table_blocks = inode_table_bytes.div_ceil(superblock.block_size);

        self.inode_table_block + inode_table_blocks as BlockNumber
    }
}
