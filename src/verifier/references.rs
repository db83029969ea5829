use crate::dump_format::{
    inode::NUM_DIRECT, BlockKind, BlockNumber, IndirectRecord, InodeRecord,
};

/// A block an inode references, and where in the file it sits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockReference {
    pub block: BlockNumber,
    pub logical_offset: u64,
    pub kind: BlockKind,
}

/// Lists every block `inode` references: its direct blocks, its own indirect pointer blocks,
/// and the pointer slots of its indirect blocks that the dump already flattened into
/// `indirect_records`.
///
/// `addresses_per_block` is the number of block addresses that fit in one block; it decides the
/// logical offsets of the double and triple indirect blocks.
pub fn block_references<'a>(
    inode: &InodeRecord,
    indirect_records: impl IntoIterator<Item = &'a IndirectRecord>,
    addresses_per_block: u64,
) -> Vec<BlockReference> {
    let direct_blocks = inode
        .direct
        .iter()
        .enumerate()
        .filter(|(_, block)| **block != 0)
        .map(|(slot, block)| BlockReference {
            block: *block,
            logical_offset: slot as u64,
            kind: BlockKind::Data,
        });

    let per_block = addresses_per_block;
    let first_indirect_offset = NUM_DIRECT as u64;
    let pointer_blocks = [
        (inode.indirect, BlockKind::Indirect, first_indirect_offset),
        (
            inode.double_indirect,
            BlockKind::DoubleIndirect,
            first_indirect_offset + per_block,
        ),
        (
            inode.triple_indirect,
            BlockKind::TripleIndirect,
            first_indirect_offset + per_block + per_block * per_block,
        ),
    ]
    .into_iter()
    .filter(|(block, _, _)| *block != 0)
    .map(|(block, kind, logical_offset)| BlockReference {
        block,
        logical_offset,
        kind,
    });

    let flattened = indirect_records
        .into_iter()
        .filter(|record| record.owner == inode.number && record.referenced_block != 0)
        .map(|record| BlockReference {
            block: record.referenced_block,
            logical_offset: record.logical_offset,
            kind: record.kind,
        });

    direct_blocks.chain(pointer_blocks).chain(flattened).collect()
}
