//! A small, fully consistent volume that tests corrupt one piece at a time.
//!
//! Layout (1 KiB blocks, 128-byte inodes, inode table at block 5):
//!
//! - blocks 0..8 hold metadata, so block 8 is the first data block
//! - inode 2 is the root directory (block 8) holding `.`, `..`, `lost+found` and `hello.txt`
//! - inode 11 is `lost+found` (block 24) holding `.` and `..`
//! - inode 12 is `hello.txt`: direct blocks 9..=20, single indirect block 21 pointing to 22
//!   and 23
//! - blocks 25..64 and inodes 13..=24 are free

use std::fmt::Write;

use crate::dump_format::{
    inode::NUM_BLOCK_POINTERS, BlockKind, BlockNumber, DirectoryEntry, GroupDescriptor,
    IndirectRecord, InodeNumber, InodeRecord, InodeType, Superblock,
};
use crate::storage::SnapshotBuilder;

pub const TOTAL_BLOCKS: BlockNumber = 64;
pub const TOTAL_INODES: InodeNumber = 24;
pub const FIRST_DATA_BLOCK: BlockNumber = 8;
pub const FIRST_FREE_BLOCK: BlockNumber = 25;
pub const FIRST_FREE_INODE: InodeNumber = 13;

pub fn superblock() -> Superblock {
    Superblock::new(TOTAL_BLOCKS, TOTAL_INODES, 1024, 128)
}

pub fn group() -> GroupDescriptor {
    GroupDescriptor {
        inode_count: TOTAL_INODES as u64,
        inode_table_block: 5,
    }
}

/// Block pointers with the given direct blocks and no indirect blocks.
pub fn direct(blocks: &[BlockNumber]) -> [BlockNumber; NUM_BLOCK_POINTERS] {
    let mut pointers = [0; NUM_BLOCK_POINTERS];
    pointers[..blocks.len()].copy_from_slice(blocks);
    pointers
}

pub fn data_record(owner: InodeNumber, logical_offset: u64, block: BlockNumber) -> IndirectRecord {
    IndirectRecord {
        owner,
        kind: BlockKind::Data,
        logical_offset,
        containing_block: None,
        referenced_block: block,
    }
}

pub fn root_inode() -> InodeRecord {
    InodeRecord::new(2, InodeType::Directory, 3).with_block_pointers(direct(&[8]))
}

pub fn lost_found_inode() -> InodeRecord {
    InodeRecord::new(11, InodeType::Directory, 2).with_block_pointers(direct(&[24]))
}

pub fn file_inode() -> InodeRecord {
    let mut pointers = direct(&(9..=20).collect::<Vec<_>>());
    pointers[12] = 21;

    InodeRecord::new(12, InodeType::Regular, 1).with_block_pointers(pointers)
}

pub fn file_indirect_records() -> [IndirectRecord; 2] {
    [data_record(12, 12, 22), data_record(12, 13, 23)]
}

pub fn root_entries() -> [DirectoryEntry; 4] {
    [
        DirectoryEntry::new(2, 2, "'.'"),
        DirectoryEntry::new(2, 2, "'..'"),
        DirectoryEntry::new(2, 11, "'lost+found'"),
        DirectoryEntry::new(2, 12, "'hello.txt'"),
    ]
}

pub fn lost_found_entries() -> [DirectoryEntry; 2] {
    [
        DirectoryEntry::new(11, 11, "'.'"),
        DirectoryEntry::new(11, 2, "'..'"),
    ]
}

/// The volume without any inodes or directory entries.
pub fn empty_volume() -> SnapshotBuilder {
    SnapshotBuilder::new().superblock(superblock()).group(group())
}

/// The consistent volume described at the top of this module.
pub fn clean_filesystem() -> SnapshotBuilder {
    empty_volume()
        .inode(root_inode())
        .inode(lost_found_inode())
        .inode(file_inode())
        .indirect_records(file_indirect_records())
        .directory_entries(root_entries())
        .directory_entries(lost_found_entries())
        .free_blocks(FIRST_FREE_BLOCK..TOTAL_BLOCKS)
        .free_inodes(FIRST_FREE_INODE..=TOTAL_INODES)
}

/// The consistent volume, as the dump tool would print it.
pub fn clean_dump() -> String {
    let mut dump = String::new();
    let time = "10/17/26 12:00:00";

    writeln!(
        dump,
        "SUPERBLOCK,{TOTAL_BLOCKS},{TOTAL_INODES},1024,128,8192,{TOTAL_INODES},11"
    )
    .unwrap();
    writeln!(dump, "GROUP,0,{TOTAL_BLOCKS},{TOTAL_INODES},39,12,3,4,5").unwrap();

    for block in FIRST_FREE_BLOCK..TOTAL_BLOCKS {
        writeln!(dump, "BFREE,{block}").unwrap();
    }

    for inum in FIRST_FREE_INODE..=TOTAL_INODES {
        writeln!(dump, "IFREE,{inum}").unwrap();
    }

    for inode in [root_inode(), lost_found_inode(), file_inode()] {
        let type_ = match inode.type_ {
            InodeType::Directory => "d",
            _ => "f",
        };
        let pointers = inode
            .direct
            .iter()
            .chain([&inode.indirect, &inode.double_indirect, &inode.triple_indirect])
            .map(|block| block.to_string())
            .collect::<Vec<_>>()
            .join(",");

        writeln!(
            dump,
            "INODE,{},{type_},644,0,0,{},{time},{time},{time},1024,2,{pointers}",
            inode.number, inode.link_count
        )
        .unwrap();
    }

    for entry in root_entries().into_iter().chain(lost_found_entries()) {
        writeln!(dump, "DIRENT,{},0,{},12,1,{}", entry.parent, entry.target, entry.name).unwrap();
    }

    for record in file_indirect_records() {
        writeln!(
            dump,
            "INDIRECT,{},1,{},21,{}",
            record.owner, record.logical_offset, record.referenced_block
        )
        .unwrap();
    }

    dump
}
