use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, ensure, Context, Result};
use log::{info, warn};

use crate::dump_format::{
    inode::NUM_BLOCK_POINTERS,
    BlockKind, DirectoryEntry, GroupDescriptor, IndirectRecord, InodeRecord, InodeType, Superblock,
};

use super::snapshot::{Snapshot, SnapshotBuilder};

/// The number of fields in an `INODE` row before the block pointers, tag included.
const INODE_FIXED_FIELDS: usize = 12;

impl Snapshot {
    /// Reads a dump file into a snapshot.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("unable to open dump file {}", path.display()))?;

        Snapshot::from_dump(BufReader::new(file))
            .with_context(|| format!("unable to read dump file {}", path.display()))
    }

    /// Parses the comma-separated dump format.
    pub fn from_dump<R: BufRead>(reader: R) -> Result<Self> {
        let mut builder = SnapshotBuilder::new();
        let mut seen_superblock = false;

        for (index, line) in reader.lines().enumerate() {
            let line_number = index + 1;
            let line = line.with_context(|| format!("reading line {line_number}"))?;

            if line.trim().is_empty() {
                continue;
            }

            let row = Row::new(&line);
            parse_row(&row, &mut builder, &mut seen_superblock)
                .with_context(|| format!("malformed row on line {line_number}: {line:?}"))?;
        }

        ensure!(seen_superblock, "dump has no SUPERBLOCK row");
        ensure!(builder.has_group(), "dump has no GROUP row");

        builder.build()
    }
}

fn parse_row(row: &Row, builder: &mut SnapshotBuilder, seen_superblock: &mut bool) -> Result<()> {
    match row.tag() {
        "SUPERBLOCK" => {
            ensure!(!*seen_superblock, "duplicate SUPERBLOCK row");
            *seen_superblock = true;
            builder.set_superblock(parse_superblock(row)?);
        }
        "GROUP" => {
            let group = parse_group(row)?;
            if builder.has_group() {
                warn!("ignoring additional group descriptor: {group:?}");
            } else {
                builder.set_group(group);
            }
        }
        "INODE" => builder.add_inode(parse_inode(row)?),
        "INDIRECT" => builder.add_indirect(parse_indirect(row)?),
        "DIRENT" => builder.add_directory_entry(parse_directory_entry(row)?),
        "IFREE" => {
            row.expect_len(2)?;
            builder.add_free_inode(row.number(1)?);
        }
        "BFREE" => {
            row.expect_len(2)?;
            builder.add_free_block(row.number(1)?);
        }
        tag => warn!("ignoring row with unrecognized tag {tag:?}"),
    }

    Ok(())
}

fn parse_superblock(row: &Row) -> Result<Superblock> {
    ensure!(row.len() >= 5, "expected at least 5 fields, found {}", row.len());

    let mut superblock = Superblock::new(
        row.number(1)?,
        row.number(2)?,
        row.number(3)?,
        row.number(4)?,
    );
    superblock.blocks_per_group = row.optional_number(5)?;
    superblock.inodes_per_group = row.optional_number(6)?;
    superblock.first_unreserved_inode = row.optional_number(7)?;

    info!("parsed {superblock:?}");
    Ok(superblock)
}

fn parse_group(row: &Row) -> Result<GroupDescriptor> {
    row.expect_len(9)?;

    Ok(GroupDescriptor {
        inode_count: row.number(3)?,
        inode_table_block: row.number(8)?,
    })
}

fn parse_inode(row: &Row) -> Result<InodeRecord> {
    let with_blocks = INODE_FIXED_FIELDS + NUM_BLOCK_POINTERS;
    ensure!(
        row.len() == INODE_FIXED_FIELDS || row.len() == with_blocks,
        "expected {INODE_FIXED_FIELDS} or {with_blocks} fields, found {}",
        row.len()
    );

    let inode = InodeRecord::new(
        row.number(1)?,
        InodeType::try_from(row.field(2)?)?,
        row.number(6)?,
    );

    // short symlinks keep their target inline and have no block fields
    if row.len() == INODE_FIXED_FIELDS {
        return Ok(inode);
    }

    let mut pointers = [0; NUM_BLOCK_POINTERS];
    for (slot, pointer) in pointers.iter_mut().enumerate() {
        *pointer = row.number(INODE_FIXED_FIELDS + slot)?;
    }

    Ok(inode.with_block_pointers(pointers))
}

fn parse_indirect(row: &Row) -> Result<IndirectRecord> {
    let (containing_block, referenced_block) = match row.len() {
        5 => (None, row.number(4)?),
        6 => (Some(row.number(4)?), row.number(5)?),
        len => bail!("expected 5 or 6 fields, found {len}"),
    };

    Ok(IndirectRecord {
        owner: row.number(1)?,
        kind: BlockKind::try_from(row.number::<u8>(2)?)?,
        logical_offset: row.number(3)?,
        containing_block,
        referenced_block,
    })
}

fn parse_directory_entry(row: &Row) -> Result<DirectoryEntry> {
    ensure!(row.len() >= 7, "expected at least 7 fields, found {}", row.len());

    // the name is last and may itself contain commas
    let name = row.fields[6..].join(",");

    Ok(DirectoryEntry::new(row.number(1)?, row.number(3)?, name))
}

/// One comma-separated dump row.
struct Row<'a> {
    fields: Vec<&'a str>,
}

impl<'a> Row<'a> {
    fn new(line: &'a str) -> Self {
        Row {
            fields: line.split(',').collect(),
        }
    }

    fn tag(&self) -> &'a str {
        self.fields[0].trim()
    }

    fn len(&self) -> usize {
        self.fields.len()
    }

    fn expect_len(&self, len: usize) -> Result<()> {
        ensure!(
            self.len() == len,
            "expected {len} fields, found {}",
            self.len()
        );
        Ok(())
    }

    fn field(&self, index: usize) -> Result<&'a str> {
        self.fields
            .get(index)
            .map(|field| field.trim())
            .with_context(|| format!("missing field {index}"))
    }

    fn number<T>(&self, index: usize) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let field = self.field(index)?;
        field
            .parse()
            .with_context(|| format!("field {index} is not a valid number: {field:?}"))
    }

    fn optional_number<T>(&self, index: usize) -> Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        if index < self.len() {
            self.number(index).map(Some)
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::dump_format::inode::NUM_DIRECT;
    use crate::storage::MetadataStore;

    use super::*;

    const DUMP: &str = "\
SUPERBLOCK,64,24,1024,128,8192,24,11
GROUP,0,64,24,40,10,3,4,5
BFREE,40
BFREE,41
IFREE,13
INODE,2,d,755,0,0,3,10/15/26 10:00:00,10/15/26 10:00:00,10/15/26 10:00:00,1024,2,8,0,0,0,0,0,0,0,0,0,0,0,0,0,0
INODE,12,f,644,0,0,1,10/15/26 10:00:00,10/15/26 10:00:00,10/15/26 10:00:00,14336,28,9,10,11,12,13,14,15,16,17,18,19,20,21,0,0
INODE,14,s,777,0,0,1,10/15/26 10:00:00,10/15/26 10:00:00,10/15/26 10:00:00,12,0
INDIRECT,12,1,12,21,22
DIRENT,2,0,2,12,1,'.'
DIRENT,2,12,2,12,2,'..'
DIRENT,2,24,12,16,8,'a,b'
";

    #[test]
    fn test_parse_dump() {
        let snapshot = Snapshot::from_dump(DUMP.as_bytes()).unwrap();

        assert_eq!(snapshot.superblock().total_blocks, 64);
        assert_eq!(snapshot.superblock().total_inodes, 24);
        assert_eq!(snapshot.superblock().first_unreserved_inode, Some(11));
        assert_eq!(snapshot.group().inode_count, 24);
        assert_eq!(snapshot.group().inode_table_block, 5);
        assert_eq!(snapshot.first_data_block(), 8);

        assert!(snapshot.is_block_free(40));
        assert!(snapshot.is_inode_free(13));

        let inodes = snapshot.inodes();
        assert_eq!(inodes.len(), 3);
        assert_eq!(inodes[0].type_, InodeType::Directory);
        assert_eq!(inodes[0].link_count, 3);
        assert_eq!(inodes[1].direct[0], 9);
        assert_eq!(inodes[1].indirect, 21);
        assert_eq!(inodes[2].direct, [0; NUM_DIRECT]);

        let indirect = snapshot.indirect_records_of(12);
        assert_eq!(indirect.len(), 1);
        assert_eq!(indirect[0].kind, BlockKind::Data);
        assert_eq!(indirect[0].containing_block, Some(21));
        assert_eq!(indirect[0].referenced_block, 22);

        let entries = snapshot.directory_entries();
        assert!(entries[0].name.is_dot());
        assert!(entries[1].name.is_dot_dot());
        assert_eq!(entries[2].name.to_string(), "'a,b'");
        assert_eq!(entries[2].target, 12);
    }

    #[test]
    fn test_short_indirect_row() {
        let dump = "SUPERBLOCK,64,24,1024,128\nGROUP,0,64,24,40,10,3,4,5\nINDIRECT,12,2,268,30\n";
        let snapshot = Snapshot::from_dump(dump.as_bytes()).unwrap();

        let indirect = snapshot.indirect_records_of(12);
        assert_eq!(indirect[0].kind, BlockKind::Indirect);
        assert_eq!(indirect[0].containing_block, None);
        assert_eq!(indirect[0].referenced_block, 30);
    }

    #[test]
    fn test_unrecognized_rows_and_blank_lines_are_ignored() {
        let dump = "SUPERBLOCK,64,24,1024,128\n\nCOMMENT,whatever\nGROUP,0,64,24,40,10,3,4,5\n";
        assert!(Snapshot::from_dump(dump.as_bytes()).is_ok());
    }

    #[test]
    fn test_missing_superblock() {
        let dump = "GROUP,0,64,24,40,10,3,4,5\n";
        assert!(Snapshot::from_dump(dump.as_bytes()).is_err());
    }

    #[test]
    fn test_missing_group() {
        let dump = "SUPERBLOCK,64,24,1024,128\n";
        assert!(Snapshot::from_dump(dump.as_bytes()).is_err());
    }

    #[test]
    fn test_extra_group_is_ignored() {
        let dump = "\
SUPERBLOCK,64,24,1024,128
GROUP,0,64,24,40,10,3,4,5
GROUP,1,64,24,40,10,3,4,9
";
        let snapshot = Snapshot::from_dump(dump.as_bytes()).unwrap();

        assert_eq!(snapshot.group().inode_table_block, 5);
    }

    #[test]
    fn test_non_numeric_field() {
        let dump = "SUPERBLOCK,64,24,1024,128\nGROUP,0,64,24,40,10,3,4,5\nBFREE,forty\n";
        let err = Snapshot::from_dump(dump.as_bytes()).unwrap_err();

        assert!(format!("{err:#}").contains("line 3"));
    }

    #[test]
    fn test_wrong_inode_field_count() {
        let dump = "SUPERBLOCK,64,24,1024,128\nGROUP,0,64,24,40,10,3,4,5\nINODE,12,f,644,0,0,1\n";
        assert!(Snapshot::from_dump(dump.as_bytes()).is_err());
    }

    #[test]
    fn test_invalid_indirection_level() {
        let dump = "SUPERBLOCK,64,24,1024,128\nGROUP,0,64,24,40,10,3,4,5\nINDIRECT,12,7,12,21,22\n";
        assert!(Snapshot::from_dump(dump.as_bytes()).is_err());
    }

    #[test]
    fn test_duplicate_superblock() {
        let dump = "\
SUPERBLOCK,64,24,1024,128
SUPERBLOCK,64,24,1024,128
GROUP,0,64,24,40,10,3,4,5
";
        assert!(Snapshot::from_dump(dump.as_bytes()).is_err());
    }

    #[test]
    fn test_open_missing_file() {
        assert!(Snapshot::open("/nonexistent/e2check/dump.csv").is_err());
    }
}
