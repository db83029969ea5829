use std::collections::HashMap;

use bitvec::vec::BitVec;
use log::debug;

use crate::dump_format::BlockNumber;
use crate::finding::{BlockClaim, Finding};
use crate::storage::MetadataStore;

use super::references::block_references;
use super::Verifier;

/// Every claim on every block, grouped by block number in order of first observation.
#[derive(Default)]
struct ClaimIndex {
    claims: HashMap<BlockNumber, Vec<BlockClaim>>,
    discovery_order: Vec<BlockNumber>,
}

impl ClaimIndex {
    fn insert(&mut self, claim: BlockClaim) {
        let claims = self.claims.entry(claim.block).or_insert_with(|| {
            self.discovery_order.push(claim.block);
            vec![]
        });

        claims.push(claim);
    }

    fn iter(&self) -> impl Iterator<Item = &[BlockClaim]> {
        self.discovery_order
            .iter()
            .map(|block| self.claims[block].as_slice())
    }
}

impl<S: MetadataStore> Verifier<S> {
    /// Checks every block reference of every inode, then looks for blocks claimed more than
    /// once and for data blocks that are neither claimed nor free.
    pub fn check_blocks(&self) -> Vec<Finding> {
        let mut findings = vec![];

        let index = self.classify_block_references(&mut findings);
        debug!("{} distinct blocks are referenced", index.discovery_order.len());

        for claims in index.iter().filter(|claims| claims.len() > 1) {
            findings.extend(claims.iter().copied().map(Finding::DuplicateBlock));
        }

        findings.extend(self.find_unreferenced_blocks(&index));

        debug!("block check produced {} findings", findings.len());
        findings
    }

    /// Enumerates each inode's references, reporting invalid, reserved and free blocks as
    /// they're seen.
    fn classify_block_references(&self, findings: &mut Vec<Finding>) -> ClaimIndex {
        let total_blocks = self.total_blocks();
        let addresses_per_block = self.store.superblock().addresses_per_block();
        let mut index = ClaimIndex::default();

        for inode in self.store.inodes() {
            let indirect_records = self.store.indirect_records_of(inode.number);

            for reference in block_references(inode, indirect_records, addresses_per_block) {
                let claim = BlockClaim {
                    block: reference.block,
                    inum: inode.number,
                    logical_offset: reference.logical_offset,
                    kind: reference.kind,
                };

                if claim.block < 0 || claim.block > total_blocks {
                    findings.push(Finding::InvalidBlock(claim));
                }

                if (0..self.first_data_block).contains(&claim.block) {
                    findings.push(Finding::ReservedBlock(claim));
                }

                if self.store.is_block_free(claim.block) {
                    findings.push(Finding::AllocatedBlockOnFreeList { block: claim.block });
                }

                index.insert(claim);
            }
        }

        index
    }

    fn find_unreferenced_blocks(&self, index: &ClaimIndex) -> Vec<Finding> {
        let total_blocks = self.total_blocks().max(0);
        let first_data_block = self.first_data_block.clamp(0, total_blocks);

        // a value of `true` represents "referenced"
        let mut referenced: BitVec = BitVec::repeat(false, total_blocks as usize);
        for block in index.discovery_order.iter().copied() {
            if (0..total_blocks).contains(&block) {
                referenced.set(block as usize, true);
            }
        }

        (first_data_block..total_blocks)
            .filter(|block| !referenced[*block as usize] && !self.store.is_block_free(*block))
            .map(|block| Finding::UnreferencedBlock { block })
            .collect()
    }
}
