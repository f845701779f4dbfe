#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryBlock {
    pub start: u64,
    pub size: u64,
}

impl MemoryBlock {
    pub fn new(start: u64, size: u64) -> Self {
        Self { start, size }
    }

    // One past the last byte covered by the block.
    pub fn end(&self) -> u64 {
        self.start + self.size
    }

    pub fn fits(&self, size: u64) -> bool {
        self.size >= size
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreeList {
    blocks: Vec<MemoryBlock>,
}

impl FreeList {
    pub fn new(total: u64) -> Self {
        // Initialize with a single free block that covers the
        // whole memory region.
        let mut blocks = Vec::new();
        if total > 0 {
            blocks.push(MemoryBlock::new(0, total));
        }

        Self { blocks }
    }

    pub fn blocks(&self) -> &[MemoryBlock] {
        &self.blocks
    }

    pub fn insert(&mut self, block: MemoryBlock) {
        self.blocks.push(block);
    }

    // Restore the list to its canonical form: blocks sorted by
    // ascending start offset, with every run of adjacent blocks
    // merged into one. Sorting first means that any two blocks
    // that touch end up next to each other, so a single pass
    // over the sorted list is enough to merge everything.
    pub fn coalesce(&mut self) {
        self.blocks.sort_by_key(|block| block.start);

        let mut merged: Vec<MemoryBlock> = Vec::with_capacity(self.blocks.len());
        for block in self.blocks.drain(..) {
            match merged.last_mut() {
                // The previous block ends exactly where this one
                // starts: grow it instead of keeping both.
                Some(last) if last.end() == block.start => last.size += block.size,
                _ => merged.push(block),
            }
        }

        self.blocks = merged;
    }

    // Consume `size` bytes from the front of the block at
    // `index` and return the offset where they begin. An exact
    // fit removes the block entirely; otherwise the block keeps
    // its tail, with its start advanced and its size reduced by
    // the carved amount.
    pub fn carve(&mut self, index: usize, size: u64) -> u64 {
        let block = &mut self.blocks[index];
        let start = block.start;

        if block.size == size {
            self.blocks.remove(index);
        } else {
            block.start += size;
            block.size -= size;
        }

        start
    }

    pub fn total_free(&self) -> u64 {
        self.blocks.iter().map(|block| block.size).sum()
    }

    pub fn largest_block(&self) -> u64 {
        self.blocks.iter().map(|block| block.size).max().unwrap_or(0)
    }
}

// Observational fragmentation model: the share of free memory
// that is not part of the largest free block. A region with all
// of its free bytes in one block scores 0.
pub fn fragmentation_ratio(total_free: u64, largest_block: u64) -> f64 {
    if total_free == 0 {
        return 0.0;
    }

    let largest = largest_block.min(total_free) as f64;
    1.0 - largest / total_free as f64
}
