use super::{
    memory::{fragmentation_ratio, FreeList, MemoryBlock},
    strategy::PlacementStrategy,
    task::{Task, TaskStatus},
};

use std::collections::HashMap;
use thiserror::Error;
use log::*;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocError {
    #[error("No free block can hold {requested} bytes.")]
    InsufficientMemory { requested: u64 },
    #[error("Task {0:?} is not currently allocated.")]
    TaskNotFound(String),
    #[error("Task {0:?} is already allocated.")]
    DuplicateTask(String),
    #[error("Allocation size must be positive.")]
    ZeroSized,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MemoryStats {
    pub total: u64,
    pub allocated: u64,
    pub free: u64,
    pub largest_free: u64,
    pub fragmentation: f64,
}

pub struct Allocator {
    total_memory: u64,
    strategy: PlacementStrategy,
    free_list: FreeList,
    // Names of the currently allocated tasks, mapped to the
    // position of their record in the history. The history
    // itself is append-only and keeps every task ever placed,
    // in creation order, for the host's task table.
    allocated: HashMap<String, usize>,
    history: Vec<Task>,
    allocated_bytes: u64,
}

impl Allocator {
    pub fn new(total_memory: u64, strategy: PlacementStrategy) -> Self {
        info!("Created a {} allocator over {} bytes.", strategy, total_memory);

        Self {
            total_memory,
            strategy,
            free_list: FreeList::new(total_memory),
            allocated: HashMap::new(),
            history: Vec::new(),
            allocated_bytes: 0,
        }
    }

    pub fn allocate(&mut self, name: &str, size: u64) -> Result<u64, AllocError> {
        if size == 0 {
            warn!("Rejected task {:?}: zero-sized request.", name);
            return Err(AllocError::ZeroSized);
        }

        // One live record per name: freeing a task releases its
        // name for a fresh, independent record later, but two
        // live tasks sharing a name would leave a later free
        // with an ambiguous target.
        if self.allocated.contains_key(name) {
            warn!("Rejected task {:?}: name is already allocated.", name);
            return Err(AllocError::DuplicateTask(name.to_string()));
        }

        // The strategy only picks a candidate; carving the bytes
        // out of the block happens here, so selection stays a
        // pure read of the list. Failing to find a block changes
        // nothing: no task record is created for a request that
        // was never placed.
        let index = match self.strategy.select(self.free_list.blocks(), size) {
            Some(index) => index,
            None => {
                warn!("Rejected task {:?}: no free block can hold {} bytes.", name, size);
                return Err(AllocError::InsufficientMemory { requested: size });
            }
        };

        let start = self.free_list.carve(index, size);

        // Carving cannot make two remaining free blocks
        // adjacent, but re-coalescing keeps every mutating
        // operation with the same postcondition.
        self.free_list.coalesce();

        let mut task = Task::new(name, size);
        task.start = Some(start);
        task.status = TaskStatus::Allocated;

        self.allocated.insert(name.to_string(), self.history.len());
        self.history.push(task);
        self.allocated_bytes += size;

        info!("Placed task {:?}: {} bytes at offset {}.", name, size, start);
        Ok(start)
    }

    pub fn free(&mut self, name: &str) -> Result<(), AllocError> {
        let index = match self.allocated.remove(name) {
            Some(index) => index,
            None => {
                warn!("Cannot free task {:?}: not currently allocated.", name);
                return Err(AllocError::TaskNotFound(name.to_string()));
            }
        };

        // The record keeps its last placement for the task
        // table; only its status changes. Records reachable from
        // the allocated set always carry a placement.
        let task = &mut self.history[index];
        task.status = TaskStatus::Freed;
        let block = MemoryBlock::new(task.start.unwrap(), task.size);

        self.free_list.insert(block);
        self.free_list.coalesce();
        self.allocated_bytes -= block.size;

        info!("Freed task {:?}: {} bytes at offset {}.", name, block.size, block.start);
        Ok(())
    }

    // Snapshots are owned copies: the host can hold on to them,
    // render them, or diff them without observing (or causing)
    // any engine mutation.
    pub fn free_list_snapshot(&self) -> Vec<MemoryBlock> {
        self.free_list.blocks().to_vec()
    }

    pub fn tasks_snapshot(&self) -> Vec<Task> {
        self.history.clone()
    }

    pub fn total_memory(&self) -> u64 {
        self.total_memory
    }

    pub fn stats(&self) -> MemoryStats {
        let free = self.free_list.total_free();
        let largest_free = self.free_list.largest_block();

        MemoryStats {
            total: self.total_memory,
            allocated: self.allocated_bytes,
            free,
            largest_free,
            fragmentation: fragmentation_ratio(free, largest_free),
        }
    }
}
