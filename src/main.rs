use std::env;

use anyhow::Result;
use log::*;

use memsim::allocator::{Allocator, PlacementStrategy};

const TOTAL_MEMORY: u64 = 1024;

fn main() -> Result<()> {
    std::env::set_var("RUST_LOG", "info");
    pretty_env_logger::init();

    // The placement strategy is picked from the first command
    // line argument ("first", "best", "worst" or "next");
    // first-fit is the default.
    let strategy = match env::args().nth(1) {
        Some(name) => name.parse()?,
        None => PlacementStrategy::FirstFit,
    };

    let mut allocator = Allocator::new(TOTAL_MEMORY, strategy);

    // A small scripted session: three tasks fill the front of
    // the region, freeing the middle one opens a hole, and the
    // last request fits both the hole and the tail, so its
    // placement shows the strategy at work.
    allocator.allocate("editor", 256)?;
    allocator.allocate("compiler", 384)?;
    allocator.allocate("shell", 128)?;
    allocator.free("compiler")?;
    allocator.allocate("linter", 200)?;

    report(&allocator);
    Ok(())
}

fn report(allocator: &Allocator) {
    for block in allocator.free_list_snapshot() {
        info!("free: {} bytes at offset {}", block.size, block.start);
    }

    for task in allocator.tasks_snapshot() {
        match task.start {
            Some(start) => info!(
                "task {:?}: {} bytes at offset {} ({})",
                task.name, task.size, start, task.status
            ),
            None => info!("task {:?}: {} bytes ({})", task.name, task.size, task.status),
        }
    }

    let stats = allocator.stats();
    info!(
        "{} of {} bytes allocated, largest free block {} bytes, fragmentation {:.2}",
        stats.allocated, stats.total, stats.largest_free, stats.fragmentation
    );
}
