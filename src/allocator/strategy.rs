use super::memory::MemoryBlock;

use std::cmp::Reverse;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// The macro will create an error type with a Display impl that
// prints the given string.
#[derive(Error, Debug)]
#[error("Unknown placement strategy {0:?}.")]
pub struct ParseStrategyError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementStrategy {
    FirstFit,
    BestFit,
    WorstFit,
    NextFit { cursor: usize },
}

impl PlacementStrategy {
    pub fn next_fit() -> Self {
        Self::NextFit { cursor: 0 }
    }

    // Pick the free block that should satisfy a request of
    // `size` bytes, as an index into `blocks`, or None when no
    // block is large enough. The list is expected in its
    // canonical coalesced order (ascending start offsets), and
    // is never mutated here: selection and carving are separate
    // steps, so the only state a strategy can touch is its own
    // (the next-fit cursor).
    pub fn select(&mut self, blocks: &[MemoryBlock], size: u64) -> Option<usize> {
        match self {
            // Scanning in list order means the first hit is the
            // one with the lowest start offset.
            Self::FirstFit => blocks.iter().position(|block| block.fits(size)),

            // The smallest sufficient block wins. Keying on
            // (size, start) breaks ties between equally small
            // blocks in favor of the lowest start offset.
            Self::BestFit => blocks
                .iter()
                .enumerate()
                .filter(|(_, block)| block.fits(size))
                .min_by_key(|(_, block)| (block.size, block.start))
                .map(|(index, _)| index),

            // The largest sufficient block wins; reversing the
            // start in the key makes equally large blocks tie
            // towards the lowest start offset.
            Self::WorstFit => blocks
                .iter()
                .enumerate()
                .filter(|(_, block)| block.fits(size))
                .max_by_key(|(_, block)| (block.size, Reverse(block.start)))
                .map(|(index, _)| index),

            // First fit, resumed from just after the block that
            // satisfied the previous request, wrapping around
            // the end of the list. The cursor indexes a list
            // that shrinks and shifts as blocks are consumed or
            // merged, so it is reduced modulo the current length
            // before scanning.
            Self::NextFit { cursor } => {
                if blocks.is_empty() {
                    return None;
                }

                let len = blocks.len();
                let origin = *cursor % len;
                for offset in 0..len {
                    let index = (origin + offset) % len;
                    if blocks[index].fits(size) {
                        // The raw successor index is kept even
                        // when it points one past the end; the
                        // modulo above folds it back into
                        // whatever length the list has by the
                        // next request.
                        *cursor = index + 1;
                        return Some(index);
                    }
                }

                None
            }
        }
    }
}

impl fmt::Display for PlacementStrategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::FirstFit => "first-fit",
            Self::BestFit => "best-fit",
            Self::WorstFit => "worst-fit",
            Self::NextFit { .. } => "next-fit",
        };

        write!(f, "{}", name)
    }
}

impl FromStr for PlacementStrategy {
    type Err = ParseStrategyError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "first" | "first-fit" => Ok(Self::FirstFit),
            "best" | "best-fit" => Ok(Self::BestFit),
            "worst" | "worst-fit" => Ok(Self::WorstFit),
            "next" | "next-fit" => Ok(Self::next_fit()),
            _ => Err(ParseStrategyError(name.to_string())),
        }
    }
}
