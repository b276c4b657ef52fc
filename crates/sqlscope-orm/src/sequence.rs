//! Block allocation of sequence values.
//!
//! A sequence declared with `increment_by(n)` advances by `n` per fetch,
//! so one fetched value `v` reserves `v..v + n`. The allocator hands those
//! out before fetching again.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::metamodel::SequenceGeneratorSpec;

#[derive(Debug, Clone, Copy)]
struct Block {
    next: i64,
    remaining: i64,
}

#[derive(Debug, Default)]
pub(crate) struct SequenceAllocator {
    blocks: Mutex<HashMap<String, Block>>,
}

impl SequenceAllocator {
    /// Returns the next value of `spec`, calling `fetch` when the reserved
    /// block is exhausted. `fetch` runs without holding the lock.
    pub(crate) fn next<E>(
        &self,
        spec: &SequenceGeneratorSpec,
        fetch: impl FnOnce() -> Result<i64, E>,
    ) -> Result<i64, E> {
        if let Some(block) = self
            .blocks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get_mut(&spec.name)
            .filter(|b| b.remaining > 0)
        {
            let value = block.next;
            block.next += 1;
            block.remaining -= 1;
            return Ok(value);
        }

        let first = fetch()?;
        if spec.increment_by > 1 {
            self.blocks
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(
                    spec.name.clone(),
                    Block {
                        next: first.saturating_add(1),
                        remaining: spec.increment_by - 1,
                    },
                );
        }
        Ok(first)
    }
}
