use std::sync::atomic::{AtomicUsize, Ordering};

use crate::writer::WriterError;

/// Accounting scope for the formatting buffers of one write.
///
/// Buffers charge their capacity here before they grow, so the configured
/// limit caps the memory held at any instant, including while the columns of
/// a chunk are formatted concurrently. Each writer owns its own pool, so
/// independent writes never contend.
#[derive(Debug, Default)]
pub struct ScratchPool {
    limit: Option<usize>,
    in_use: AtomicUsize,
    peak: AtomicUsize,
}

impl ScratchPool {
    /// Create a pool with an optional byte limit
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            limit,
            in_use: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
        }
    }

    /// Bytes still available before the limit is hit (`None` = unbounded)
    pub fn remaining(&self) -> Option<usize> {
        self.limit
            .map(|limit| limit.saturating_sub(self.in_use.load(Ordering::Relaxed)))
    }

    /// Account for `bytes` of scratch memory. A charge that would exceed
    /// the limit fails and leaves the pool unchanged.
    pub fn charge(&self, bytes: usize) -> Result<(), WriterError> {
        let mut current = self.in_use.load(Ordering::Relaxed);
        loop {
            let next = current.saturating_add(bytes);
            if let Some(limit) = self.limit {
                if next > limit {
                    return Err(WriterError::AllocationFailure {
                        requested: bytes,
                        limit: Some(limit),
                    });
                }
            }
            match self.in_use.compare_exchange_weak(
                current,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => {
                    self.peak.fetch_max(next, Ordering::Relaxed);
                    return Ok(());
                }
                Err(actual) => current = actual,
            }
        }
    }

    /// Return `bytes` to the pool
    pub fn release(&self, bytes: usize) {
        // Saturate rather than wrap if a caller over-releases
        let _ = self
            .in_use
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                Some(current.saturating_sub(bytes))
            });
    }

    /// Bytes currently charged
    pub fn in_use(&self) -> usize {
        self.in_use.load(Ordering::Relaxed)
    }

    /// High-water mark over the lifetime of the pool
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::Relaxed)
    }

    /// Configured limit
    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}

/// Bytes charged to a [`ScratchPool`] on behalf of one buffer.
///
/// The charge is returned to the pool on drop unless [`keep`](Self::keep)
/// hands it over to the caller.
#[derive(Debug)]
pub(crate) struct ScratchCharge<'p> {
    pool: &'p ScratchPool,
    bytes: usize,
}

impl<'p> ScratchCharge<'p> {
    pub(crate) fn new(pool: &'p ScratchPool) -> Self {
        Self { pool, bytes: 0 }
    }

    pub(crate) fn pool(&self) -> &'p ScratchPool {
        self.pool
    }

    /// Move the charge to exactly `bytes`, charging or releasing the difference
    pub(crate) fn resize(&mut self, bytes: usize) -> Result<(), WriterError> {
        if bytes > self.bytes {
            self.pool.charge(bytes - self.bytes)?;
        } else {
            self.pool.release(self.bytes - bytes);
        }
        self.bytes = bytes;
        Ok(())
    }

    /// Stop tracking the charge; the caller releases it later
    pub(crate) fn keep(mut self) -> usize {
        std::mem::take(&mut self.bytes)
    }
}

impl Drop for ScratchCharge<'_> {
    fn drop(&mut self) {
        self.pool.release(self.bytes);
    }
}
