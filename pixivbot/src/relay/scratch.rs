// ABOUTME: Fixed-capacity write sink used as the destination of every encode attempt
// ABOUTME: Overflowing writes fail atomically with a distinct CapacityExceeded error

use std::fmt;
use std::io::{self, Write};

/// Signal raised when a write would push the cursor past capacity.
///
/// It travels inside an [`io::Error`] so codecs propagate it untouched; use
/// [`is_capacity_exceeded`] to recognise it on the other side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CapacityExceeded {
    pub capacity: usize,
    pub attempted: usize,
}

impl fmt::Display for CapacityExceeded {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "scratch buffer capacity of {} bytes exceeded (needed {})",
            self.capacity, self.attempted
        )
    }
}

impl std::error::Error for CapacityExceeded {}

impl From<CapacityExceeded> for io::Error {
    fn from(err: CapacityExceeded) -> Self {
        io::Error::other(err)
    }
}

/// Whether an I/O error is a [`CapacityExceeded`] raised by a [`ScratchBuffer`].
pub fn is_capacity_exceeded(err: &io::Error) -> bool {
    err.get_ref()
        .is_some_and(|inner| inner.is::<CapacityExceeded>())
}

pub struct ScratchBuffer {
    data: Box<[u8]>,
    cursor: usize,
}

impl ScratchBuffer {
    /// Allocate the whole region up front; it is never grown afterwards.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: vec![0; capacity].into_boxed_slice(),
            cursor: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    pub fn len(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.cursor == 0
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.cursor
    }

    /// Bytes written since the last reset.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data[..self.cursor]
    }

    /// Discard everything written so far, keeping the allocation.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}

impl Write for ScratchBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.len() > self.remaining() {
            return Err(CapacityExceeded {
                capacity: self.capacity(),
                attempted: self.cursor + buf.len(),
            }
            .into());
        }
        let end = self.cursor + buf.len();
        self.data[self.cursor..end].copy_from_slice(buf);
        self.cursor = end;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
