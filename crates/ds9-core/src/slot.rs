//! Single-assignment, process-lifetime cells.
//!
//! The host has exactly two pieces of process-wide state: the library environment hint
//! and the live interpreter handle. Both are written once during bootstrap and only read
//! afterwards; `ProcessSlot` is the one accessor for each of them.

use std::fmt;
use std::sync::OnceLock;

pub struct ProcessSlot<T> {
    name: &'static str,
    cell: OnceLock<T>,
}

impl<T> ProcessSlot<T> {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            cell: OnceLock::new(),
        }
    }

    /// Store `value` if the slot is still empty. A second assignment hands the rejected
    /// value back and leaves the first one in place.
    pub fn set(&self, value: T) -> Result<&T, T> {
        self.cell.set(value)?;
        match self.cell.get() {
            Some(stored) => Ok(stored),
            None => unreachable!("OnceLock is populated after a successful set"),
        }
    }

    pub fn get(&self) -> Option<&T> {
        self.cell.get()
    }

    pub fn is_set(&self) -> bool {
        self.cell.get().is_some()
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T: fmt::Debug> fmt::Debug for ProcessSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProcessSlot")
            .field("name", &self.name)
            .field("value", &self.cell.get())
            .finish()
    }
}
