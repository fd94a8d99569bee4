//! Explicit presence for shared-context fields.
//!
//! Every field a step creates lives in a [`Slot`]. A slot starts absent, is
//! filled once by the step that creates its value, and is emptied again by the
//! release action registered for it. Absence is checked the same way for a
//! handle as for a list of handles.

use std::fmt;

use crate::error::{Result, StagehandError};

/// A context field that is either absent or holds a created value.
#[derive(Clone, PartialEq, Eq)]
pub struct Slot<T> {
    name: &'static str,
    value: Option<T>,
}

impl<T> Slot<T> {
    /// Create an absent slot.
    pub const fn empty(name: &'static str) -> Self {
        Self { name, value: None }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is_present(&self) -> bool {
        self.value.is_some()
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        self.value.as_mut()
    }

    /// Fill an absent slot.
    ///
    /// A slot is filled exactly once per run; filling it again is an error and
    /// leaves the existing value in place.
    pub fn try_fill(&mut self, value: T) -> Result<&mut T> {
        if self.value.is_some() {
            return Err(StagehandError::SlotOccupied {
                slot: self.name.to_string(),
            });
        }
        Ok(self.value.insert(value))
    }

    /// Empty the slot, returning what it held.
    pub fn take(&mut self) -> Option<T> {
        self.value.take()
    }
}

impl<T: Copy> Slot<T> {
    /// Copy the value out, if present.
    pub fn copied(&self) -> Option<T> {
        self.value
    }
}

impl<T: fmt::Debug> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}: {:?}", self.name, value),
            None => write!(f, "{}: <absent>", self.name),
        }
    }
}
