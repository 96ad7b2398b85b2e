use std::sync::Mutex;

use super::ReadMarkerStore;
use crate::error::Result;

/// Process-local read marker slot
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<i64>>,
}

impl MemoryStore {
    pub fn with_value(millis: i64) -> Self {
        Self {
            slot: Mutex::new(Some(millis)),
        }
    }
}

impl ReadMarkerStore for MemoryStore {
    fn load(&self) -> Result<Option<i64>> {
        Ok(*self.slot.lock().unwrap_or_else(|e| e.into_inner()))
    }

    fn save(&self, millis: i64) -> Result<()> {
        *self.slot.lock().unwrap_or_else(|e| e.into_inner()) = Some(millis);
        Ok(())
    }
}
