//! In-memory store for tests and throwaway sessions.

use std::cell::RefCell;
use std::collections::HashMap;

use serde_json::Value;

use super::Backend;
use crate::error::StoreError;

#[derive(Debug, Default)]
pub struct MemoryBackend {
    values: RefCell<HashMap<String, Value>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Backend for MemoryBackend {
    fn load(&self, key: &str) -> Result<Option<Value>, StoreError> {
        Ok(self.values.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, value: &Value) -> Result<(), StoreError> {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.clone());
        Ok(())
    }
}
