//! Device configuration

use crate::core::Backing;
use crate::{Error, Result};

/// Kapasitas default, sama dengan device aslinya
pub const DEFAULT_CAPACITY: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceConfig {
    /// Nama device, dipakai di log
    pub name: String,
    pub capacity: usize,
    pub backing: Backing,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: "ringdev0".to_string(),
            capacity: DEFAULT_CAPACITY,
            backing: Backing::Heap,
        }
    }
}

impl DeviceConfig {
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub fn with_backing(mut self, backing: Backing) -> Self {
        self.backing = backing;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(Error::invalid("capacity must be positive"));
        }
        if self.name.is_empty() {
            return Err(Error::invalid("device name must not be empty"));
        }
        Ok(())
    }
}
