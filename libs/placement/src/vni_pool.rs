//! VNI allocation pool: a single mutex-guarded set checked with a linear
//! scan for the first free slot in the configured range. The VNI space is
//! small enough that a `HashSet` scan is simpler and just as fast as a
//! concurrent map.

use mano_types::{ErrorKind, ManoError, Result};
use parking_lot::Mutex;
use std::collections::HashSet;

pub struct VniPool {
    range: std::ops::Range<u32>,
    allocated: Mutex<HashSet<u32>>,
}

impl VniPool {
    pub fn new(start: u32, end: u32) -> Self {
        Self { range: start..end, allocated: Mutex::new(HashSet::new()) }
    }

    /// Reserve the next free VNI in the pool's range, atomically.
    pub fn allocate(&self) -> Result<u32> {
        let mut allocated = self.allocated.lock();
        for vni in self.range.clone() {
            if !allocated.contains(&vni) {
                allocated.insert(vni);
                return Ok(vni);
            }
        }
        Err(ManoError::new(ErrorKind::VniExhausted, "no free VNI in configured range"))
    }

    /// Reserve a specific VNI, failing if already taken (used when a slice
    /// is reconstructed from a persisted decision rather than freshly
    /// placed).
    pub fn reserve(&self, vni: u32) -> Result<()> {
        let mut allocated = self.allocated.lock();
        if !allocated.insert(vni) {
            return Err(ManoError::new(ErrorKind::VniConflict, format!("vni {vni} already reserved")));
        }
        Ok(())
    }

    pub fn release(&self, vni: u32) {
        self.allocated.lock().remove(&vni);
    }

    pub fn len(&self) -> usize {
        self.allocated.lock().len()
    }
}
