use crate::consts::{LIOINTC_MAX_CORES, LIOINTC_NUM_IPS, LIOINTC_NUM_SOURCES};

/// Per-source routing entries.
///
/// Each entry byte selects a core in bits 0-3 and an interrupt pin in bits
/// 4-7, one-hot. When more than one bit of a nibble is set the lowest one
/// wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingTable {
    entries: [u8; LIOINTC_NUM_SOURCES],
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RoutingTable {
    /// Creates a table with every source unrouted.
    pub const fn new() -> Self {
        Self {
            entries: [0; LIOINTC_NUM_SOURCES],
        }
    }

    pub fn from_bytes(entries: [u8; LIOINTC_NUM_SOURCES]) -> Self {
        Self { entries }
    }

    pub fn as_bytes(&self) -> &[u8; LIOINTC_NUM_SOURCES] {
        &self.entries
    }

    /// Raw entry byte of `source`.
    pub fn entry(&self, source: usize) -> u8 {
        self.entries[source]
    }

    pub fn set_entry(&mut self, source: usize, val: u8) {
        self.entries[source] = val;
    }

    /// Resolves `source` to its `(core, ip)` destination.
    ///
    /// Returns `None` unless both a core and an interrupt pin are selected.
    pub fn resolve(&self, source: usize) -> Option<(usize, usize)> {
        decode_entry(self.entries[source])
    }
}

/// Decodes a routing entry byte into `(core, ip)`.
pub fn decode_entry(entry: u8) -> Option<(usize, usize)> {
    let core = first_set(entry & 0x0f, LIOINTC_MAX_CORES)?;
    let ip = first_set(entry >> 4, LIOINTC_NUM_IPS)?;
    Some((core, ip))
}

fn first_set(nibble: u8, width: usize) -> Option<usize> {
    (0..width).find(|bit| nibble & (1 << bit) != 0)
}
