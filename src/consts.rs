// Register layout of the Loongson 2K LIOINTC (Local I/O Interrupt Controller).

/// Number of interrupt sources (input pins).
pub const LIOINTC_NUM_SOURCES: usize = 64;

/// Number of interrupt pins (IP0..IP3) per core.
pub const LIOINTC_NUM_IPS: usize = 4;

/// Number of cores a routing entry can address (bits 0-3 of the entry).
pub const LIOINTC_MAX_CORES: usize = 4;

/// Size of the register window in bytes.
pub const LIOINTC_MMIO_SIZE: usize = 0x80;

// --- Register Offsets (relative to LIOINTC base) ---

/// Routing entry bytes for sources 0..31, one byte per source.
pub const LIOINTC_MAPPER_OFFSET: usize = 0x00;

/// End (exclusive) of the low routing entry bytes.
pub const LIOINTC_MAPPER_END: usize = 0x20;

/// Routing entry bytes for sources 32..63, one byte per source.
pub const LIOINTC_MAPPER_HIGH_OFFSET: usize = 0x40;

/// End (exclusive) of the high routing entry bytes.
pub const LIOINTC_MAPPER_HIGH_END: usize = 0x60;

/// Status (pin & enable) of sources 0..31, read only.
pub const LIOINTC_ISR_OFFSET: usize = 0x20;

/// Enable mask of sources 0..31, read only.
pub const LIOINTC_IEN_OFFSET: usize = 0x24;

/// Write 1 to set enable bits of sources 0..31.
pub const LIOINTC_IEN_SET_OFFSET: usize = 0x28;

/// Write 1 to clear enable bits of sources 0..31.
pub const LIOINTC_IEN_CLR_OFFSET: usize = 0x2c;

/// Status (pin & enable) of sources 32..63, read only.
pub const LIOINTC_ISR_HIGH_OFFSET: usize = 0x60;

/// Enable mask of sources 32..63, read only.
pub const LIOINTC_IEN_HIGH_OFFSET: usize = 0x64;

/// Write 1 to set enable bits of sources 32..63.
pub const LIOINTC_IEN_SET_HIGH_OFFSET: usize = 0x68;

/// Write 1 to clear enable bits of sources 32..63.
pub const LIOINTC_IEN_CLR_HIGH_OFFSET: usize = 0x6c;

/// Index of the output line driving `ip` of `core`.
#[inline]
pub const fn output_index(core: usize, ip: usize) -> usize {
    core * LIOINTC_NUM_IPS + ip
}
