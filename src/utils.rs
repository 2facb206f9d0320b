use axaddrspace::device::AccessWidth;

/// Size in bytes of a bus access.
pub(crate) fn access_size(width: AccessWidth) -> usize {
    match width {
        AccessWidth::Byte => 1,
        AccessWidth::Word => 2,
        AccessWidth::Dword => 4,
        AccessWidth::Qword => 8,
    }
}

/// Extracts one 32-bit half of a 64-bit mask.
#[inline]
pub(crate) fn mask_half(mask: u64, high: bool) -> u32 {
    if high {
        (mask >> 32) as u32
    } else {
        mask as u32
    }
}

/// Widens a 32-bit register value into its position inside a 64-bit mask.
#[inline]
pub(crate) fn widen_half(val: u32, high: bool) -> u64 {
    if high {
        (val as u64) << 32
    } else {
        val as u64
    }
}
