//! Register decode for the LIOINTC window.
//!
//! Routing entries are byte registers; everything else is a 32-bit register
//! that must be accessed with a naturally aligned 4-byte access. Accesses that
//! do not decode are treated as unknown registers by the caller.

use crate::consts::*;

/// Which 32-bit half of a 64-bit mask a register covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Half {
    /// Sources 0..31.
    Low,
    /// Sources 32..63.
    High,
}

impl Half {
    pub fn is_high(self) -> bool {
        self == Half::High
    }
}

/// A decoded LIOINTC register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    /// Routing entry byte of the given source.
    Mapper(usize),
    /// Status (pin & enable), read only.
    Isr(Half),
    /// Enable mask, read only.
    Ien(Half),
    /// Set enable bits, write only.
    IenSet(Half),
    /// Clear enable bits, write only.
    IenClr(Half),
}

impl Register {
    /// Decodes an access of `size` bytes at `offset` into the register window.
    pub fn decode(offset: usize, size: usize) -> Option<Self> {
        if size == 1 {
            return match offset {
                LIOINTC_MAPPER_OFFSET..LIOINTC_MAPPER_END => {
                    Some(Register::Mapper(offset - LIOINTC_MAPPER_OFFSET))
                }
                LIOINTC_MAPPER_HIGH_OFFSET..LIOINTC_MAPPER_HIGH_END => Some(Register::Mapper(
                    offset - LIOINTC_MAPPER_HIGH_OFFSET + LIOINTC_NUM_SOURCES / 2,
                )),
                _ => None,
            };
        }

        // Rest are 4 bytes
        if size != 4 || offset % 4 != 0 {
            return None;
        }

        match offset {
            LIOINTC_ISR_OFFSET => Some(Register::Isr(Half::Low)),
            LIOINTC_IEN_OFFSET => Some(Register::Ien(Half::Low)),
            LIOINTC_IEN_SET_OFFSET => Some(Register::IenSet(Half::Low)),
            LIOINTC_IEN_CLR_OFFSET => Some(Register::IenClr(Half::Low)),
            LIOINTC_ISR_HIGH_OFFSET => Some(Register::Isr(Half::High)),
            LIOINTC_IEN_HIGH_OFFSET => Some(Register::Ien(Half::High)),
            LIOINTC_IEN_SET_HIGH_OFFSET => Some(Register::IenSet(Half::High)),
            LIOINTC_IEN_CLR_HIGH_OFFSET => Some(Register::IenClr(Half::High)),
            _ => None,
        }
    }

    pub fn is_readable(self) -> bool {
        matches!(self, Register::Mapper(_) | Register::Isr(_) | Register::Ien(_))
    }

    pub fn is_writable(self) -> bool {
        matches!(
            self,
            Register::Mapper(_) | Register::IenSet(_) | Register::IenClr(_)
        )
    }
}
