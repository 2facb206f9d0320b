use alloc::sync::Arc;

use bitmaps::Bitmap;

use crate::aggregate::compute_outputs;
use crate::consts::*;
use crate::notify::{OutputLine, OutputNotifier};
use crate::regs::Register;
use crate::routing::RoutingTable;
use crate::utils::{mask_half, widen_half};

/// Authoritative inputs of the controller, captured for save/restore.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LioIntcSnapshot {
    /// Routing entry byte of every source.
    pub routing: [u8; LIOINTC_NUM_SOURCES],
    /// Enable mask.
    pub enable: u64,
    /// Raw pin levels.
    pub pin_state: u64,
}

/// Mutable state of one LIOINTC.
///
/// Every mutation is followed by [`LioIntcState::update`], which rebuilds the
/// output levels from `(pin_state, enable, routing)` and notifies the lines
/// that flipped.
pub(crate) struct LioIntcState {
    num_cores: usize,
    /// Raw pin levels driven by the sources.
    pin_state: Bitmap<LIOINTC_NUM_SOURCES>,
    /// Enable mask.
    enable: Bitmap<LIOINTC_NUM_SOURCES>,
    /// `pin_state & enable` as of the last update.
    status: Bitmap<LIOINTC_NUM_SOURCES>,
    routing: RoutingTable,
    outputs: OutputNotifier,
}

impl LioIntcState {
    pub fn new(num_cores: usize) -> Self {
        Self {
            num_cores,
            pin_state: Bitmap::new(),
            enable: Bitmap::new(),
            status: Bitmap::new(),
            routing: RoutingTable::new(),
            outputs: OutputNotifier::new(num_cores * LIOINTC_NUM_IPS),
        }
    }

    /// Recomputes status and output levels, returning how many lines flipped.
    pub fn update(&mut self) -> usize {
        // level triggered
        self.status = Bitmap::from_value(self.pin_state.into_value() & self.enable.into_value());
        let fresh = compute_outputs(&self.status, &self.routing, self.num_cores);
        self.outputs.latch(&fresh)
    }

    pub fn set_pin_level(&mut self, source: usize, level: bool) -> usize {
        self.pin_state.set(source, level);
        self.update()
    }

    pub fn read(&self, reg: Register) -> u32 {
        match reg {
            Register::Mapper(source) => self.routing.entry(source) as u32,
            Register::Isr(half) => mask_half(self.status.into_value(), half.is_high()),
            Register::Ien(half) => mask_half(self.enable.into_value(), half.is_high()),
            Register::IenSet(_) | Register::IenClr(_) => 0,
        }
    }

    /// Applies a register write. Returns `false` if the register is read only.
    pub fn write(&mut self, reg: Register, val: u32) -> bool {
        match reg {
            Register::Mapper(source) => {
                debug!("vLioIntc: source {source} mapper {:#04x}", val as u8);
                self.routing.set_entry(source, val as u8);
            }
            Register::IenSet(half) => {
                let enable = self.enable.into_value() | widen_half(val, half.is_high());
                self.enable = Bitmap::from_value(enable);
            }
            Register::IenClr(half) => {
                let enable = self.enable.into_value() & !widen_half(val, half.is_high());
                self.enable = Bitmap::from_value(enable);
            }
            Register::Isr(_) | Register::Ien(_) => return false,
        }
        true
    }

    pub fn output_level(&self, core: usize, ip: usize) -> Option<bool> {
        if core >= self.num_cores || ip >= LIOINTC_NUM_IPS {
            return None;
        }
        self.outputs.level(output_index(core, ip))
    }

    pub fn connect(
        &mut self,
        core: usize,
        ip: usize,
        line: Arc<dyn OutputLine>,
    ) -> Option<Arc<dyn OutputLine>> {
        self.outputs.connect(output_index(core, ip), line)
    }

    pub fn disconnect(&mut self, core: usize, ip: usize) -> Option<Arc<dyn OutputLine>> {
        self.outputs.disconnect(output_index(core, ip))
    }

    pub fn release(&mut self) {
        self.outputs.release();
    }

    pub fn snapshot(&self) -> LioIntcSnapshot {
        LioIntcSnapshot {
            routing: *self.routing.as_bytes(),
            enable: self.enable.into_value(),
            pin_state: self.pin_state.into_value(),
        }
    }

    pub fn restore(&mut self, snapshot: &LioIntcSnapshot) -> usize {
        self.routing = RoutingTable::from_bytes(snapshot.routing);
        self.enable = Bitmap::from_value(snapshot.enable);
        self.pin_state = Bitmap::from_value(snapshot.pin_state);
        self.update()
    }
}
