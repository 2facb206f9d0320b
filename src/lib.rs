#![cfg_attr(not(test), no_std)]

extern crate alloc;
#[macro_use]
extern crate log;

mod aggregate;
mod consts;
mod notify;
mod regs;
mod routing;
mod state;
mod utils;

pub use aggregate::compute_outputs;
pub use consts::*;
pub use notify::OutputLine;
pub use regs::{Half, Register};
pub use routing::{decode_entry, RoutingTable};
pub use state::LioIntcSnapshot;

use alloc::sync::Arc;

use axaddrspace::{device::AccessWidth, GuestPhysAddr, GuestPhysAddrRange};
use axdevice_base::{BaseDeviceOps, EmuDeviceType};
use axerrno::{ax_err, AxResult};
use spin::Mutex;
use state::LioIntcState;
use utils::access_size;

/// Emulated Loongson 2K Local I/O interrupt controller.
///
/// Routes 64 level-triggered sources to `num_cores * 4` output lines. Every
/// stimulus (pin change or register write) is handled under one lock: the
/// state is mutated, all output levels are recomputed from scratch and the
/// lines that flipped are notified before the lock is dropped. Consumers must
/// not call back into the same controller from [`OutputLine::on_output_change`].
pub struct VLioIntc {
    /// The address of the VLioIntc in the guest physical address space.
    pub addr: GuestPhysAddr,
    /// The size of the VLioIntc in bytes.
    pub size: usize,
    /// Num of cores, each with IP0..IP3 outputs.
    pub num_cores: usize,
    state: Mutex<LioIntcState>,
}

impl VLioIntc {
    pub fn new(addr: GuestPhysAddr, size: Option<usize>, num_cores: usize) -> AxResult<Self> {
        if num_cores == 0 {
            return ax_err!(InvalidInput, "vLioIntc: num_cores must be at least 1");
        }
        let size = size.unwrap_or(LIOINTC_MMIO_SIZE);
        if size < LIOINTC_MMIO_SIZE {
            warn!("vLioIntc: region size {size:#x} smaller than {LIOINTC_MMIO_SIZE:#x}");
            return ax_err!(InvalidInput, "vLioIntc: region too small");
        }
        if num_cores > LIOINTC_MAX_CORES {
            warn!("vLioIntc: cores beyond {LIOINTC_MAX_CORES} cannot be routed to");
        }

        Ok(Self {
            addr,
            size,
            num_cores,
            state: Mutex::new(LioIntcState::new(num_cores)),
        })
    }

    fn check_line(&self, core: usize, ip: usize) -> AxResult {
        if core >= self.num_cores || ip >= LIOINTC_NUM_IPS {
            return ax_err!(InvalidInput, "vLioIntc: no such output line");
        }
        Ok(())
    }

    /// Connects the consumer of output `ip` of `core`, replacing any previous one.
    ///
    /// No notification is sent for the current level.
    pub fn connect_output(&self, core: usize, ip: usize, line: Arc<dyn OutputLine>) -> AxResult {
        self.check_line(core, ip)?;
        if self.state.lock().connect(core, ip, line).is_some() {
            debug!("vLioIntc: replaced consumer of core {core} IP{ip}");
        }
        Ok(())
    }

    pub fn disconnect_output(&self, core: usize, ip: usize) -> AxResult {
        self.check_line(core, ip)?;
        self.state.lock().disconnect(core, ip);
        Ok(())
    }

    /// Drops every output consumer handle. Levels keep latching afterwards.
    pub fn release(&self) {
        self.state.lock().release();
    }

    /// Latched level of output `ip` of `core`.
    pub fn output_level(&self, core: usize, ip: usize) -> Option<bool> {
        self.state.lock().output_level(core, ip)
    }

    /// Drives the level of input pin `source`.
    pub fn set_pin_level(&self, source: usize, level: bool) -> AxResult {
        if source >= LIOINTC_NUM_SOURCES {
            warn!("vLioIntc: no such source {source}");
            return ax_err!(InvalidInput, "vLioIntc: source out of range");
        }
        trace!("vLioIntc: source {source} level {}", level as u8);
        self.state.lock().set_pin_level(source, level);
        Ok(())
    }

    /// Reads `size` bytes at `offset` in the register window. Unknown registers read as 0.
    pub fn read_reg(&self, offset: usize, size: usize) -> u32 {
        let val = match Register::decode(offset, size) {
            Some(reg) => self.state.lock().read(reg),
            None => 0,
        };
        trace!("vLioIntc read: size={size}, offset={offset:#x}, val={val:#x}");
        val
    }

    /// Writes `size` bytes at `offset` in the register window. Unknown registers ignore writes.
    pub fn write_reg(&self, offset: usize, size: usize, val: u32) {
        trace!("vLioIntc write: size={size}, offset={offset:#x}, val={val:#x}");
        let Some(reg) = Register::decode(offset, size) else {
            return;
        };
        let mut state = self.state.lock();
        if state.write(reg, val) {
            state.update();
        }
    }

    pub fn snapshot(&self) -> LioIntcSnapshot {
        self.state.lock().snapshot()
    }

    /// Replaces routing, enable mask and pin levels, notifying lines that change.
    pub fn restore(&self, snapshot: &LioIntcSnapshot) {
        self.state.lock().restore(snapshot);
    }
}

impl BaseDeviceOps<GuestPhysAddrRange> for VLioIntc {
    fn emu_type(&self) -> EmuDeviceType {
        EmuDeviceType::InterruptController
    }

    fn address_range(&self) -> GuestPhysAddrRange {
        GuestPhysAddrRange::from_start_size(self.addr, self.size)
    }

    fn handle_read(
        &self,
        addr: <GuestPhysAddrRange as axaddrspace::device::DeviceAddrRange>::Addr,
        width: AccessWidth,
    ) -> AxResult<usize> {
        let offset = addr.as_usize().wrapping_sub(self.addr.as_usize());
        Ok(self.read_reg(offset, access_size(width)) as usize)
    }

    fn handle_write(
        &self,
        addr: <GuestPhysAddrRange as axaddrspace::device::DeviceAddrRange>::Addr,
        width: AccessWidth,
        val: usize,
    ) -> AxResult {
        let offset = addr.as_usize().wrapping_sub(self.addr.as_usize());
        self.write_reg(offset, access_size(width), val as u32);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axerrno::AxError;
    use std::sync::Mutex as StdMutex;

    const BASE: usize = 0x1fe0_1400;

    fn liointc(num_cores: usize) -> VLioIntc {
        VLioIntc::new(GuestPhysAddr::from_usize(BASE), None, num_cores).unwrap()
    }

    #[test]
    fn rejects_bad_configuration() {
        let addr = GuestPhysAddr::from_usize(BASE);
        assert_eq!(VLioIntc::new(addr, None, 0).err(), Some(AxError::InvalidInput));
        assert_eq!(VLioIntc::new(addr, Some(0x40), 1).err(), Some(AxError::InvalidInput));
        let intc = VLioIntc::new(addr, Some(0x100), 8).unwrap();
        assert_eq!(intc.size, 0x100);
        assert_eq!(intc.output_level(7, 3), Some(false));
    }

    #[test]
    fn rejects_bad_lines() {
        let intc = liointc(1);
        let line: Arc<dyn OutputLine> = Arc::new(|_: usize, _: usize, _: bool| {});
        assert_eq!(
            intc.connect_output(1, 0, line.clone()),
            Err(AxError::InvalidInput)
        );
        assert_eq!(intc.connect_output(0, 4, line), Err(AxError::InvalidInput));
        assert_eq!(intc.disconnect_output(2, 0), Err(AxError::InvalidInput));
        assert_eq!(intc.set_pin_level(64, true), Err(AxError::InvalidInput));
        assert_eq!(intc.snapshot().pin_state, 0);
    }

    #[test]
    fn writes_recompute_immediately() {
        let intc = liointc(1);
        intc.set_pin_level(5, true).unwrap();
        intc.write_reg(0x05, 1, 0b0010_0001);
        intc.write_reg(LIOINTC_IEN_SET_OFFSET, 4, 1 << 5);
        assert_eq!(intc.read_reg(LIOINTC_ISR_OFFSET, 4), 1 << 5);
        assert_eq!(intc.output_level(0, 1), Some(true));
    }

    #[test]
    fn unknown_writes_are_ignored() {
        let intc = liointc(1);
        let before = intc.snapshot();
        intc.write_reg(0x29, 4, u32::MAX);
        intc.write_reg(0x28, 2, u32::MAX);
        intc.write_reg(0x30, 4, u32::MAX);
        intc.write_reg(0x24, 4, u32::MAX);
        intc.write_reg(0x20, 1, 0xff);
        assert_eq!(intc.snapshot(), before);
    }

    #[test]
    fn release_drops_consumers() {
        let intc = liointc(1);
        let events = Arc::new(StdMutex::new(Vec::new()));
        let sink = events.clone();
        let line: Arc<dyn OutputLine> = Arc::new(move |core: usize, ip: usize, level: bool| {
            sink.lock().unwrap().push((core, ip, level));
        });
        intc.connect_output(0, 0, line.clone()).unwrap();
        assert_eq!(Arc::strong_count(&line), 2);
        intc.release();
        assert_eq!(Arc::strong_count(&line), 1);

        intc.write_reg(0x00, 1, 0b0001_0001);
        intc.write_reg(LIOINTC_IEN_SET_OFFSET, 4, 1);
        intc.set_pin_level(0, true).unwrap();
        assert!(events.lock().unwrap().is_empty());
        assert_eq!(intc.output_level(0, 0), Some(true));
    }
}
