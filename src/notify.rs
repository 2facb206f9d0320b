//! Output line latching and change notification.
//!
//! Every output line is a level latch. After each recomputation the fresh
//! levels are compared against the latched ones; only lines whose level flipped
//! are updated and reported to their consumer.

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use crate::consts::LIOINTC_NUM_IPS;

/// Consumer of one (core, ip) output line, typically a vCPU interrupt pin.
pub trait OutputLine: Send + Sync {
    /// Called with the new level each time the line flips.
    fn on_output_change(&self, core: usize, ip: usize, level: bool);
}

impl<F> OutputLine for F
where
    F: Fn(usize, usize, bool) + Send + Sync,
{
    fn on_output_change(&self, core: usize, ip: usize, level: bool) {
        self(core, ip, level)
    }
}

pub(crate) struct OutputNotifier {
    /// Latched level of every output line.
    latched: Vec<bool>,
    /// Consumer of every output line, if connected.
    consumers: Vec<Option<Arc<dyn OutputLine>>>,
}

impl OutputNotifier {
    pub fn new(num_lines: usize) -> Self {
        Self {
            latched: vec![false; num_lines],
            consumers: vec![None; num_lines],
        }
    }

    pub fn num_lines(&self) -> usize {
        self.latched.len()
    }

    pub fn level(&self, index: usize) -> Option<bool> {
        self.latched.get(index).copied()
    }

    /// Installs the consumer of line `index`, returning the one it replaces.
    pub fn connect(
        &mut self,
        index: usize,
        line: Arc<dyn OutputLine>,
    ) -> Option<Arc<dyn OutputLine>> {
        self.consumers[index].replace(line)
    }

    pub fn disconnect(&mut self, index: usize) -> Option<Arc<dyn OutputLine>> {
        self.consumers[index].take()
    }

    /// Drops every consumer handle.
    pub fn release(&mut self) {
        self.consumers.iter_mut().for_each(|c| *c = None);
    }

    /// Latches `fresh` and notifies every line whose level changed.
    ///
    /// Returns the number of lines that flipped.
    pub fn latch(&mut self, fresh: &[bool]) -> usize {
        debug_assert_eq!(fresh.len(), self.num_lines());
        let mut flipped = 0;

        for (index, (&new, old)) in fresh.iter().zip(self.latched.iter_mut()).enumerate() {
            if new == *old {
                continue;
            }
            *old = new;
            flipped += 1;

            let (core, ip) = (index / LIOINTC_NUM_IPS, index % LIOINTC_NUM_IPS);
            debug!("vLioIntc: core {core} IP{ip} -> {}", new as u8);
            if let Some(consumer) = &self.consumers[index] {
                consumer.on_output_change(core, ip, new);
            }
        }

        flipped
    }
}
