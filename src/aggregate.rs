use alloc::vec;
use alloc::vec::Vec;

use bitmaps::Bitmap;

use crate::consts::{output_index, LIOINTC_NUM_IPS, LIOINTC_NUM_SOURCES};
use crate::routing::RoutingTable;

/// Computes the level of every output line from scratch.
///
/// Line `output_index(core, ip)` is asserted iff some source set in `status`
/// is routed to `(core, ip)`. Sources routed to a core beyond `num_cores`
/// contribute nothing.
pub fn compute_outputs(
    status: &Bitmap<LIOINTC_NUM_SOURCES>,
    routing: &RoutingTable,
    num_cores: usize,
) -> Vec<bool> {
    let mut outputs = vec![false; num_cores * LIOINTC_NUM_IPS];

    for source in status {
        match routing.resolve(source) {
            Some((core, ip)) if core < num_cores => {
                outputs[output_index(core, ip)] = true;
            }
            Some((core, _)) => {
                trace!("vLioIntc: source {source} routed to absent core {core}");
            }
            None => {}
        }
    }

    outputs
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status(mask: u64) -> Bitmap<LIOINTC_NUM_SOURCES> {
        Bitmap::from_value(mask)
    }

    #[test]
    fn empty_status_deasserts_everything() {
        let mut routing = RoutingTable::new();
        routing.set_entry(0, 0b0001_0001);
        assert_eq!(compute_outputs(&status(0), &routing, 2), vec![false; 8]);
    }

    #[test]
    fn many_sources_to_one_line() {
        let mut routing = RoutingTable::new();
        routing.set_entry(5, 0b0100_0001);
        routing.set_entry(6, 0b0100_0001);
        routing.set_entry(40, 0b1000_0010);

        let out = compute_outputs(&status((1 << 5) | (1 << 6)), &routing, 2);
        assert!(out[output_index(0, 2)]);
        assert_eq!(out.iter().filter(|l| **l).count(), 1);

        let out = compute_outputs(&status(1 << 40), &routing, 2);
        assert!(out[output_index(1, 3)]);
        assert!(!out[output_index(0, 2)]);
    }

    #[test]
    fn absent_core_is_inert() {
        let mut routing = RoutingTable::new();
        routing.set_entry(1, 0b0001_0100);
        let out = compute_outputs(&status(1 << 1), &routing, 2);
        assert_eq!(out, vec![false; 8]);
    }

    #[test]
    fn unrouted_sources_are_inert() {
        let mut routing = RoutingTable::new();
        routing.set_entry(2, 0x0f);
        routing.set_entry(3, 0xf0);
        let out = compute_outputs(&status(u64::MAX), &routing, 4);
        assert_eq!(out, vec![false; 16]);
    }

    #[test]
    fn recomputation_is_pure() {
        let mut routing = RoutingTable::new();
        for source in 0..LIOINTC_NUM_SOURCES {
            routing.set_entry(source, (source as u8).wrapping_mul(37));
        }
        let mask = 0xdead_beef_0bad_f00d;
        assert_eq!(
            compute_outputs(&status(mask), &routing, 4),
            compute_outputs(&status(mask), &routing, 4)
        );
    }
}
