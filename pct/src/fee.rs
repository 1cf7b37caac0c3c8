//! # Conventional Fee Calculation
//!
//! A pure function from transaction shape to required fee. No PCT state, no
//! side effects — the builder calls it while deciding on change, and tests
//! can pin its anchor values without constructing anything.
//!
//! The rule is the ecosystem's proportional fee schedule: count logical
//! actions, charge a flat marginal fee per action, and never charge for
//! fewer than the grace allowance. The transparent side contributes
//! `max(inputs, outputs)` actions; the shielded side contributes its action
//! count, padded up to two whenever any shielded action is present.

use std::cmp;

use crate::config::{GRACE_ACTIONS, MARGINAL_FEE, SHIELDED_ACTION_PADDING};

/// Required fee, in atomic units, for a transaction of the given shape.
///
/// Anchor values: one input and two outputs (a typical pay-plus-change
/// transparent transaction) costs 10 000; one input, one output, and one
/// shielded action costs 15 000.
pub fn fee(
    transparent_inputs: usize,
    transparent_outputs: usize,
    shielded_actions: usize,
) -> u64 {
    let transparent = cmp::max(transparent_inputs, transparent_outputs) as u64;
    let shielded = match shielded_actions as u64 {
        0 => 0,
        n => cmp::max(n, SHIELDED_ACTION_PADDING),
    };
    MARGINAL_FEE * cmp::max(GRACE_ACTIONS, transparent + shielded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transparent_anchor() {
        assert_eq!(fee(1, 2, 0), 10_000);
    }

    #[test]
    fn mixed_anchor() {
        assert_eq!(fee(1, 1, 1), 15_000);
    }

    #[test]
    fn grace_allowance_floors_small_shapes() {
        // A 1-in/1-out transaction is still charged two actions.
        assert_eq!(fee(1, 1, 0), 10_000);
        assert_eq!(fee(0, 1, 0), 10_000);
    }

    #[test]
    fn transparent_side_counts_the_larger_of_inputs_and_outputs() {
        assert_eq!(fee(3, 1, 0), 15_000);
        assert_eq!(fee(1, 3, 0), 15_000);
        assert_eq!(fee(3, 3, 0), 15_000);
    }

    #[test]
    fn single_shielded_action_is_padded_to_two() {
        // 1 transparent action + padded 2 shielded = 3.
        assert_eq!(fee(1, 1, 1), fee(1, 1, 2));
        // Beyond the padding floor the count is linear.
        assert_eq!(fee(1, 1, 3), 20_000);
    }

    #[test]
    fn shielded_only_shape() {
        // No transparent side at all: padded 2 shielded actions.
        assert_eq!(fee(0, 0, 1), 10_000);
        assert_eq!(fee(0, 0, 5), 25_000);
    }

    #[test]
    fn fee_never_decreases_as_the_shape_grows() {
        for ti in 0..5 {
            for to in 0..5 {
                for sa in 0..5 {
                    let base = fee(ti, to, sa);
                    assert!(fee(ti + 1, to, sa) >= base);
                    assert!(fee(ti, to + 1, sa) >= base);
                    assert!(fee(ti, to, sa + 1) >= base);
                }
            }
        }
    }
}
