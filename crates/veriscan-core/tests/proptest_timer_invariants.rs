#![forbid(unsafe_code)]

//! Property tests for timer-slot token safety.
//!
//! Under arbitrary arm/cancel/tick interleavings: every fired token was
//! minted by an `arm`, no token fires twice, and no cancelled or replaced
//! token ever fires.

use std::collections::HashSet;
use std::time::Duration;

use proptest::prelude::*;
use veriscan_core::timer::TimerSlot;

#[derive(Debug, Clone)]
enum Op {
    Arm(u64),
    Cancel,
    Tick(u64),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0u64..500).prop_map(Op::Arm),
        Just(Op::Cancel),
        (0u64..500).prop_map(Op::Tick),
    ]
}

proptest! {
    #[test]
    fn fired_tokens_are_live_and_unique(ops in proptest::collection::vec(op_strategy(), 1..64)) {
        let mut slot = TimerSlot::new();
        let mut minted = HashSet::new();
        let mut dead = HashSet::new();
        let mut fired = HashSet::new();

        for op in ops {
            match op {
                Op::Arm(ms) => {
                    if let Some(replaced) = slot.armed_token() {
                        dead.insert(replaced);
                    }
                    let token = slot.arm(Duration::from_millis(ms));
                    prop_assert!(minted.insert(token), "token minted twice");
                }
                Op::Cancel => {
                    if let Some(token) = slot.cancel() {
                        dead.insert(token);
                    }
                }
                Op::Tick(ms) => {
                    if let Some(token) = slot.tick(Duration::from_millis(ms)) {
                        prop_assert!(minted.contains(&token), "fired token never minted");
                        prop_assert!(!dead.contains(&token), "cancelled/replaced token fired");
                        prop_assert!(fired.insert(token), "token fired twice");
                    }
                }
            }
        }
    }

    #[test]
    fn at_most_one_armed(ops in proptest::collection::vec(op_strategy(), 1..64)) {
        let mut slot = TimerSlot::new();
        for op in ops {
            match op {
                Op::Arm(ms) => {
                    slot.arm(Duration::from_millis(ms));
                }
                Op::Cancel => {
                    slot.cancel();
                }
                Op::Tick(ms) => {
                    slot.tick(Duration::from_millis(ms));
                }
            }
            // The slot either holds exactly one token or none.
            prop_assert_eq!(slot.is_armed(), slot.armed_token().is_some());
        }
    }
}
