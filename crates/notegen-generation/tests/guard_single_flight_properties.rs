//! Property: across any interleaving of acquire and release operations, at
//! most one guard slot is ever held and the busy flag always reflects it.

use notegen_generation::ConcurrencyGuard;
use notegen_core::Position;
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    TryAcquire,
    Release,
}

fn ops_strategy() -> impl Strategy<Value = Vec<Op>> {
    prop::collection::vec(
        prop_oneof![Just(Op::TryAcquire), Just(Op::Release)],
        1..64,
    )
}

proptest! {
    #[test]
    fn at_most_one_slot_held(ops in ops_strategy()) {
        let guard = ConcurrencyGuard::new();
        let mut held = None;

        for op in ops {
            match op {
                Op::TryAcquire => {
                    let slot = guard.try_acquire(Some(Position::new(0, 0)));
                    if held.is_some() {
                        // Second acquisition while held must be rejected.
                        prop_assert!(slot.is_none());
                    } else {
                        prop_assert!(slot.is_some());
                        held = slot;
                    }
                }
                Op::Release => {
                    held = None;
                }
            }
            prop_assert_eq!(guard.is_busy(), held.is_some());
            prop_assert_eq!(guard.cursor_mark().is_some(), held.is_some());
        }
    }
}
