//! Property Tests
//!
//! Conservation, non-mutation and determinism over generated snapshots.

use banksafe::core::vector;
use banksafe::{adjudicate, check_safety, Reason, SystemSnapshot};
use proptest::prelude::*;

fn arb_snapshot() -> impl Strategy<Value = SystemSnapshot> {
    (0usize..6, 1usize..4)
        .prop_flat_map(|(processes, resources)| {
            (
                prop::collection::vec(0u32..6, resources),
                prop::collection::vec(
                    prop::collection::vec((0u32..8, 0u32..8), resources),
                    processes,
                ),
            )
        })
        .prop_map(|(available, rows)| {
            let maximum: Vec<Vec<u32>> = rows
                .iter()
                .map(|row| row.iter().map(|(max, _)| *max).collect())
                .collect();
            let allocation: Vec<Vec<u32>> = rows
                .iter()
                .map(|row| row.iter().map(|(max, held)| held % (max + 1)).collect())
                .collect();
            SystemSnapshot::new(available, maximum, allocation).unwrap()
        })
}

fn arb_request() -> impl Strategy<Value = (SystemSnapshot, usize, Vec<u32>)> {
    arb_snapshot()
        .prop_filter("needs at least one process", |s| s.process_count() > 0)
        .prop_flat_map(|s| {
            let processes = s.process_count();
            let resources = s.resource_count();
            (
                Just(s),
                0..processes,
                prop::collection::vec(0u32..5, resources),
            )
        })
}

proptest! {
    #[test]
    fn safety_check_is_idempotent(snapshot in arb_snapshot()) {
        let before = snapshot.clone();
        let first = check_safety(&snapshot);
        let second = check_safety(&snapshot);
        prop_assert_eq!(&first, &second);
        prop_assert_eq!(snapshot, before);
    }

    #[test]
    fn safe_order_is_completable(snapshot in arb_snapshot()) {
        let result = check_safety(&snapshot);
        prop_assert_eq!(result.is_safe, result.order.len() == snapshot.process_count());

        let mut work = snapshot.available().to_vec();
        for &p in &result.order {
            prop_assert!(
                vector::fits_within(&snapshot.need()[p], &work),
                "P{} needs {:?} but only {:?} is free",
                p, snapshot.need()[p], work,
            );
            vector::add_assign(&mut work, &snapshot.allocation()[p]);
        }

        let mut seen = result.order.clone();
        seen.sort_unstable();
        seen.dedup();
        prop_assert_eq!(seen.len(), result.order.len());
    }

    #[test]
    fn lowest_fitting_process_finishes_first(snapshot in arb_snapshot()) {
        let result = check_safety(&snapshot);
        let first_fit = (0..snapshot.process_count())
            .find(|&p| vector::fits_within(&snapshot.need()[p], snapshot.available()));
        prop_assert_eq!(result.order.first().copied(), first_fit);
    }

    #[test]
    fn grants_conserve_totals_and_need((snapshot, process, request) in arb_request()) {
        let result = adjudicate(&snapshot, process, &request).unwrap();
        if result.granted {
            let after = &result.snapshot;
            prop_assert_eq!(after.totals(), snapshot.totals());
            prop_assert!(check_safety(after).is_safe);
            prop_assert_eq!(after.maximum(), snapshot.maximum());

            for p in 0..after.process_count() {
                let derived = vector::checked_sub(&after.maximum()[p], &after.allocation()[p]);
                prop_assert_eq!(derived.as_deref(), Some(after.need()[p].as_slice()));
                if p != process {
                    prop_assert_eq!(&after.allocation()[p], &snapshot.allocation()[p]);
                }
            }
        }
    }

    #[test]
    fn rejections_leave_state_unchanged((snapshot, process, request) in arb_request()) {
        let before = snapshot.clone();
        let result = adjudicate(&snapshot, process, &request).unwrap();
        prop_assert_eq!(&snapshot, &before);
        prop_assert_eq!(result.granted, result.reason == Reason::Granted);

        match result.reason {
            Reason::Granted => {}
            Reason::ExceedsMaximumClaim => {
                prop_assert!(!vector::fits_within(&request, &snapshot.need()[process]));
                prop_assert!(result.order.is_empty());
                prop_assert_eq!(result.snapshot, before);
            }
            Reason::InsufficientAvailable => {
                prop_assert!(vector::fits_within(&request, &snapshot.need()[process]));
                prop_assert!(!vector::fits_within(&request, snapshot.available()));
                prop_assert_eq!(result.order, check_safety(&snapshot).order);
                prop_assert_eq!(result.snapshot, before);
            }
            Reason::WouldDeadlock => {
                prop_assert_eq!(result.order, check_safety(&snapshot).order);
                prop_assert_eq!(result.snapshot, before);
            }
        }
    }
}
