//! Property-based tests for the availability calculator and role ordering.
//!
//! These tests use proptest to verify invariants across a wide range of inputs,
//! helping to catch edge cases that unit tests might miss.

use chrono::Utc;
use proptest::prelude::*;
use uuid::Uuid;
use warehouse_leasing_api::{
    auth::Role,
    entities::warehouse_occupant,
    models::FloorType,
    services::availability::compute_availability,
};

const STATUSES: [&str; 5] = ["active", "pending", "completed", "cancelled", "archived"];

fn allocation(space: f64, status: &str) -> warehouse_occupant::Model {
    warehouse_occupant::Model {
        id: Uuid::new_v4(),
        warehouse_id: Uuid::nil(),
        client_name: "Prop Client".to_string(),
        floor_type: FloorType::GroundFloor.to_string(),
        space_occupied: space,
        status: status.to_string(),
        booking_status: None,
        created_at: Utc::now(),
        updated_at: None,
    }
}

// Strategies for generating test data
fn space_strategy() -> impl Strategy<Value = f64> {
    (0u32..100_000).prop_map(|v| f64::from(v) / 10.0)
}

fn allocations_strategy() -> impl Strategy<Value = Vec<(f64, usize)>> {
    prop::collection::vec((space_strategy(), 0usize..STATUSES.len()), 0..20)
}

fn role_strategy() -> impl Strategy<Value = Role> {
    prop_oneof![
        Just(Role::User),
        Just(Role::Support),
        Just(Role::Manager),
        Just(Role::Admin),
    ]
}

fn build(rows: &[(f64, usize)]) -> Vec<warehouse_occupant::Model> {
    rows.iter()
        .map(|(space, status)| allocation(*space, STATUSES[*status]))
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn available_space_is_never_negative(total in space_strategy(), rows in allocations_strategy()) {
        let allocations = build(&rows);
        let result = compute_availability(total, &allocations);
        prop_assert!(result.available_space >= 0.0);
        prop_assert!(result.utilization_percentage >= 0.0);
    }

    #[test]
    fn available_is_total_minus_occupied_clamped(total in space_strategy(), rows in allocations_strategy()) {
        let allocations = build(&rows);
        let result = compute_availability(total, &allocations);
        let expected = (result.total_space - result.occupied_space).max(0.0);
        prop_assert!((result.available_space - expected).abs() < 1e-9);
    }

    #[test]
    fn zero_capacity_means_zero_utilization(rows in allocations_strategy()) {
        let allocations = build(&rows);
        let result = compute_availability(0.0, &allocations);
        prop_assert_eq!(result.total_space, 0.0);
        prop_assert_eq!(result.available_space, 0.0);
        prop_assert_eq!(result.utilization_percentage, 0.0);
    }

    #[test]
    fn only_active_rows_count(total in space_strategy(), rows in allocations_strategy()) {
        let allocations = build(&rows);
        let expected: f64 = rows
            .iter()
            .filter(|(_, status)| STATUSES[*status] == "active")
            .map(|(space, _)| *space)
            .sum();
        let result = compute_availability(total, &allocations);
        prop_assert!((result.occupied_space - expected).abs() < 1e-6);
    }

    #[test]
    fn adding_an_inactive_row_changes_nothing(
        total in space_strategy(),
        rows in allocations_strategy(),
        extra in space_strategy(),
        status in 1usize..STATUSES.len(),
    ) {
        let mut allocations = build(&rows);
        let before = compute_availability(total, &allocations);
        allocations.push(allocation(extra, STATUSES[status]));
        let after = compute_availability(total, &allocations);
        prop_assert_eq!(before, after);
    }
}

proptest! {
    #[test]
    fn role_satisfaction_follows_ordering(a in role_strategy(), b in role_strategy()) {
        prop_assert_eq!(a.satisfies(b), a >= b);
        if a.satisfies(b) && b.satisfies(a) {
            prop_assert_eq!(a, b);
        }
    }
}
