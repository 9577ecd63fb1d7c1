//! Consistency checks over a finished allocation.
//!
//! Verifies:
//! - No seat is used twice and every seat lies inside its hall's layout
//! - No roll number is seated twice on the date
//! - No hall holds more students than its capacity
//! - Every same-department adjacent pair is reported as a violation, and every
//!   reported violation corresponds to a real same-department neighbour
//!
//! Returns human-readable problems; an empty list means the result is sound.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::layout::{BenchLayout, Seat};
use crate::models::{AllocationResult, HallAssignment};

fn check_hall(hall: &HallAssignment, problems: &mut Vec<String>) {
    if hall.seats.len() > hall.capacity as usize {
        problems.push(format!(
            "Hall {} seats {} students but holds {}",
            hall.hall_id,
            hall.seats.len(),
            hall.capacity
        ));
    }

    let layout = match BenchLayout::new(
        hall.rows,
        hall.bench_columns,
        hall.bench_capacity,
        hall.capacity as usize,
    ) {
        Ok(layout) => layout,
        Err(e) => {
            problems.push(format!("Hall {} has an invalid layout: {}", hall.hall_id, e));
            return;
        }
    };

    let mut departments: FxHashMap<Seat, &str> = FxHashMap::default();
    for assignment in &hall.seats {
        let position = &assignment.position;
        if position.hall_id != hall.hall_id {
            problems.push(format!(
                "Seat {} of hall {} is labelled with hall {}",
                position.label(),
                hall.hall_id,
                position.hall_id
            ));
        }
        let seat = Seat::from(position);
        if layout.index_of(seat).is_none() {
            problems.push(format!(
                "Seat {} is outside hall {}",
                position.label(),
                hall.hall_id
            ));
        }
        if departments
            .insert(seat, assignment.department_code.as_str())
            .is_some()
        {
            problems.push(format!(
                "Seat {} in hall {} is assigned twice",
                position.label(),
                hall.hall_id
            ));
        }
    }

    // The later seat of each clashing pair (in traversal order) carries the violation.
    let reported: FxHashSet<Seat> = hall
        .violations
        .iter()
        .map(|v| Seat::from(&v.position))
        .collect();
    for (&seat, &department) in &departments {
        let clashes = layout
            .neighbors(seat)
            .filter(|n| layout.index_of(*n) < layout.index_of(seat))
            .any(|n| departments.get(&n) == Some(&department));
        if clashes && !reported.contains(&seat) {
            problems.push(format!(
                "Seat {} in hall {} shares department {} with a neighbour but is not reported",
                seat.in_hall(&hall.hall_id).label(),
                hall.hall_id,
                department
            ));
        }
    }
    for violation in &hall.violations {
        let seat = Seat::from(&violation.position);
        let real = violation.conflicting.iter().all(|other| {
            let other = Seat::from(other);
            layout.is_adjacent(seat, other)
                && departments.get(&other) == Some(&violation.department_code.as_str())
        });
        if !real || violation.conflicting.is_empty() {
            problems.push(format!(
                "Violation at {} in hall {} does not match the seating",
                violation.position.label(),
                hall.hall_id
            ));
        }
    }
}

/// Check a result against the allocation invariants.
pub fn check_assignment(result: &AllocationResult) -> Vec<String> {
    let mut problems = Vec::new();
    let mut seated: FxHashSet<&str> = FxHashSet::default();
    for hall in &result.halls {
        check_hall(hall, &mut problems);
        for seat in &hall.seats {
            if !seated.insert(seat.roll_number.as_str()) {
                problems.push(format!(
                    "Roll number {} is seated more than once",
                    seat.roll_number
                ));
            }
        }
    }
    problems
}
