//! Department interleaving: turn one hall's department groups into a seating.
//!
//! Seats are walked in traversal order. At each seat the department with the
//! most students left is chosen among those that differ from every filled
//! neighbour (ties by department code). When no department qualifies, the seat
//! is left empty as long as the seats after it can still hold everyone left.
//! Otherwise the largest queue is used anyway and the seat is recorded as a
//! conflict.
//!
//! Two independent orders are at play: which department fills the next seat
//! is decided here, while which student of that department sits there is
//! always the head of its roll-ordered queue.

use std::cmp::Reverse;
use std::collections::VecDeque;

use crate::interner::{DeptId, DepartmentInterner};
use crate::layout::{BenchLayout, LayoutError, Seat};
use crate::models::Student;
use crate::planner::DepartmentGroup;
use crate::{log_changes, log_checks, log_debug};

/// A seat filled despite a same-department neighbour.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeatConflict {
    pub seat: Seat,
    pub department_code: String,
    /// Filled neighbours of `seat` holding the same department.
    pub neighbors: Vec<Seat>,
}

/// Seating of one hall.
#[derive(Debug, Clone)]
pub struct Interleaving<'a> {
    /// Filled seats in traversal order.
    pub placements: Vec<(Seat, &'a Student)>,
    pub conflicts: Vec<SeatConflict>,
}

/// Choose the department for the next seat and the student at its head.
///
/// Returns `None` once every queue is drained; the flag tells whether the
/// choice clashes with a neighbour.
fn pick_department<'a>(
    queues: &[VecDeque<&'a Student>],
    blocked: &[bool],
) -> Option<(DeptId, &'a Student, bool)> {
    let largest = |eligible: &dyn Fn(usize) -> bool| {
        queues
            .iter()
            .enumerate()
            .filter(|&(id, _)| eligible(id))
            .filter_map(|(id, queue)| queue.front().map(|&student| (id, queue.len(), student)))
            .max_by_key(|&(id, len, _)| (len, Reverse(id)))
            .map(|(id, _, student)| (id as DeptId, student))
    };
    largest(&|id| !blocked[id])
        .map(|(id, student)| (id, student, false))
        .or_else(|| largest(&|_| true).map(|(id, student)| (id, student, true)))
}

/// Seat the students of `groups` in `layout`.
///
/// `groups` should be ordered by department code; that order breaks ties
/// between equally large departments.
///
/// # Returns
/// * `Err(LayoutError::Overfilled)` if the groups hold more students than seats
pub fn interleave<'a>(
    groups: &[DepartmentGroup<'a>],
    layout: &BenchLayout,
    verbosity: u8,
) -> Result<Interleaving<'a>, LayoutError> {
    let total: usize = groups.iter().map(|g| g.students.len()).sum();
    if total > layout.capacity() {
        return Err(LayoutError::Overfilled {
            students: total,
            capacity: layout.capacity(),
        });
    }

    let mut interner = DepartmentInterner::with_capacity(groups.len());
    let mut queues: Vec<VecDeque<&'a Student>> = Vec::with_capacity(groups.len());
    for group in groups {
        let id = interner.intern(group.department_code) as usize;
        if id == queues.len() {
            queues.push(VecDeque::new());
        }
        queues[id].extend(group.students.iter().copied());
    }

    let mut filled: Vec<Option<DeptId>> = vec![None; layout.capacity()];
    let mut blocked = vec![false; queues.len()];
    let mut placements = Vec::with_capacity(total);
    let mut conflicts = Vec::new();
    let mut gaps = 0;

    for (index, seat) in layout.seats().enumerate() {
        blocked.iter_mut().for_each(|b| *b = false);
        let neighbors: Vec<(Seat, DeptId)> = layout
            .neighbors(seat)
            .filter_map(|n| {
                layout
                    .index_of(n)
                    .and_then(|i| filled[i])
                    .map(|dept| (n, dept))
            })
            .collect();
        for &(_, dept) in &neighbors {
            blocked[dept as usize] = true;
        }

        let Some((dept, student, clashes)) = pick_department(&queues, &blocked) else {
            break;
        };
        let code = student.department_code.as_str();

        if clashes {
            let left = total - placements.len();
            let seats_after = layout.capacity() - index - 1;
            if seats_after >= left {
                log_checks!(
                    verbosity,
                    "Seat {:?}: no department clears {} neighbours, leaving it empty",
                    seat,
                    neighbors.len()
                );
                gaps += 1;
                continue;
            }
            let same: Vec<Seat> = neighbors
                .iter()
                .filter(|&&(_, other)| other == dept)
                .map(|&(n, _)| n)
                .collect();
            log_checks!(
                verbosity,
                "Seat {:?}: no department clears {} neighbours, placing {} anyway",
                seat,
                neighbors.len(),
                code
            );
            conflicts.push(SeatConflict {
                seat,
                department_code: code.to_string(),
                neighbors: same,
            });
        }

        log_debug!(
            verbosity,
            "Seat {:?} <- {} ({})",
            seat,
            student.roll_number,
            code
        );
        queues[dept as usize].pop_front();
        filled[index] = Some(dept);
        placements.push((seat, student));
    }

    log_changes!(
        verbosity,
        "Interleaved {} students across {} departments, {} conflicts, {} seats skipped",
        placements.len(),
        interner.len(),
        conflicts.len(),
        gaps
    );

    Ok(Interleaving {
        placements,
        conflicts,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn make_students(dept: &str, rolls: &[u32]) -> Vec<Student> {
        rolls
            .iter()
            .map(|r| Student {
                roll_number: r.to_string(),
                name: String::new(),
                department_code: dept.to_string(),
                academic_year: String::new(),
            })
            .collect()
    }

    fn make_group<'a>(code: &'a str, students: &'a [Student]) -> DepartmentGroup<'a> {
        DepartmentGroup {
            department_code: code,
            students: students.iter().collect(),
        }
    }

    fn same_department_pairs(layout: &BenchLayout, result: &Interleaving<'_>) -> usize {
        let mut pairs = 0;
        for (i, (a, sa)) in result.placements.iter().enumerate() {
            for (b, sb) in &result.placements[i + 1..] {
                if layout.is_adjacent(*a, *b) && sa.department_code == sb.department_code {
                    pairs += 1;
                }
            }
        }
        pairs
    }

    fn conflicting_pairs(result: &Interleaving<'_>) -> usize {
        result.conflicts.iter().map(|c| c.neighbors.len()).sum()
    }

    #[test]
    fn test_two_balanced_departments_no_conflicts() {
        // 2 rows x 1 bench x 2 seats
        let layout = BenchLayout::new(2, 1, 2, 4).unwrap();
        let a = make_students("A", &[1, 2]);
        let b = make_students("B", &[11, 12]);
        let groups = vec![make_group("A", &a), make_group("B", &b)];
        let result = interleave(&groups, &layout, 0).unwrap();

        assert_eq!(result.placements.len(), 4);
        assert!(result.conflicts.is_empty());
        assert_eq!(same_department_pairs(&layout, &result), 0);
        let order: Vec<&str> = result
            .placements
            .iter()
            .map(|(_, s)| s.roll_number.as_str())
            .collect();
        assert_eq!(order, vec!["1", "11", "2", "12"]);
    }

    #[test]
    fn test_single_department_flags_every_bench_mate() {
        let layout = BenchLayout::new(2, 1, 2, 4).unwrap();
        let a = make_students("A", &[1, 2, 3, 4]);
        let groups = vec![make_group("A", &a)];
        let result = interleave(&groups, &layout, 0).unwrap();

        assert_eq!(result.placements.len(), 4);
        assert_eq!(result.conflicts.len(), 2);
        assert_eq!(result.conflicts[0].seat, Seat::new(0, 0, 1));
        assert_eq!(result.conflicts[0].neighbors, vec![Seat::new(0, 0, 0)]);
        assert_eq!(result.conflicts[1].seat, Seat::new(1, 0, 1));
    }

    #[test]
    fn test_majority_department_reports_remaining_conflicts() {
        let layout = BenchLayout::new(3, 1, 2, 6).unwrap();
        let a = make_students("A", &[1, 2, 3, 4, 5]);
        let b = make_students("B", &[11]);
        let groups = vec![make_group("A", &a), make_group("B", &b)];
        let result = interleave(&groups, &layout, 0).unwrap();

        assert_eq!(result.placements.len(), 6);
        assert_eq!(result.conflicts.len(), 2);
        assert_eq!(conflicting_pairs(&result), same_department_pairs(&layout, &result));
    }

    #[test]
    fn test_queues_draw_in_roll_order() {
        let layout = BenchLayout::new(3, 1, 2, 6).unwrap();
        let a = make_students("A", &[101, 103, 105]);
        let b = make_students("B", &[7, 8, 9]);
        let groups = vec![make_group("A", &a), make_group("B", &b)];
        let result = interleave(&groups, &layout, 0).unwrap();

        let a_order: Vec<&str> = result
            .placements
            .iter()
            .filter(|(_, s)| s.department_code == "A")
            .map(|(_, s)| s.roll_number.as_str())
            .collect();
        assert_eq!(a_order, vec!["101", "103", "105"]);
    }

    #[test]
    fn test_wide_rows_use_third_department() {
        // One row of three benches: neighbouring benches must not share a department.
        let layout = BenchLayout::new(1, 3, 2, 6).unwrap();
        let a = make_students("A", &[1, 2]);
        let b = make_students("B", &[11, 12]);
        let c = make_students("C", &[21, 22]);
        let groups = vec![make_group("A", &a), make_group("B", &b), make_group("C", &c)];
        let result = interleave(&groups, &layout, 0).unwrap();

        // the second seat of bench 1 borders every department in use
        assert_eq!(result.conflicts.len(), 2);
        assert_eq!(result.conflicts[0].seat, Seat::new(0, 1, 1));
        assert_eq!(result.conflicts[0].department_code, "A");
        assert_eq!(conflicting_pairs(&result), same_department_pairs(&layout, &result));
    }

    #[test]
    fn test_partial_hall_fills_leading_seats() {
        let layout = BenchLayout::new(5, 1, 2, 10).unwrap();
        let a = make_students("A", &[1, 2]);
        let b = make_students("B", &[11]);
        let groups = vec![make_group("A", &a), make_group("B", &b)];
        let result = interleave(&groups, &layout, 0).unwrap();

        let seats: Vec<Seat> = result.placements.iter().map(|(s, _)| *s).collect();
        assert_eq!(
            seats,
            vec![Seat::new(0, 0, 0), Seat::new(0, 0, 1), Seat::new(1, 0, 0)]
        );
        assert!(result.conflicts.is_empty());
    }

    #[test]
    fn test_spare_seats_separate_departments() {
        // A, B / A, _ / A, _ keeps every bench clean.
        let layout = BenchLayout::new(3, 1, 2, 6).unwrap();
        let a = make_students("A", &[1, 2, 3]);
        let b = make_students("B", &[11]);
        let groups = vec![make_group("A", &a), make_group("B", &b)];
        let result = interleave(&groups, &layout, 0).unwrap();

        assert!(result.conflicts.is_empty());
        let seats: Vec<Seat> = result.placements.iter().map(|(s, _)| *s).collect();
        assert_eq!(
            seats,
            vec![
                Seat::new(0, 0, 0),
                Seat::new(0, 0, 1),
                Seat::new(1, 0, 0),
                Seat::new(2, 0, 0),
            ]
        );
    }

    #[test]
    fn test_gaps_stop_when_slack_runs_out() {
        // Four A students in three benches: one bench must be shared.
        let layout = BenchLayout::new(3, 1, 2, 6).unwrap();
        let a = make_students("A", &[1, 2, 3, 4]);
        let groups = vec![make_group("A", &a)];
        let result = interleave(&groups, &layout, 0).unwrap();

        assert_eq!(result.placements.len(), 4);
        assert_eq!(result.conflicts.len(), 1);
        assert_eq!(result.conflicts[0].seat, Seat::new(2, 0, 1));
        assert_eq!(conflicting_pairs(&result), same_department_pairs(&layout, &result));
    }

    #[test]
    fn test_overfilled_hall_rejected() {
        let layout = BenchLayout::new(1, 1, 2, 2).unwrap();
        let a = make_students("A", &[1, 2, 3]);
        let groups = vec![make_group("A", &a)];
        assert_eq!(
            interleave(&groups, &layout, 0).unwrap_err(),
            LayoutError::Overfilled {
                students: 3,
                capacity: 2
            }
        );
    }

    #[test]
    fn test_every_student_placed_once_on_distinct_seats() {
        let layout = BenchLayout::new(4, 2, 3, 22).unwrap();
        let a = make_students("A", &(1..=9).collect::<Vec<_>>());
        let b = make_students("B", &(101..=107).collect::<Vec<_>>());
        let c = make_students("C", &(201..=205).collect::<Vec<_>>());
        let groups = vec![make_group("A", &a), make_group("B", &b), make_group("C", &c)];
        let result = interleave(&groups, &layout, 0).unwrap();

        assert_eq!(result.placements.len(), 21);
        let seats: HashSet<Seat> = result.placements.iter().map(|(s, _)| *s).collect();
        assert_eq!(seats.len(), 21);
        let rolls: HashSet<&str> = result
            .placements
            .iter()
            .map(|(_, s)| s.roll_number.as_str())
            .collect();
        assert_eq!(rolls.len(), 21);
        assert_eq!(conflicting_pairs(&result), same_department_pairs(&layout, &result));
    }
}
