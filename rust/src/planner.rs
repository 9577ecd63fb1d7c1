//! Capacity planning: partition a session's students into hall-sized groups.
//!
//! Departments are placed largest first (ties by code). Each department goes
//! to the hall whose remaining capacity fits it most tightly; when no hall can
//! take the whole remainder, the hall with the most room takes as much as it
//! can and the rest continues. Because halls keep their leftover room, smaller
//! departments end up sharing halls with larger ones, which the interleaver
//! relies on.

use chrono::NaiveDate;
use std::cmp::Reverse;

use crate::config::AllocationConfig;
use crate::engine::AllocationError;
use crate::layout::BenchLayout;
use crate::models::{CapacityReport, ExamScheduleEntry, Hall, Student};
use crate::session::{resolve_session, SessionDepartment};
use crate::{log_changes, log_checks};

/// Students of one department assigned to one hall, roll-ordered.
#[derive(Debug, Clone)]
pub struct DepartmentGroup<'a> {
    pub department_code: &'a str,
    pub students: Vec<&'a Student>,
}

/// Groups assigned to one hall.
#[derive(Debug, Clone)]
pub struct HallPlan<'a> {
    pub hall: &'a Hall,
    pub layout: BenchLayout,
    /// Ordered by department code.
    pub groups: Vec<DepartmentGroup<'a>>,
}

impl HallPlan<'_> {
    pub fn student_count(&self) -> usize {
        self.groups.iter().map(|g| g.students.len()).sum()
    }
}

/// Index of the hall fitting `needed` most tightly, ties to the earliest hall.
fn best_fit(remaining: &[usize], needed: usize) -> Option<usize> {
    remaining
        .iter()
        .enumerate()
        .filter(|&(_, &room)| room >= needed)
        .min_by_key(|&(i, &room)| (room, i))
        .map(|(i, _)| i)
}

/// Index of the hall with the most room left, ties to the earliest hall.
fn most_room(remaining: &[usize]) -> Option<usize> {
    remaining
        .iter()
        .enumerate()
        .filter(|&(_, &room)| room > 0)
        .max_by_key(|&(i, &room)| (room, Reverse(i)))
        .map(|(i, _)| i)
}

/// Assign every student of `departments` to a hall.
///
/// `halls` must already be in processing order with validated layouts.
///
/// # Returns
/// * Plans for the halls that received students, in hall order
/// * `Err(AllocationError::CapacityExceeded)` if the halls cannot seat everyone
pub fn plan_halls<'a>(
    departments: &[SessionDepartment<'a>],
    halls: &[(&'a Hall, BenchLayout)],
    verbosity: u8,
) -> Result<Vec<HallPlan<'a>>, AllocationError> {
    let required: usize = departments.iter().map(|d| d.students.len()).sum();
    let available: usize = halls.iter().map(|(_, layout)| layout.capacity()).sum();
    if required > available {
        return Err(AllocationError::CapacityExceeded {
            required,
            available,
            shortfall: required - available,
        });
    }

    let mut order: Vec<&SessionDepartment<'a>> = departments.iter().collect();
    order.sort_by_key(|d| (Reverse(d.students.len()), d.code));

    let mut remaining: Vec<usize> = halls.iter().map(|(_, layout)| layout.capacity()).collect();
    let mut groups: Vec<Vec<DepartmentGroup<'a>>> = vec![Vec::new(); halls.len()];

    for department in order {
        let mut offset = 0;
        while offset < department.students.len() {
            let left = department.students.len() - offset;
            let (index, take) = match best_fit(&remaining, left) {
                Some(index) => (index, left),
                None => {
                    // Guarded by the total check above.
                    let index = most_room(&remaining).ok_or(AllocationError::CapacityExceeded {
                        required,
                        available,
                        shortfall: left,
                    })?;
                    log_checks!(
                        verbosity,
                        "No hall fits {} remaining {} students; splitting",
                        left,
                        department.code
                    );
                    (index, remaining[index])
                }
            };

            let chunk = department.students[offset..offset + take].to_vec();
            log_changes!(
                verbosity,
                "Hall {}: {} x {} ({} seats left)",
                halls[index].0.id,
                department.code,
                take,
                remaining[index] - take
            );
            remaining[index] -= take;
            offset += take;

            let hall_groups = &mut groups[index];
            match hall_groups
                .iter_mut()
                .find(|g| g.department_code == department.code)
            {
                Some(group) => group.students.extend(chunk),
                None => hall_groups.push(DepartmentGroup {
                    department_code: department.code,
                    students: chunk,
                }),
            }
        }
    }

    Ok(halls
        .iter()
        .zip(groups)
        .filter(|(_, groups)| !groups.is_empty())
        .map(|(&(hall, layout), mut groups)| {
            groups.sort_by_key(|g| g.department_code);
            HallPlan {
                hall,
                layout,
                groups,
            }
        })
        .collect())
}

/// Seat supply and demand for one date without allocating.
///
/// Unlike `allocate`, a shortfall is reported in the result rather than
/// raised. Halls whose layout is invalid are left out of the available seats.
pub fn capacity_report(
    exam_date: NaiveDate,
    entries: &[ExamScheduleEntry],
    students: &[Student],
    halls: &[Hall],
    config: &AllocationConfig,
) -> Result<CapacityReport, AllocationError> {
    let session = resolve_session(exam_date, entries, students, config)?;
    let total_students = session.total_students();

    let usable: Vec<usize> = halls
        .iter()
        .filter_map(|hall| BenchLayout::for_hall(hall, config).ok())
        .map(|layout| layout.capacity())
        .filter(|&capacity| capacity > 0)
        .collect();
    let available_seats: usize = usable.iter().sum();
    let halls_available = usable.len();

    let room_size = config.default_hall_capacity.max(1) as usize;
    let required_rooms = total_students.div_ceil(room_size);

    Ok(CapacityReport {
        exam_date,
        departments_count: session.departments.len(),
        total_students,
        available_seats,
        halls_available,
        required_rooms,
        rooms_needed: required_rooms.saturating_sub(halls_available),
        required_seats: total_students.saturating_sub(available_seats),
    })
}
