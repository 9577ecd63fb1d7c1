//! The allocation pipeline.
//!
//! `allocate` is a pure function of its inputs: it resolves the session,
//! validates every hall layout up front, plans halls, interleaves each hall
//! and derives the summaries. Nothing is kept between runs, so independent
//! dates can be allocated in parallel.

use chrono::NaiveDate;
use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::config::AllocationConfig;
use crate::interleave::interleave;
use crate::layout::{BenchLayout, LayoutError};
use crate::models::{
    AdjacencyViolation, AllocationResult, ExamScheduleEntry, Hall, HallAssignment, SeatAssignment,
    Student,
};
use crate::planner::{plan_halls, HallPlan};
use crate::roll::compare_rolls;
use crate::session::{resolve_session, ExamSession};
use crate::summary::{build_rosters, department_ranges};
use crate::log_changes;

/// Errors that abort an allocation run.
///
/// Adjacency relaxations are not errors; they are carried in the result.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AllocationError {
    #[error("Not enough seats: {required} students but {available} seats; {shortfall} more seat(s) needed")]
    CapacityExceeded {
        required: usize,
        available: usize,
        shortfall: usize,
    },
    #[error("Invalid layout for hall {hall_id}: {source}")]
    InvalidLayout {
        hall_id: String,
        #[source]
        source: LayoutError,
    },
    #[error("Duplicate roll number: {0}")]
    DuplicateStudent(String),
    #[error("Duplicate hall id: {0}")]
    DuplicateHall(String),
    #[error("No exam scheduled on {0}")]
    NoSchedules(NaiveDate),
}

impl AllocationError {
    fn layout(hall: &Hall, source: LayoutError) -> Self {
        AllocationError::InvalidLayout {
            hall_id: hall.id.clone(),
            source,
        }
    }
}

/// Validate every hall and return them in processing order (by hall id, roll
/// style, so "H2" precedes "H10").
pub fn hall_layouts<'a>(
    halls: &'a [Hall],
    config: &AllocationConfig,
) -> Result<Vec<(&'a Hall, BenchLayout)>, AllocationError> {
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    let mut layouts = Vec::with_capacity(halls.len());
    for hall in halls {
        if !seen.insert(hall.id.as_str()) {
            return Err(AllocationError::DuplicateHall(hall.id.clone()));
        }
        let layout =
            BenchLayout::for_hall(hall, config).map_err(|e| AllocationError::layout(hall, e))?;
        layouts.push((hall, layout));
    }
    layouts.sort_by(|(a, _), (b, _)| compare_rolls(&a.id, &b.id));
    Ok(layouts)
}

fn seat_hall(
    plan: &HallPlan<'_>,
    session: &ExamSession<'_>,
    verbosity: u8,
) -> Result<HallAssignment, AllocationError> {
    let hall = plan.hall;
    let seating =
        interleave(&plan.groups, &plan.layout, verbosity).map_err(|e| AllocationError::layout(hall, e))?;

    let seats = seating
        .placements
        .iter()
        .map(|(seat, student)| SeatAssignment {
            position: seat.in_hall(&hall.id),
            roll_number: student.roll_number.clone(),
            name: student.name.clone(),
            department_code: student.department_code.clone(),
            subject_codes: session.subject_codes(&student.department_code).to_vec(),
        })
        .collect();

    let violations: Vec<AdjacencyViolation> = seating
        .conflicts
        .into_iter()
        .map(|conflict| AdjacencyViolation {
            position: conflict.seat.in_hall(&hall.id),
            department_code: conflict.department_code,
            conflicting: conflict
                .neighbors
                .iter()
                .map(|n| n.in_hall(&hall.id))
                .collect(),
        })
        .collect();

    if !violations.is_empty() {
        log_changes!(
            verbosity,
            "Hall {}: {} seat(s) share a department with a neighbour",
            hall.id,
            violations.len()
        );
    }

    Ok(HallAssignment {
        hall_id: hall.id.clone(),
        building_name: hall.building_name.clone(),
        floor: hall.floor.clone(),
        capacity: hall.capacity,
        rows: plan.layout.rows(),
        bench_columns: plan.layout.bench_columns(),
        bench_capacity: plan.layout.bench_capacity(),
        seats,
        violations,
    })
}

/// Allocate seats for every student sitting an exam on `exam_date`.
///
/// # Arguments
/// * `exam_date` - Date whose schedule entries are in scope
/// * `entries` - Schedule entries; those on other dates are ignored
/// * `students` - Full roster; students outside the session are ignored
/// * `halls` - Available halls
/// * `config` - Layout defaults and verbosity
///
/// # Returns
/// * `Ok(AllocationResult)` with seating, ranges, rosters and any adjacency
///   relaxations
/// * `Err(AllocationError)` on structural problems; nothing is partially
///   allocated
pub fn allocate(
    exam_date: NaiveDate,
    entries: &[ExamScheduleEntry],
    students: &[Student],
    halls: &[Hall],
    config: &AllocationConfig,
) -> Result<AllocationResult, AllocationError> {
    let session = resolve_session(exam_date, entries, students, config)?;
    let layouts = hall_layouts(halls, config)?;
    let plans = plan_halls(&session.departments, &layouts, config.verbosity)?;

    let assignments = plans
        .iter()
        .map(|plan| seat_hall(plan, &session, config.verbosity))
        .collect::<Result<Vec<_>, _>>()?;

    let result = AllocationResult {
        exam_date,
        ranges: department_ranges(&assignments),
        rosters: build_rosters(&assignments),
        halls: assignments,
        warnings: session.warnings,
    };
    log_changes!(
        config.verbosity,
        "Allocated {} students to {} halls on {} ({} adjacency relaxations)",
        result.total_seated(),
        result.halls.len(),
        exam_date,
        result.violation_count()
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn make_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 10).unwrap()
    }

    fn make_entry(dept: &str, subject: &str) -> ExamScheduleEntry {
        ExamScheduleEntry {
            department_code: dept.to_string(),
            subject_code: subject.to_string(),
            exam_date: make_date(),
            start_time: NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(13, 0, 0).unwrap(),
            academic_year: None,
        }
    }

    fn make_students(dept: &str, count: usize, start: usize) -> Vec<Student> {
        (0..count)
            .map(|i| Student {
                roll_number: (start + i).to_string(),
                name: format!("{} {}", dept, start + i),
                department_code: dept.to_string(),
                academic_year: String::new(),
            })
            .collect()
    }

    fn make_hall(id: &str, capacity: u32) -> Hall {
        Hall {
            id: id.to_string(),
            capacity,
            building_name: "Main".to_string(),
            floor: "1".to_string(),
            bench_capacity: None,
            rows: None,
            bench_columns: None,
        }
    }

    #[test]
    fn test_two_by_one_hall_interleaves() {
        let entries = vec![make_entry("A", "S1"), make_entry("B", "S2")];
        let mut students = make_students("A", 2, 1);
        students.extend(make_students("B", 2, 11));
        let mut hall = make_hall("H1", 4);
        hall.rows = Some(2);
        hall.bench_columns = Some(1);
        hall.bench_capacity = Some(2);

        let result = allocate(
            make_date(),
            &entries,
            &students,
            &[hall],
            &AllocationConfig::default(),
        )
        .unwrap();

        assert_eq!(result.total_seated(), 4);
        assert_eq!(result.violation_count(), 0);
        let seats = &result.halls[0].seats;
        assert_ne!(seats[0].department_code, seats[1].department_code);
        assert_ne!(seats[2].department_code, seats[3].department_code);
        assert_eq!(seats[0].subject_codes, vec!["S1".to_string()]);
    }

    #[test]
    fn test_single_department_hall_reports_violations() {
        let entries = vec![make_entry("A", "S1")];
        let students = make_students("A", 4, 1);
        let mut hall = make_hall("H1", 4);
        hall.rows = Some(2);
        hall.bench_columns = Some(1);

        let result = allocate(
            make_date(),
            &entries,
            &students,
            &[hall],
            &AllocationConfig::default(),
        )
        .unwrap();

        assert_eq!(result.violation_count(), 2);
        let violation = &result.halls[0].violations[0];
        assert_eq!(violation.position.hall_id, "H1");
        assert_eq!(violation.position.slot_index, 1);
        assert_eq!(violation.conflicting.len(), 1);
    }

    #[test]
    fn test_capacity_exceeded() {
        let entries = vec![make_entry("A", "S1")];
        let students = make_students("A", 50, 1);
        let result = allocate(
            make_date(),
            &entries,
            &students,
            &[make_hall("H1", 45)],
            &AllocationConfig::default(),
        );
        assert_eq!(
            result,
            Err(AllocationError::CapacityExceeded {
                required: 50,
                available: 45,
                shortfall: 5
            })
        );
        let message = result.unwrap_err().to_string();
        assert!(message.contains("5 more seat(s)"));
    }

    #[test]
    fn test_invalid_layout_fails_before_allocation() {
        let entries = vec![make_entry("A", "S1")];
        let students = make_students("A", 2, 1);
        let mut bad = make_hall("H2", 10);
        bad.rows = Some(2);
        bad.bench_columns = Some(2);
        bad.bench_capacity = Some(2);

        let result = allocate(
            make_date(),
            &entries,
            &students,
            &[make_hall("H1", 10), bad],
            &AllocationConfig::default(),
        );
        match result {
            Err(AllocationError::InvalidLayout { hall_id, source }) => {
                assert_eq!(hall_id, "H2");
                assert!(matches!(source, LayoutError::TooSmall { .. }));
            }
            other => panic!("expected InvalidLayout, got {:?}", other),
        }
    }

    #[test]
    fn test_oversized_hall_is_invalid_layout() {
        let entries = vec![make_entry("A", "S1")];
        let students = make_students("A", 2, 1);
        let mut huge = make_hall("H9", 10);
        huge.rows = Some(u32::MAX);
        huge.bench_columns = Some(u32::MAX);
        huge.bench_capacity = Some(u32::MAX);

        let result = allocate(
            make_date(),
            &entries,
            &students,
            &[huge],
            &AllocationConfig::default(),
        );
        assert!(matches!(
            result,
            Err(AllocationError::InvalidLayout {
                source: LayoutError::TooLarge { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_duplicate_hall() {
        let entries = vec![make_entry("A", "S1")];
        let students = make_students("A", 2, 1);
        let result = allocate(
            make_date(),
            &entries,
            &students,
            &[make_hall("H1", 10), make_hall("H1", 10)],
            &AllocationConfig::default(),
        );
        assert_eq!(result, Err(AllocationError::DuplicateHall("H1".to_string())));
    }

    #[test]
    fn test_halls_processed_in_id_order() {
        let config = AllocationConfig::default();
        let halls = vec![make_hall("H10", 4), make_hall("H2", 4), make_hall("H1", 4)];
        let ordered: Vec<&str> = hall_layouts(&halls, &config)
            .unwrap()
            .iter()
            .map(|(h, _)| h.id.as_str())
            .collect();
        assert_eq!(ordered, vec!["H1", "H2", "H10"]);
    }

    #[test]
    fn test_allocate_is_deterministic() {
        let entries = vec![make_entry("A", "S1"), make_entry("B", "S2"), make_entry("C", "S3")];
        let mut students = make_students("A", 31, 1);
        students.extend(make_students("B", 17, 101));
        students.extend(make_students("C", 9, 201));
        let halls = vec![make_hall("H1", 30), make_hall("H2", 30)];
        let config = AllocationConfig::default();

        let first = allocate(make_date(), &entries, &students, &halls, &config).unwrap();
        let second = allocate(make_date(), &entries, &students, &halls, &config).unwrap();
        assert_eq!(first, second);
        assert_eq!(format!("{:?}", first), format!("{:?}", second));
        assert_eq!(first.total_seated(), 57);
    }

    #[test]
    fn test_no_students_yields_empty_result() {
        let entries = vec![make_entry("A", "S1")];
        let result = allocate(
            make_date(),
            &entries,
            &[],
            &[make_hall("H1", 10)],
            &AllocationConfig::default(),
        )
        .unwrap();
        assert!(result.halls.is_empty());
        assert!(result.ranges.is_empty());
        assert_eq!(result.total_seated(), 0);
    }
}
