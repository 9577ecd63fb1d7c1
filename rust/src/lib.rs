//! Rust implementation of the exam seat allocation engine.
//!
//! Assigns examinees of one exam date to hall seats so that no two students of
//! the same department share a bench or sit on neighbouring benches, and
//! derives the notice-board ranges and attendance rosters from the seating.
//! Storage, spreadsheet import and document rendering stay with the caller.

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use chrono::NaiveDate;
use pyo3::prelude::*;

mod config;
pub mod engine;
pub mod interleave;
mod interner;
pub mod layout;
pub mod logging;
mod models;
pub mod planner;
pub mod roll;
pub mod session;
pub mod summary;
pub mod validation;

pub use config::AllocationConfig;
pub use engine::{allocate, hall_layouts, AllocationError};
pub use interleave::{interleave, Interleaving, SeatConflict};
pub use layout::{BenchLayout, LayoutError, Seat};
pub use models::{
    AdjacencyViolation, AllocationResult, CapacityReport, Department, DepartmentRange,
    ExamScheduleEntry, Hall, HallAssignment, HallRoster, OverallSheetData, OverallSheetRow,
    RosterEntry, RosterSheetData, SeatAssignment, SeatPosition, SeatingChart, Student,
};
pub use planner::{capacity_report, plan_halls, DepartmentGroup, HallPlan};
pub use roll::{compare_rolls, RollKey};
pub use session::{resolve_session, ExamSession, SessionDepartment};
pub use summary::{build_rosters, department_ranges, seating_charts, summarize};
pub use validation::check_assignment;

fn to_py_err(e: AllocationError) -> PyErr {
    pyo3::exceptions::PyValueError::new_err(e.to_string())
}

/// Allocate seats for every student sitting an exam on `exam_date`.
///
/// # Arguments
/// * `exam_date` - Date to allocate
/// * `schedule_entries` - Schedule entries (other dates are ignored)
/// * `students` - Full student roster
/// * `halls` - Available exam halls
/// * `config` - Optional AllocationConfig (defaults when omitted)
///
/// # Returns
/// * AllocationResult with seating, roll ranges, rosters and adjacency violations
///
/// # Raises
/// * ValueError on insufficient capacity, invalid hall layouts, duplicate roll
///   numbers or hall ids, or a date without schedule entries
#[pyfunction]
#[pyo3(name = "allocate", signature = (exam_date, schedule_entries, students, halls, config=None))]
fn py_allocate(
    py: Python<'_>,
    exam_date: NaiveDate,
    schedule_entries: Vec<ExamScheduleEntry>,
    students: Vec<Student>,
    halls: Vec<Hall>,
    config: Option<AllocationConfig>,
) -> PyResult<AllocationResult> {
    let config = config.unwrap_or_default();
    py.allow_threads(|| allocate(exam_date, &schedule_entries, &students, &halls, &config))
        .map_err(to_py_err)
}

/// Project an AllocationResult into overall-sheet and roster-sheet data.
///
/// # Arguments
/// * `result` - Result returned by `allocate`
/// * `departments` - Optional departments used to label the overall sheet
///
/// # Returns
/// * Tuple of (OverallSheetData, RosterSheetData)
#[pyfunction]
#[pyo3(name = "summarize", signature = (result, departments=None))]
fn py_summarize(
    result: PyRef<'_, AllocationResult>,
    departments: Option<Vec<Department>>,
) -> (OverallSheetData, RosterSheetData) {
    summarize(&result, &departments.unwrap_or_default())
}

/// Report seat supply and demand for `exam_date` without allocating.
///
/// # Raises
/// * ValueError on duplicate roll numbers or a date without schedule entries
#[pyfunction]
#[pyo3(name = "capacity_report", signature = (exam_date, schedule_entries, students, halls, config=None))]
fn py_capacity_report(
    exam_date: NaiveDate,
    schedule_entries: Vec<ExamScheduleEntry>,
    students: Vec<Student>,
    halls: Vec<Hall>,
    config: Option<AllocationConfig>,
) -> PyResult<CapacityReport> {
    let config = config.unwrap_or_default();
    capacity_report(exam_date, &schedule_entries, &students, &halls, &config).map_err(to_py_err)
}

/// Bench grids of every hall in `result` for the classroom seating sheet.
#[pyfunction]
#[pyo3(name = "seating_charts")]
fn py_seating_charts(result: PyRef<'_, AllocationResult>) -> Vec<SeatingChart> {
    seating_charts(&result)
}

/// Check `result` against the allocation invariants; returns the problems found.
#[pyfunction]
#[pyo3(name = "check_assignment")]
fn py_check_assignment(result: PyRef<'_, AllocationResult>) -> Vec<String> {
    check_assignment(&result)
}

/// The seatplan.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Input types
    m.add_class::<Student>()?;
    m.add_class::<Department>()?;
    m.add_class::<ExamScheduleEntry>()?;
    m.add_class::<Hall>()?;

    // Result types
    m.add_class::<SeatPosition>()?;
    m.add_class::<SeatAssignment>()?;
    m.add_class::<AdjacencyViolation>()?;
    m.add_class::<HallAssignment>()?;
    m.add_class::<DepartmentRange>()?;
    m.add_class::<RosterEntry>()?;
    m.add_class::<HallRoster>()?;
    m.add_class::<AllocationResult>()?;
    m.add_class::<OverallSheetRow>()?;
    m.add_class::<OverallSheetData>()?;
    m.add_class::<RosterSheetData>()?;
    m.add_class::<SeatingChart>()?;
    m.add_class::<CapacityReport>()?;

    // Config types
    m.add_class::<AllocationConfig>()?;

    // Operations
    m.add_function(wrap_pyfunction!(py_allocate, m)?)?;
    m.add_function(wrap_pyfunction!(py_summarize, m)?)?;
    m.add_function(wrap_pyfunction!(py_capacity_report, m)?)?;
    m.add_function(wrap_pyfunction!(py_seating_charts, m)?)?;
    m.add_function(wrap_pyfunction!(py_check_assignment, m)?)?;

    Ok(())
}
