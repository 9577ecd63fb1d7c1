//! Core data types for the seat allocation engine.
//!
//! Inputs (`Student`, `Department`, `ExamScheduleEntry`, `Hall`) are plain
//! records handed over by the storage layer. Outputs (`AllocationResult` and
//! the sheet projections) are plain records handed back for rendering.

use chrono::{NaiveDate, NaiveTime};
use pyo3::prelude::*;

/// An examinee.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Student {
    #[pyo3(get, set)]
    pub roll_number: String,
    #[pyo3(get, set)]
    pub name: String,
    #[pyo3(get, set)]
    pub department_code: String,
    #[pyo3(get, set)]
    pub academic_year: String,
}

#[pymethods]
impl Student {
    #[new]
    #[pyo3(signature = (roll_number, name, department_code, academic_year=String::new()))]
    pub fn new(
        roll_number: String,
        name: String,
        department_code: String,
        academic_year: String,
    ) -> Self {
        Self {
            roll_number,
            name,
            department_code,
            academic_year,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Student(roll_number={:?}, department_code={:?}, academic_year={:?})",
            self.roll_number, self.department_code, self.academic_year
        )
    }
}

/// An academic department. Only used to label summaries.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Department {
    #[pyo3(get, set)]
    pub code: String,
    #[pyo3(get, set)]
    pub name: String,
    #[pyo3(get, set)]
    pub enrolled_count: u32,
}

#[pymethods]
impl Department {
    #[new]
    #[pyo3(signature = (code, name, enrolled_count=0))]
    pub fn new(code: String, name: String, enrolled_count: u32) -> Self {
        Self {
            code,
            name,
            enrolled_count,
        }
    }

    fn __repr__(&self) -> String {
        format!("Department(code={:?}, name={:?})", self.code, self.name)
    }
}

/// One department sitting one subject in one time window.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExamScheduleEntry {
    #[pyo3(get, set)]
    pub department_code: String,
    #[pyo3(get, set)]
    pub subject_code: String,
    #[pyo3(get, set)]
    pub exam_date: NaiveDate,
    #[pyo3(get, set)]
    pub start_time: NaiveTime,
    #[pyo3(get, set)]
    pub end_time: NaiveTime,
    /// Restricts the entry to one batch; `None` covers every batch.
    #[pyo3(get, set)]
    pub academic_year: Option<String>,
}

#[pymethods]
impl ExamScheduleEntry {
    #[new]
    #[pyo3(signature = (department_code, subject_code, exam_date, start_time, end_time, academic_year=None))]
    pub fn new(
        department_code: String,
        subject_code: String,
        exam_date: NaiveDate,
        start_time: NaiveTime,
        end_time: NaiveTime,
        academic_year: Option<String>,
    ) -> Self {
        Self {
            department_code,
            subject_code,
            exam_date,
            start_time,
            end_time,
            academic_year,
        }
    }

    /// Whether this entry puts `student` in the exam room.
    pub fn covers(&self, student: &Student) -> bool {
        self.department_code == student.department_code
            && self
                .academic_year
                .as_ref()
                .map_or(true, |year| *year == student.academic_year)
    }

    fn __repr__(&self) -> String {
        format!(
            "ExamScheduleEntry(department_code={:?}, subject_code={:?}, exam_date={}, {}-{})",
            self.department_code, self.subject_code, self.exam_date, self.start_time, self.end_time
        )
    }
}

/// An examination hall.
///
/// `rows` and `bench_columns` describe the bench grid; when both are absent the
/// grid is derived from `capacity` and the run's configuration.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Hall {
    #[pyo3(get, set)]
    pub id: String,
    #[pyo3(get, set)]
    pub capacity: u32,
    #[pyo3(get, set)]
    pub building_name: String,
    #[pyo3(get, set)]
    pub floor: String,
    #[pyo3(get, set)]
    pub bench_capacity: Option<u32>,
    #[pyo3(get, set)]
    pub rows: Option<u32>,
    #[pyo3(get, set)]
    pub bench_columns: Option<u32>,
}

#[pymethods]
impl Hall {
    #[new]
    #[pyo3(signature = (
        id,
        capacity,
        building_name=String::new(),
        floor=String::new(),
        bench_capacity=None,
        rows=None,
        bench_columns=None
    ))]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: String,
        capacity: u32,
        building_name: String,
        floor: String,
        bench_capacity: Option<u32>,
        rows: Option<u32>,
        bench_columns: Option<u32>,
    ) -> Self {
        Self {
            id,
            capacity,
            building_name,
            floor,
            bench_capacity,
            rows,
            bench_columns,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Hall(id={:?}, capacity={}, rows={:?}, bench_columns={:?}, bench_capacity={:?})",
            self.id, self.capacity, self.rows, self.bench_columns, self.bench_capacity
        )
    }
}

/// A single physical seat. All indices are zero-based.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SeatPosition {
    #[pyo3(get)]
    pub hall_id: String,
    #[pyo3(get)]
    pub row_index: u32,
    #[pyo3(get)]
    pub bench_index: u32,
    #[pyo3(get)]
    pub slot_index: u32,
}

#[pymethods]
impl SeatPosition {
    #[new]
    pub fn new(hall_id: String, row_index: u32, bench_index: u32, slot_index: u32) -> Self {
        Self {
            hall_id,
            row_index,
            bench_index,
            slot_index,
        }
    }

    /// One-based label printed on sheets, e.g. `R2-B1-S2`.
    pub fn label(&self) -> String {
        format!(
            "R{}-B{}-S{}",
            self.row_index + 1,
            self.bench_index + 1,
            self.slot_index + 1
        )
    }

    fn __repr__(&self) -> String {
        format!("SeatPosition(hall_id={:?}, {})", self.hall_id, self.label())
    }
}

/// A student seated at a position.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeatAssignment {
    #[pyo3(get)]
    pub position: SeatPosition,
    #[pyo3(get)]
    pub roll_number: String,
    #[pyo3(get)]
    pub name: String,
    #[pyo3(get)]
    pub department_code: String,
    #[pyo3(get)]
    pub subject_codes: Vec<String>,
}

#[pymethods]
impl SeatAssignment {
    fn __repr__(&self) -> String {
        format!(
            "SeatAssignment({} -> {:?} [{}])",
            self.position.label(),
            self.roll_number,
            self.department_code
        )
    }
}

/// A seat where the adjacency constraint had to be relaxed.
///
/// `conflicting` lists the already-filled adjacent seats holding the same
/// department.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdjacencyViolation {
    #[pyo3(get)]
    pub position: SeatPosition,
    #[pyo3(get)]
    pub department_code: String,
    #[pyo3(get)]
    pub conflicting: Vec<SeatPosition>,
}

#[pymethods]
impl AdjacencyViolation {
    fn __repr__(&self) -> String {
        format!(
            "AdjacencyViolation({} [{}], conflicts={})",
            self.position.label(),
            self.department_code,
            self.conflicting.len()
        )
    }
}

/// The completed seating of one hall.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HallAssignment {
    #[pyo3(get)]
    pub hall_id: String,
    #[pyo3(get)]
    pub building_name: String,
    #[pyo3(get)]
    pub floor: String,
    #[pyo3(get)]
    pub capacity: u32,
    #[pyo3(get)]
    pub rows: u32,
    #[pyo3(get)]
    pub bench_columns: u32,
    #[pyo3(get)]
    pub bench_capacity: u32,
    /// Seats in traversal order.
    #[pyo3(get)]
    pub seats: Vec<SeatAssignment>,
    #[pyo3(get)]
    pub violations: Vec<AdjacencyViolation>,
}

#[pymethods]
impl HallAssignment {
    pub fn is_conflict_free(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn seated_count(&self) -> usize {
        self.seats.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "HallAssignment(hall_id={:?}, seated={}/{}, violations={})",
            self.hall_id,
            self.seats.len(),
            self.capacity,
            self.violations.len()
        )
    }
}

/// Span of roll numbers one department occupies in one hall.
///
/// `first_roll`/`last_roll` are the minimum and maximum seated; the span is
/// not guaranteed to be contiguous.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepartmentRange {
    #[pyo3(get)]
    pub hall_id: String,
    #[pyo3(get)]
    pub department_code: String,
    #[pyo3(get)]
    pub subject_codes: Vec<String>,
    #[pyo3(get)]
    pub first_roll: String,
    #[pyo3(get)]
    pub last_roll: String,
    #[pyo3(get)]
    pub count: usize,
}

#[pymethods]
impl DepartmentRange {
    /// Notice-board form: `"A - B"`, or just `"A"` for a single student.
    pub fn label(&self) -> String {
        if self.count > 1 {
            format!("{} - {}", self.first_roll, self.last_roll)
        } else {
            self.first_roll.clone()
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "DepartmentRange(hall_id={:?}, department_code={:?}, {}, count={})",
            self.hall_id,
            self.department_code,
            self.label(),
            self.count
        )
    }
}

/// One line of an attendance sheet.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RosterEntry {
    #[pyo3(get)]
    pub roll_number: String,
    #[pyo3(get)]
    pub name: String,
    #[pyo3(get)]
    pub department_code: String,
    #[pyo3(get)]
    pub subject_codes: Vec<String>,
    #[pyo3(get)]
    pub position: SeatPosition,
}

#[pymethods]
impl RosterEntry {
    pub fn seat_label(&self) -> String {
        self.position.label()
    }

    fn __repr__(&self) -> String {
        format!(
            "RosterEntry({:?} at {})",
            self.roll_number,
            self.position.label()
        )
    }
}

/// Roll-ordered listing of one hall.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HallRoster {
    #[pyo3(get)]
    pub hall_id: String,
    #[pyo3(get)]
    pub building_name: String,
    #[pyo3(get)]
    pub floor: String,
    #[pyo3(get)]
    pub entries: Vec<RosterEntry>,
}

#[pymethods]
impl HallRoster {
    fn __repr__(&self) -> String {
        format!(
            "HallRoster(hall_id={:?}, entries={})",
            self.hall_id,
            self.entries.len()
        )
    }
}

/// Output of one allocation run.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocationResult {
    #[pyo3(get)]
    pub exam_date: NaiveDate,
    /// Used halls in hall order.
    #[pyo3(get)]
    pub halls: Vec<HallAssignment>,
    #[pyo3(get)]
    pub ranges: Vec<DepartmentRange>,
    #[pyo3(get)]
    pub rosters: Vec<HallRoster>,
    /// Advisory notes for the operator; never affect the seating.
    #[pyo3(get)]
    pub warnings: Vec<String>,
}

#[pymethods]
impl AllocationResult {
    pub fn total_seated(&self) -> usize {
        self.halls.iter().map(|h| h.seats.len()).sum()
    }

    pub fn violation_count(&self) -> usize {
        self.halls.iter().map(|h| h.violations.len()).sum()
    }

    /// Every relaxed seat across all halls.
    pub fn violations(&self) -> Vec<AdjacencyViolation> {
        self.halls
            .iter()
            .flat_map(|h| h.violations.iter().cloned())
            .collect()
    }

    fn __repr__(&self) -> String {
        format!(
            "AllocationResult(exam_date={}, halls={}, seated={}, violations={})",
            self.exam_date,
            self.halls.len(),
            self.total_seated(),
            self.violation_count()
        )
    }
}

/// One row of the notice-board overall sheet.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverallSheetRow {
    #[pyo3(get)]
    pub hall_id: String,
    #[pyo3(get)]
    pub building_name: String,
    #[pyo3(get)]
    pub floor: String,
    #[pyo3(get)]
    pub department_code: String,
    #[pyo3(get)]
    pub department_name: String,
    #[pyo3(get)]
    pub subject_codes: Vec<String>,
    #[pyo3(get)]
    pub roll_range: String,
    #[pyo3(get)]
    pub count: usize,
}

#[pymethods]
impl OverallSheetRow {
    fn __repr__(&self) -> String {
        format!(
            "OverallSheetRow(hall_id={:?}, department_code={:?}, roll_range={:?}, count={})",
            self.hall_id, self.department_code, self.roll_range, self.count
        )
    }
}

/// Data behind the notice-board overall sheet.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OverallSheetData {
    #[pyo3(get)]
    pub exam_date: NaiveDate,
    #[pyo3(get)]
    pub rows: Vec<OverallSheetRow>,
    #[pyo3(get)]
    pub total_students: usize,
    #[pyo3(get)]
    pub halls_used: usize,
}

#[pymethods]
impl OverallSheetData {
    fn __repr__(&self) -> String {
        format!(
            "OverallSheetData(exam_date={}, rows={}, total_students={})",
            self.exam_date,
            self.rows.len(),
            self.total_students
        )
    }
}

/// Data behind the per-hall attendance sheets.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RosterSheetData {
    #[pyo3(get)]
    pub exam_date: NaiveDate,
    #[pyo3(get)]
    pub halls: Vec<HallRoster>,
}

#[pymethods]
impl RosterSheetData {
    fn __repr__(&self) -> String {
        format!(
            "RosterSheetData(exam_date={}, halls={})",
            self.exam_date,
            self.halls.len()
        )
    }
}

/// Bench grid of one hall for the classroom seating sheet.
///
/// `rows[r]` holds one entry per position in that row, bench by bench; vacant
/// positions are empty strings.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SeatingChart {
    #[pyo3(get)]
    pub hall_id: String,
    #[pyo3(get)]
    pub bench_capacity: u32,
    #[pyo3(get)]
    pub rows: Vec<Vec<String>>,
}

#[pymethods]
impl SeatingChart {
    fn __repr__(&self) -> String {
        format!(
            "SeatingChart(hall_id={:?}, rows={})",
            self.hall_id,
            self.rows.len()
        )
    }
}

/// Seat supply versus demand for one exam date, shown before allocating.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CapacityReport {
    #[pyo3(get)]
    pub exam_date: NaiveDate,
    #[pyo3(get)]
    pub departments_count: usize,
    #[pyo3(get)]
    pub total_students: usize,
    #[pyo3(get)]
    pub available_seats: usize,
    #[pyo3(get)]
    pub halls_available: usize,
    /// Rooms needed at the default hall size.
    #[pyo3(get)]
    pub required_rooms: usize,
    #[pyo3(get)]
    pub rooms_needed: usize,
    /// Seats still missing; zero when the halls suffice.
    #[pyo3(get)]
    pub required_seats: usize,
}

#[pymethods]
impl CapacityReport {
    pub fn is_sufficient(&self) -> bool {
        self.required_seats == 0
    }

    fn __repr__(&self) -> String {
        format!(
            "CapacityReport(exam_date={}, students={}, seats={}, shortfall={})",
            self.exam_date, self.total_students, self.available_seats, self.required_seats
        )
    }
}
