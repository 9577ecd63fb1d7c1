//! Exam session resolution.
//!
//! Turns the schedule entries active on one date and the full roster into the
//! per-department student lists the planner works from.

use chrono::NaiveDate;
use rustc_hash::FxHashSet;
use std::collections::BTreeMap;

use crate::config::AllocationConfig;
use crate::engine::AllocationError;
use crate::models::{ExamScheduleEntry, Student};
use crate::roll::compare_rolls;
use crate::{log_changes, log_checks};

/// Students of one department sitting on the session date.
#[derive(Debug, Clone)]
pub struct SessionDepartment<'a> {
    pub code: &'a str,
    /// Subjects the department sits on this date, sorted and deduplicated.
    pub subject_codes: Vec<String>,
    /// Sorted by roll number ascending.
    pub students: Vec<&'a Student>,
}

/// Everything in scope for one exam date.
#[derive(Debug, Clone)]
pub struct ExamSession<'a> {
    pub exam_date: NaiveDate,
    /// Departments with at least one student, ordered by code.
    pub departments: Vec<SessionDepartment<'a>>,
    pub warnings: Vec<String>,
}

impl ExamSession<'_> {
    pub fn total_students(&self) -> usize {
        self.departments.iter().map(|d| d.students.len()).sum()
    }

    pub fn subject_codes(&self, department_code: &str) -> &[String] {
        self.departments
            .iter()
            .find(|d| d.code == department_code)
            .map(|d| d.subject_codes.as_slice())
            .unwrap_or(&[])
    }
}

/// Collect the students in scope for `exam_date`.
///
/// # Returns
/// * `Err(AllocationError::NoSchedules)` if no entry falls on the date
/// * `Err(AllocationError::DuplicateStudent)` if an in-scope roll number repeats
pub fn resolve_session<'a>(
    exam_date: NaiveDate,
    entries: &'a [ExamScheduleEntry],
    students: &'a [Student],
    config: &AllocationConfig,
) -> Result<ExamSession<'a>, AllocationError> {
    let active: Vec<&ExamScheduleEntry> =
        entries.iter().filter(|e| e.exam_date == exam_date).collect();
    if active.is_empty() {
        return Err(AllocationError::NoSchedules(exam_date));
    }

    let mut subjects: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for entry in &active {
        let codes = subjects.entry(entry.department_code.as_str()).or_default();
        if !codes.contains(&entry.subject_code) {
            codes.push(entry.subject_code.clone());
        }
    }

    let mut by_department: BTreeMap<&str, Vec<&Student>> = BTreeMap::new();
    let mut seen: FxHashSet<&str> = FxHashSet::default();
    for student in students {
        if !active.iter().any(|e| e.covers(student)) {
            continue;
        }
        if !seen.insert(student.roll_number.as_str()) {
            return Err(AllocationError::DuplicateStudent(
                student.roll_number.clone(),
            ));
        }
        by_department
            .entry(student.department_code.as_str())
            .or_default()
            .push(student);
    }

    let mut departments = Vec::with_capacity(subjects.len());
    for (code, mut subject_codes) in subjects {
        let Some(mut members) = by_department.remove(code) else {
            log_checks!(
                config.verbosity,
                "Department {} is scheduled on {} but has no students",
                code,
                exam_date
            );
            continue;
        };
        members.sort_by(|a, b| compare_rolls(&a.roll_number, &b.roll_number));
        subject_codes.sort();
        departments.push(SessionDepartment {
            code,
            subject_codes,
            students: members,
        });
    }

    let warnings = shared_subject_warnings(&active, exam_date, config);
    let session = ExamSession {
        exam_date,
        departments,
        warnings,
    };
    log_changes!(
        config.verbosity,
        "Session {}: {} departments, {} students",
        exam_date,
        session.departments.len(),
        session.total_students()
    );
    Ok(session)
}

/// Warn about subjects that many departments sit at once; such halls cannot
/// be kept free of the same paper.
fn shared_subject_warnings(
    active: &[&ExamScheduleEntry],
    exam_date: NaiveDate,
    config: &AllocationConfig,
) -> Vec<String> {
    let threshold = config.shared_subject_warning_threshold as usize;
    if threshold == 0 {
        return Vec::new();
    }
    let mut departments_by_subject: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for entry in active {
        let departments = departments_by_subject
            .entry(entry.subject_code.as_str())
            .or_default();
        if !departments.contains(&entry.department_code.as_str()) {
            departments.push(entry.department_code.as_str());
        }
    }
    departments_by_subject
        .into_iter()
        .filter(|(_, departments)| departments.len() >= threshold)
        .map(|(subject, mut departments)| {
            departments.sort_unstable();
            format!(
                "Subject {} is shared by {} departments on {} ({}); consider adjusting the timetable",
                subject,
                departments.len(),
                exam_date,
                departments.join(", ")
            )
        })
        .collect()
}
