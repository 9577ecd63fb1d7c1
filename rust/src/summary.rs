//! Read-only views over a completed allocation.
//!
//! - Range summaries: per hall and department, the lowest and highest roll
//!   seated and how many, for the notice-board overall sheet.
//! - Rosters: per hall, students in roll order with their seats, for
//!   attendance sheets.
//! - Seating charts: the bench grid of each hall, for the classroom sheet.

use std::collections::BTreeMap;

use crate::layout::Seat;
use crate::models::{
    AllocationResult, Department, DepartmentRange, HallAssignment, HallRoster, OverallSheetData,
    OverallSheetRow, RosterEntry, RosterSheetData, SeatAssignment, SeatingChart,
};
use crate::roll::RollKey;

/// Roll span of every department in every hall, in hall order then
/// department code.
pub fn department_ranges(halls: &[HallAssignment]) -> Vec<DepartmentRange> {
    let mut ranges = Vec::new();
    for hall in halls {
        let mut by_department: BTreeMap<&str, Vec<&SeatAssignment>> = BTreeMap::new();
        for seat in &hall.seats {
            by_department
                .entry(seat.department_code.as_str())
                .or_default()
                .push(seat);
        }
        for (code, seats) in by_department {
            let first = seats.iter().min_by_key(|s| RollKey(&s.roll_number));
            let last = seats.iter().max_by_key(|s| RollKey(&s.roll_number));
            let (Some(first), Some(last)) = (first, last) else {
                continue;
            };
            ranges.push(DepartmentRange {
                hall_id: hall.hall_id.clone(),
                department_code: code.to_string(),
                subject_codes: first.subject_codes.clone(),
                first_roll: first.roll_number.clone(),
                last_roll: last.roll_number.clone(),
                count: seats.len(),
            });
        }
    }
    ranges
}

/// Per-hall listings in roll order, independent of the physical seating order.
pub fn build_rosters(halls: &[HallAssignment]) -> Vec<HallRoster> {
    halls
        .iter()
        .map(|hall| {
            let mut seats: Vec<&SeatAssignment> = hall.seats.iter().collect();
            seats.sort_by_key(|s| RollKey(&s.roll_number));
            HallRoster {
                hall_id: hall.hall_id.clone(),
                building_name: hall.building_name.clone(),
                floor: hall.floor.clone(),
                entries: seats
                    .into_iter()
                    .map(|s| RosterEntry {
                        roll_number: s.roll_number.clone(),
                        name: s.name.clone(),
                        department_code: s.department_code.clone(),
                        subject_codes: s.subject_codes.clone(),
                        position: s.position.clone(),
                    })
                    .collect(),
            }
        })
        .collect()
}

/// Project a result into the data behind the overall and attendance sheets.
///
/// `departments` only supplies display names; unknown codes get an empty name.
pub fn summarize(
    result: &AllocationResult,
    departments: &[Department],
) -> (OverallSheetData, RosterSheetData) {
    let names: BTreeMap<&str, &str> = departments
        .iter()
        .map(|d| (d.code.as_str(), d.name.as_str()))
        .collect();

    let rows = result
        .ranges
        .iter()
        .map(|range| {
            let hall = result.halls.iter().find(|h| h.hall_id == range.hall_id);
            OverallSheetRow {
                hall_id: range.hall_id.clone(),
                building_name: hall.map(|h| h.building_name.clone()).unwrap_or_default(),
                floor: hall.map(|h| h.floor.clone()).unwrap_or_default(),
                department_code: range.department_code.clone(),
                department_name: names
                    .get(range.department_code.as_str())
                    .map(|n| n.to_string())
                    .unwrap_or_default(),
                subject_codes: range.subject_codes.clone(),
                roll_range: range.label(),
                count: range.count,
            }
        })
        .collect();

    let overall = OverallSheetData {
        exam_date: result.exam_date,
        rows,
        total_students: result.total_seated(),
        halls_used: result.halls.len(),
    };
    let roster = RosterSheetData {
        exam_date: result.exam_date,
        halls: result.rosters.clone(),
    };
    (overall, roster)
}

/// Bench grid of every hall, one row of roll numbers per bench row.
///
/// Rows run up to the last occupied one; declared rows past it are not
/// materialised.
pub fn seating_charts(result: &AllocationResult) -> Vec<SeatingChart> {
    result.halls.iter().map(seating_chart).collect()
}

fn seating_chart(hall: &HallAssignment) -> SeatingChart {
    let bench_capacity = hall.bench_capacity as usize;
    let per_row = (hall.bench_columns as usize).saturating_mul(bench_capacity);
    let capacity = hall.capacity as usize;
    // Only seats inside the grid and within the hall's capacity get a cell.
    let cell = |seat: &SeatAssignment| {
        let Seat { row, bench, slot } = Seat::from(&seat.position);
        let column = bench as usize * bench_capacity + slot as usize;
        let index = (row as usize).saturating_mul(per_row).saturating_add(column);
        (row < hall.rows
            && bench < hall.bench_columns
            && (slot as usize) < bench_capacity
            && index < capacity)
            .then_some((row as usize, column))
    };

    let occupied_rows = hall
        .seats
        .iter()
        .filter_map(cell)
        .map(|(row, _)| row + 1)
        .max()
        .unwrap_or(0);
    let width = per_row.min(capacity);
    let mut rows = vec![vec![String::new(); width]; occupied_rows];
    for seat in &hall.seats {
        let Some((row, column)) = cell(seat) else {
            continue;
        };
        if let Some(slot) = rows[row].get_mut(column) {
            *slot = seat.roll_number.clone();
        }
    }

    SeatingChart {
        hall_id: hall.hall_id.clone(),
        bench_capacity: hall.bench_capacity,
        rows,
    }
}
