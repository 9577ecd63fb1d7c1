//! Bench layout geometry.
//!
//! A hall is a grid of `rows x bench_columns` benches, each holding
//! `bench_capacity` positions. Seats are enumerated row-major, then bench,
//! then slot. Only the first `capacity` seats of that traversal are usable.
//!
//! Two seats are adjacent when they share a bench, or sit on benches that are
//! immediately left or right of each other in the same row. Rows are separated
//! by an aisle-equivalent gap, so neither cross-row nor diagonal seats count.

use thiserror::Error;

use crate::config::AllocationConfig;
use crate::models::{Hall, SeatPosition};

/// Errors raised when a hall's declared shape cannot hold its capacity.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("layout dimension {0} must be positive")]
    ZeroDimension(&'static str),
    #[error("{rows} rows x {bench_columns} benches x {bench_capacity} seats = {positions} positions, below capacity {capacity}")]
    TooSmall {
        rows: u32,
        bench_columns: u32,
        bench_capacity: u32,
        positions: usize,
        capacity: usize,
    },
    #[error("{rows} rows x {bench_columns} benches x {bench_capacity} seats is too large to address")]
    TooLarge {
        rows: u32,
        bench_columns: u32,
        bench_capacity: u32,
    },
    #[error("rows and bench_columns must be given together")]
    PartialShape,
    #[error("{students} students do not fit in {capacity} seats")]
    Overfilled { students: usize, capacity: usize },
}

/// Position of a seat within one hall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Seat {
    pub row: u32,
    pub bench: u32,
    pub slot: u32,
}

impl Seat {
    pub fn new(row: u32, bench: u32, slot: u32) -> Self {
        Self { row, bench, slot }
    }

    /// Attach the hall id to produce a boundary `SeatPosition`.
    pub fn in_hall(&self, hall_id: &str) -> SeatPosition {
        SeatPosition::new(hall_id.to_string(), self.row, self.bench, self.slot)
    }
}

impl From<&SeatPosition> for Seat {
    fn from(position: &SeatPosition) -> Self {
        Seat::new(position.row_index, position.bench_index, position.slot_index)
    }
}

/// Immutable seating geometry of one hall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchLayout {
    rows: u32,
    bench_columns: u32,
    bench_capacity: u32,
    capacity: usize,
}

impl BenchLayout {
    /// Build a layout, checking that the grid can hold `capacity` seats.
    pub fn new(
        rows: u32,
        bench_columns: u32,
        bench_capacity: u32,
        capacity: usize,
    ) -> Result<Self, LayoutError> {
        if rows == 0 {
            return Err(LayoutError::ZeroDimension("rows"));
        }
        if bench_columns == 0 {
            return Err(LayoutError::ZeroDimension("bench_columns"));
        }
        if bench_capacity == 0 {
            return Err(LayoutError::ZeroDimension("bench_capacity"));
        }
        let positions = (rows as usize)
            .checked_mul(bench_columns as usize)
            .and_then(|p| p.checked_mul(bench_capacity as usize))
            .ok_or(LayoutError::TooLarge {
                rows,
                bench_columns,
                bench_capacity,
            })?;
        if positions < capacity {
            return Err(LayoutError::TooSmall {
                rows,
                bench_columns,
                bench_capacity,
                positions,
                capacity,
            });
        }
        Ok(Self {
            rows,
            bench_columns,
            bench_capacity,
            capacity,
        })
    }

    /// Layout for a hall, deriving the grid from its capacity when the hall
    /// does not declare one.
    pub fn for_hall(hall: &Hall, config: &AllocationConfig) -> Result<Self, LayoutError> {
        let bench_capacity = hall.bench_capacity.unwrap_or(config.bench_capacity);
        let capacity = hall.capacity as usize;
        match (hall.rows, hall.bench_columns) {
            (Some(rows), Some(columns)) => Self::new(rows, columns, bench_capacity, capacity),
            (None, None) => {
                if bench_capacity == 0 {
                    return Err(LayoutError::ZeroDimension("bench_capacity"));
                }
                if config.bench_columns == 0 {
                    return Err(LayoutError::ZeroDimension("bench_columns"));
                }
                let per_row = (config.bench_columns as usize)
                    .checked_mul(bench_capacity as usize)
                    .ok_or(LayoutError::TooLarge {
                        rows: 1,
                        bench_columns: config.bench_columns,
                        bench_capacity,
                    })?;
                let rows = capacity.div_ceil(per_row).max(1);
                let rows = u32::try_from(rows).map_err(|_| LayoutError::TooLarge {
                    rows: u32::MAX,
                    bench_columns: config.bench_columns,
                    bench_capacity,
                })?;
                Self::new(rows, config.bench_columns, bench_capacity, capacity)
            }
            _ => Err(LayoutError::PartialShape),
        }
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    pub fn bench_columns(&self) -> u32 {
        self.bench_columns
    }

    pub fn bench_capacity(&self) -> u32 {
        self.bench_capacity
    }

    /// Number of usable seats.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of physical positions in the grid (may exceed capacity).
    /// `new` guarantees the product fits in `usize`.
    pub fn total_positions(&self) -> usize {
        self.rows as usize * self.bench_columns as usize * self.bench_capacity as usize
    }

    /// Usable seat at a traversal index.
    pub fn seat_at(&self, index: usize) -> Option<Seat> {
        if index >= self.capacity {
            return None;
        }
        let per_bench = self.bench_capacity as usize;
        let per_row = self.bench_columns as usize * per_bench;
        Some(Seat {
            row: (index / per_row) as u32,
            bench: ((index % per_row) / per_bench) as u32,
            slot: (index % per_bench) as u32,
        })
    }

    /// Traversal index of a usable seat.
    pub fn index_of(&self, seat: Seat) -> Option<usize> {
        if seat.row >= self.rows
            || seat.bench >= self.bench_columns
            || seat.slot >= self.bench_capacity
        {
            return None;
        }
        let index = (seat.row as usize * self.bench_columns as usize + seat.bench as usize)
            * self.bench_capacity as usize
            + seat.slot as usize;
        (index < self.capacity).then_some(index)
    }

    /// Usable seats in traversal order.
    pub fn seats(&self) -> impl Iterator<Item = Seat> + '_ {
        (0..self.capacity).filter_map(move |i| self.seat_at(i))
    }

    pub fn is_adjacent(&self, a: Seat, b: Seat) -> bool {
        a != b && a.row == b.row && a.bench.abs_diff(b.bench) <= 1
    }

    /// Usable seats adjacent to `seat`.
    pub fn neighbors(&self, seat: Seat) -> impl Iterator<Item = Seat> + '_ {
        let first_bench = seat.bench.saturating_sub(1);
        let last_bench = seat
            .bench
            .saturating_add(1)
            .min(self.bench_columns.saturating_sub(1));
        (first_bench..=last_bench)
            .flat_map(move |bench| {
                (0..self.bench_capacity).map(move |slot| Seat::new(seat.row, bench, slot))
            })
            .filter(move |&other| other != seat && self.index_of(other).is_some())
    }
}
