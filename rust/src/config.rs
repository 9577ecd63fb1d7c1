//! Configuration for an allocation run.

use pyo3::prelude::*;

/// Tunables shared by every stage of one allocation run.
#[pyclass]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AllocationConfig {
    /// Positions per bench for halls that do not declare their own
    #[pyo3(get, set)]
    pub bench_capacity: u32,
    /// Bench-columns per row for halls without an explicit layout
    #[pyo3(get, set)]
    pub bench_columns: u32,
    /// Room size used to estimate how many rooms a date needs
    #[pyo3(get, set)]
    pub default_hall_capacity: u32,
    /// Departments sharing one subject on a date before a warning is raised
    #[pyo3(get, set)]
    pub shared_subject_warning_threshold: u32,
    /// Verbosity level: 0=silent, 1=changes, 2=checks, 3=debug
    #[pyo3(get, set)]
    pub verbosity: u8,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            bench_capacity: 2,
            bench_columns: 1,
            default_hall_capacity: 45,
            shared_subject_warning_threshold: 3,
            verbosity: 0,
        }
    }
}

#[pymethods]
impl AllocationConfig {
    #[new]
    #[pyo3(signature = (
        bench_capacity=None,
        bench_columns=None,
        default_hall_capacity=None,
        shared_subject_warning_threshold=None,
        verbosity=None
    ))]
    fn new(
        bench_capacity: Option<u32>,
        bench_columns: Option<u32>,
        default_hall_capacity: Option<u32>,
        shared_subject_warning_threshold: Option<u32>,
        verbosity: Option<u8>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            bench_capacity: bench_capacity.unwrap_or(defaults.bench_capacity),
            bench_columns: bench_columns.unwrap_or(defaults.bench_columns),
            default_hall_capacity: default_hall_capacity.unwrap_or(defaults.default_hall_capacity),
            shared_subject_warning_threshold: shared_subject_warning_threshold
                .unwrap_or(defaults.shared_subject_warning_threshold),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "AllocationConfig(bench_capacity={}, bench_columns={}, default_hall_capacity={}, verbosity={})",
            self.bench_capacity, self.bench_columns, self.default_hall_capacity, self.verbosity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AllocationConfig::default();
        assert_eq!(config.bench_capacity, 2);
        assert_eq!(config.bench_columns, 1);
        assert_eq!(config.default_hall_capacity, 45);
        assert_eq!(config.shared_subject_warning_threshold, 3);
        assert_eq!(config.verbosity, 0);
    }

    #[test]
    fn test_new_fills_missing_with_defaults() {
        let config = AllocationConfig::new(Some(3), None, None, None, Some(2));
        assert_eq!(config.bench_capacity, 3);
        assert_eq!(config.bench_columns, 1);
        assert_eq!(config.verbosity, 2);
    }
}
