// ─────────────────────────────────────────────────────────────────────
// MtxGen — Descriptor Set Types
// ─────────────────────────────────────────────────────────────────────
//! Fixed-schema record of structural and statistical matrix descriptors.
//!
//! Every descriptor has a stable snake_case key (`num_rows`,
//! `row_median_std`, `estimated_condition_number`, ...). Values that are
//! undefined on degenerate input are `None`; booleans are exposed as
//! `1.0` / `0.0` through [`DescriptorSource::entries`].

use serde::{Deserialize, Serialize};

use crate::error::{MtxGenError, MtxGenResult};

/// min / max / mean / sample standard deviation of a sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    pub std: Option<f64>,
}

impl Summary {
    /// Summary with every field undefined.
    pub const UNDEFINED: Summary = Summary {
        min: None,
        max: None,
        mean: None,
        std: None,
    };

    fn as_array(&self) -> [Option<f64>; 4] {
        [self.min, self.max, self.mean, self.std]
    }
}

/// Per-line statistics (min, max, mean, std, median of each row or
/// column) aggregated across all lines of one axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AxisStatistics {
    pub min: Summary,
    pub max: Summary,
    pub mean: Summary,
    pub std: Summary,
    pub median: Summary,
}

impl AxisStatistics {
    pub const UNDEFINED: AxisStatistics = AxisStatistics {
        min: Summary::UNDEFINED,
        max: Summary::UNDEFINED,
        mean: Summary::UNDEFINED,
        std: Summary::UNDEFINED,
        median: Summary::UNDEFINED,
    };

    fn values(&self) -> impl Iterator<Item = Option<f64>> {
        [self.min, self.max, self.mean, self.std, self.median]
            .into_iter()
            .flat_map(|s| s.as_array())
    }
}

#[rustfmt::skip]
const ROW_KEYS: [&str; 20] = [
    "row_min_min", "row_min_max", "row_min_mean", "row_min_std",
    "row_max_min", "row_max_max", "row_max_mean", "row_max_std",
    "row_mean_min", "row_mean_max", "row_mean_mean", "row_mean_std",
    "row_std_min", "row_std_max", "row_std_mean", "row_std_std",
    "row_median_min", "row_median_max", "row_median_mean", "row_median_std",
];

#[rustfmt::skip]
const COL_KEYS: [&str; 20] = [
    "col_min_min", "col_min_max", "col_min_mean", "col_min_std",
    "col_max_min", "col_max_max", "col_max_mean", "col_max_std",
    "col_mean_min", "col_mean_max", "col_mean_mean", "col_mean_std",
    "col_std_min", "col_std_max", "col_std_mean", "col_std_std",
    "col_median_min", "col_median_max", "col_median_mean", "col_median_std",
];

/// Anything that can be viewed as key → optional scalar pairs.
pub trait DescriptorSource {
    /// All descriptors in canonical order.
    fn entries(&self) -> Vec<(&'static str, Option<f64>)>;

    /// Outer `None`: unknown key. Inner `None`: undefined value.
    fn get(&self, key: &str) -> Option<Option<f64>> {
        self.entries()
            .into_iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }
}

/// Descriptors of a single matrix, as produced by the descriptor engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DescriptorSet {
    pub num_rows: usize,
    pub num_cols: usize,
    pub num_nonzeros: usize,
    /// `100 * nnz / (rows * cols)`, 0 for an empty matrix.
    pub density_percent: f64,

    pub pattern_symmetry: bool,
    pub numerical_symmetry: bool,

    /// Nonzero count per row (`mean` is reported under the `avg` key).
    pub nonzeros_per_row: Summary,
    pub nonzeros_per_col: Summary,

    /// Statistics over the multiset of nonzero values.
    pub values: Summary,

    pub row_stats: AxisStatistics,
    pub col_stats: AxisStatistics,

    pub avg_distance_to_diagonal: Option<f64>,
    pub num_diagonals_with_nonzeros: usize,
    pub bandwidth: usize,
    pub num_structurally_unsymmetric_elements: usize,

    pub norm_1: Option<f64>,
    pub norm_inf: Option<f64>,
    pub frobenius_norm: f64,
    pub estimated_condition_number: Option<f64>,
}

impl DescriptorSource for DescriptorSet {
    fn entries(&self) -> Vec<(&'static str, Option<f64>)> {
        let flag = |b: bool| Some(if b { 1.0 } else { 0.0 });
        let mut out: Vec<(&'static str, Option<f64>)> = vec![
            ("num_rows", Some(self.num_rows as f64)),
            ("num_cols", Some(self.num_cols as f64)),
            ("num_nonzeros", Some(self.num_nonzeros as f64)),
            ("density_percent", Some(self.density_percent)),
            ("pattern_symmetry", flag(self.pattern_symmetry)),
            ("numerical_symmetry", flag(self.numerical_symmetry)),
            ("nonzeros_per_row_min", self.nonzeros_per_row.min),
            ("nonzeros_per_row_max", self.nonzeros_per_row.max),
            ("nonzeros_per_row_avg", self.nonzeros_per_row.mean),
            ("nonzeros_per_row_std", self.nonzeros_per_row.std),
            ("nonzeros_per_col_min", self.nonzeros_per_col.min),
            ("nonzeros_per_col_max", self.nonzeros_per_col.max),
            ("nonzeros_per_col_avg", self.nonzeros_per_col.mean),
            ("nonzeros_per_col_std", self.nonzeros_per_col.std),
            ("value_min", self.values.min),
            ("value_max", self.values.max),
            ("value_avg", self.values.mean),
            ("value_std", self.values.std),
        ];
        out.extend(ROW_KEYS.into_iter().zip(self.row_stats.values()));
        out.extend(COL_KEYS.into_iter().zip(self.col_stats.values()));
        out.extend([
            ("avg_distance_to_diagonal", self.avg_distance_to_diagonal),
            (
                "num_diagonals_with_nonzeros",
                Some(self.num_diagonals_with_nonzeros as f64),
            ),
            ("bandwidth", Some(self.bandwidth as f64)),
            (
                "num_structurally_unsymmetric_elements",
                Some(self.num_structurally_unsymmetric_elements as f64),
            ),
            ("norm_1", self.norm_1),
            ("norm_inf", self.norm_inf),
            ("frobenius_norm", Some(self.frobenius_norm)),
            ("estimated_condition_number", self.estimated_condition_number),
        ]);
        out
    }
}

/// Element-wise mean of several descriptor sets.
///
/// A key is undefined only if it is undefined in every input; booleans
/// average to the fraction of inputs where they held.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AveragedDescriptors {
    pub sample_count: usize,
    pub values: Vec<(&'static str, Option<f64>)>,
}

impl DescriptorSet {
    pub fn average(sets: &[DescriptorSet]) -> MtxGenResult<AveragedDescriptors> {
        let first = sets.first().ok_or_else(|| {
            MtxGenError::Config("cannot average an empty list of descriptor sets".into())
        })?;
        let keys: Vec<&'static str> = first.entries().into_iter().map(|(k, _)| k).collect();
        let mut sums = vec![0.0f64; keys.len()];
        let mut counts = vec![0usize; keys.len()];
        for set in sets {
            for (i, (_, value)) in set.entries().into_iter().enumerate() {
                if let Some(v) = value {
                    sums[i] += v;
                    counts[i] += 1;
                }
            }
        }
        let values = keys
            .into_iter()
            .zip(sums.into_iter().zip(counts))
            .map(|(k, (sum, n))| (k, (n > 0).then(|| sum / n as f64)))
            .collect();
        Ok(AveragedDescriptors {
            sample_count: sets.len(),
            values,
        })
    }
}

impl DescriptorSource for AveragedDescriptors {
    fn entries(&self) -> Vec<(&'static str, Option<f64>)> {
        self.values.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(rows: usize, symmetric: bool, cond: Option<f64>) -> DescriptorSet {
        DescriptorSet {
            num_rows: rows,
            num_cols: rows,
            num_nonzeros: rows,
            density_percent: 100.0 / rows as f64,
            pattern_symmetry: symmetric,
            numerical_symmetry: symmetric,
            nonzeros_per_row: Summary::UNDEFINED,
            nonzeros_per_col: Summary::UNDEFINED,
            values: Summary::UNDEFINED,
            row_stats: AxisStatistics::UNDEFINED,
            col_stats: AxisStatistics::UNDEFINED,
            avg_distance_to_diagonal: Some(0.0),
            num_diagonals_with_nonzeros: 1,
            bandwidth: 0,
            num_structurally_unsymmetric_elements: 0,
            norm_1: Some(1.0),
            norm_inf: Some(1.0),
            frobenius_norm: (rows as f64).sqrt(),
            estimated_condition_number: cond,
        }
    }

    #[test]
    fn test_entries_vocabulary() {
        let entries = sample(4, true, Some(1.0)).entries();
        assert_eq!(entries.len(), 66);
        let mut keys: Vec<_> = entries.iter().map(|(k, _)| *k).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), 66, "keys must be unique");
    }

    #[test]
    fn test_get_known_and_unknown() {
        let set = sample(4, true, None);
        assert_eq!(set.get("num_rows"), Some(Some(4.0)));
        assert_eq!(set.get("pattern_symmetry"), Some(Some(1.0)));
        assert_eq!(set.get("estimated_condition_number"), Some(None));
        assert_eq!(set.get("row_median_std"), Some(None));
        assert_eq!(set.get("no_such_key"), None);
    }

    #[test]
    fn test_average() {
        let avg = DescriptorSet::average(&[
            sample(2, true, None),
            sample(4, false, Some(3.0)),
        ])
        .unwrap();
        assert_eq!(avg.sample_count, 2);
        assert_eq!(avg.get("num_rows"), Some(Some(3.0)));
        assert_eq!(avg.get("pattern_symmetry"), Some(Some(0.5)));
        assert_eq!(avg.get("estimated_condition_number"), Some(Some(3.0)));
        assert_eq!(avg.get("value_min"), Some(None));
    }

    #[test]
    fn test_average_empty_rejected() {
        assert!(DescriptorSet::average(&[]).is_err());
    }
}
