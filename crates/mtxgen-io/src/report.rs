// ─────────────────────────────────────────────────────────────────────
// MtxGen — Descriptor Report
// ─────────────────────────────────────────────────────────────────────
//! Human-readable rendering of descriptor sets and header metadata.

use std::borrow::Cow;

use mtxgen_types::DescriptorSource;

use crate::market::Metadata;

/// Rendered in place of an undefined value.
pub const UNDEFINED_MARKER: &str = "-";

#[rustfmt::skip]
const LABELS: &[(&str, &str)] = &[
    ("num_rows", "Number of Rows"),
    ("num_cols", "Number of Columns"),
    ("num_nonzeros", "Number of Nonzeros"),
    ("density_percent", "Density (%)"),
    ("pattern_symmetry", "Pattern Symmetry"),
    ("numerical_symmetry", "Numerical Symmetry"),
    ("nonzeros_per_row_min", "Min Nonzeros per Row"),
    ("nonzeros_per_row_max", "Max Nonzeros per Row"),
    ("nonzeros_per_row_avg", "Avg Nonzeros per Row"),
    ("nonzeros_per_row_std", "Std Nonzeros per Row"),
    ("nonzeros_per_col_min", "Min Nonzeros per Column"),
    ("nonzeros_per_col_max", "Max Nonzeros per Column"),
    ("nonzeros_per_col_avg", "Avg Nonzeros per Column"),
    ("nonzeros_per_col_std", "Std Nonzeros per Column"),
    ("value_min", "Min Value"),
    ("value_max", "Max Value"),
    ("value_avg", "Average Value"),
    ("value_std", "Value Std Deviation"),
    ("avg_distance_to_diagonal", "Avg Distance to Diagonal"),
    ("num_diagonals_with_nonzeros", "Diagonals with Nonzeros"),
    ("bandwidth", "Bandwidth"),
    ("num_structurally_unsymmetric_elements", "Structurally Unsymmetric Elements"),
    ("norm_1", "1-Norm"),
    ("norm_inf", "Infinity Norm"),
    ("frobenius_norm", "Frobenius Norm"),
    ("estimated_condition_number", "Estimated Condition Number (1-norm)"),
];

const FLAG_KEYS: [&str; 2] = ["pattern_symmetry", "numerical_symmetry"];

const COUNT_KEYS: [&str; 6] = [
    "num_rows",
    "num_cols",
    "num_nonzeros",
    "num_diagonals_with_nonzeros",
    "bandwidth",
    "num_structurally_unsymmetric_elements",
];

/// `row_min_std` -> `Row Min Std`.
fn title_case(key: &str) -> String {
    key.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Display label for a descriptor key.
pub fn label(key: &str) -> Cow<'static, str> {
    LABELS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, l)| Cow::Borrowed(*l))
        .unwrap_or_else(|| Cow::Owned(title_case(key)))
}

/// Flags print as Yes/No (fractions from averaging print as numbers),
/// whole counts without decimals, everything else with 4 decimals.
pub fn format_value(key: &str, value: Option<f64>) -> String {
    let Some(v) = value else {
        return UNDEFINED_MARKER.to_string();
    };
    if FLAG_KEYS.contains(&key) {
        if v == 1.0 {
            return "Yes".to_string();
        }
        if v == 0.0 {
            return "No".to_string();
        }
    }
    if COUNT_KEYS.contains(&key) && v.fract() == 0.0 {
        return format!("{v:.0}");
    }
    format!("{v:.4}")
}

/// One `label: value` line per descriptor, labels padded to one column.
pub fn render_descriptors<D: DescriptorSource + ?Sized>(descriptors: &D) -> String {
    let rows: Vec<(Cow<'static, str>, String)> = descriptors
        .entries()
        .into_iter()
        .map(|(key, value)| (label(key), format_value(key, value)))
        .collect();
    let width = rows.iter().map(|(l, _)| l.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    for (l, v) in rows {
        out.push_str(&format!("{l:<width$}  {v}\n"));
    }
    out
}

/// The six standard header fields, `-` where absent.
pub fn render_metadata(metadata: &Metadata) -> String {
    format!(
        "Name: {}\nID: {}\nDate: {}\nAuthor: {}\nEd: {}\nKind: {}\n",
        metadata.name(),
        metadata.id(),
        metadata.date(),
        metadata.author(),
        metadata.ed(),
        metadata.kind()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtxgen_types::Matrix;

    #[test]
    fn test_known_and_fallback_labels() {
        assert_eq!(label("num_rows"), "Number of Rows");
        assert_eq!(
            label("estimated_condition_number"),
            "Estimated Condition Number (1-norm)"
        );
        assert_eq!(label("row_median_std"), "Row Median Std");
        assert_eq!(label("col_max_mean"), "Col Max Mean");
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value("pattern_symmetry", Some(1.0)), "Yes");
        assert_eq!(format_value("numerical_symmetry", Some(0.0)), "No");
        assert_eq!(format_value("pattern_symmetry", Some(0.5)), "0.5000");
        assert_eq!(format_value("bandwidth", Some(3.0)), "3");
        assert_eq!(format_value("num_rows", Some(2.5)), "2.5000");
        assert_eq!(format_value("frobenius_norm", Some(30f64.sqrt())), "5.4772");
        assert_eq!(format_value("estimated_condition_number", None), "-");
    }

    #[test]
    fn test_render_descriptors() {
        let m = Matrix::from_triplets(2, 2, &[(0, 0, 1.0), (1, 1, 2.0)]).unwrap();
        let d = mtxgen_core::compute_descriptors(&m);
        let text = render_descriptors(&d);
        assert_eq!(text.lines().count(), 66);
        assert!(text.lines().any(|l| l.starts_with("Number of Rows") && l.ends_with(" 2")));
        assert!(text.lines().any(|l| l.starts_with("Pattern Symmetry") && l.ends_with("Yes")));
    }

    #[test]
    fn test_render_metadata_defaults() {
        let mut meta = Metadata::new();
        meta.insert("name", "west0067");
        let text = render_metadata(&meta);
        assert!(text.starts_with("Name: west0067\nID: -\n"));
        assert!(text.ends_with("Kind: -\n"));
    }
}
