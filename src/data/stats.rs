//! Descriptive statistics over spectrum columns.
//!
//! Numbers follow the conventions of the `describe` table most spectroscopy
//! notebooks produce: NaN values are skipped, `std` is the sample standard
//! deviation and quantiles interpolate linearly between closest ranks.

use super::model::{SpectrumColumn, WideSpectrumTable, WAVELENGTH_COLUMN};

/// Row labels of a describe table, in output order.
pub const SUMMARY_ROWS: [&str; 8] = ["count", "mean", "std", "min", "25%", "50%", "75%", "max"];

/// `describe`-style summary of one column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl Summary {
    /// Values in [`SUMMARY_ROWS`] order.
    pub fn as_row(&self) -> [f64; 8] {
        [
            self.count as f64,
            self.mean,
            self.std,
            self.min,
            self.q25,
            self.median,
            self.q75,
            self.max,
        ]
    }
}

pub fn describe(values: &[f64]) -> Summary {
    let sorted = sorted_finite(values);
    let n = sorted.len();
    if n == 0 {
        return Summary {
            count: 0,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            median: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        };
    }

    let mean = sorted.iter().sum::<f64>() / n as f64;
    let std = if n > 1 {
        let ss: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    } else {
        f64::NAN
    };

    Summary {
        count: n,
        mean,
        std,
        min: sorted[0],
        q25: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.5),
        q75: quantile_sorted(&sorted, 0.75),
        max: sorted[n - 1],
    }
}

/// Summaries for every column of the table, wavelength first.
pub fn describe_table(table: &WideSpectrumTable) -> Vec<(String, Summary)> {
    std::iter::once((WAVELENGTH_COLUMN.to_string(), describe(table.wavelength())))
        .chain(
            table
                .columns()
                .iter()
                .map(|c| (c.name.clone(), describe(&c.values))),
        )
        .collect()
}

/// Pool the values of all columns sharing a label and summarize each pool.
///
/// Groups come out in order of first appearance.
pub fn group_summaries(columns: &[SpectrumColumn], labels: &[String]) -> Vec<(String, Summary)> {
    group_by_label(columns, labels)
        .into_iter()
        .map(|(label, members)| {
            let pooled: Vec<f64> = members
                .iter()
                .flat_map(|c| c.values.iter().copied())
                .collect();
            (label.to_string(), describe(&pooled))
        })
        .collect()
}

/// Columns grouped by label, groups in order of first appearance and
/// columns in source order within a group.
pub fn group_by_label<'a>(
    columns: &'a [SpectrumColumn],
    labels: &'a [String],
) -> Vec<(&'a str, Vec<&'a SpectrumColumn>)> {
    let mut groups: Vec<(&str, Vec<&SpectrumColumn>)> = Vec::new();
    for (column, label) in columns.iter().zip(labels) {
        match groups.iter_mut().find(|(l, _)| *l == label.as_str()) {
            Some((_, members)) => members.push(column),
            None => groups.push((label.as_str(), vec![column])),
        }
    }
    groups
}

// ---------------------------------------------------------------------------
// Box plot geometry
// ---------------------------------------------------------------------------

/// Tukey box: quartiles, whiskers at the last values inside 1.5 IQR,
/// everything beyond as outliers.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

pub fn box_stats(values: &[f64]) -> Option<BoxStats> {
    let sorted = sorted_finite(values);
    if sorted.is_empty() {
        return None;
    }
    let q1 = quantile_sorted(&sorted, 0.25);
    let q3 = quantile_sorted(&sorted, 0.75);
    let iqr = q3 - q1;
    let (lo_fence, hi_fence) = (q1 - 1.5 * iqr, q3 + 1.5 * iqr);

    let (inside, outliers): (Vec<f64>, Vec<f64>) = sorted
        .iter()
        .partition(|v| **v >= lo_fence && **v <= hi_fence);
    // q1..q3 always lies within the fences, so `inside` is never empty.
    let lower_whisker = inside.first().copied().unwrap_or(q1);
    let upper_whisker = inside.last().copied().unwrap_or(q3);

    Some(BoxStats {
        lower_whisker,
        q1,
        median: quantile_sorted(&sorted, 0.5),
        q3,
        upper_whisker,
        outliers,
    })
}

fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut v: Vec<f64> = values.iter().copied().filter(|x| !x.is_nan()).collect();
    v.sort_by(f64::total_cmp);
    v
}

/// Linear interpolation between closest ranks. `sorted` must be non-empty.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_describe_matches_linear_quantiles() {
        let s = describe(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(s.count, 4);
        assert!(close(s.mean, 2.5));
        assert!(close(s.std, (5.0f64 / 3.0).sqrt()));
        assert!(close(s.min, 1.0));
        assert!(close(s.q25, 1.75));
        assert!(close(s.median, 2.5));
        assert!(close(s.q75, 3.25));
        assert!(close(s.max, 4.0));
    }

    #[test]
    fn test_describe_skips_nan_and_handles_single_value() {
        let s = describe(&[f64::NAN, 7.0]);
        assert_eq!(s.count, 1);
        assert!(close(s.median, 7.0));
        assert!(s.std.is_nan());

        let empty = describe(&[]);
        assert_eq!(empty.count, 0);
        assert!(empty.mean.is_nan());
    }

    #[test]
    fn test_box_stats_outliers() {
        let b = box_stats(&[1.0, 2.0, 3.0, 4.0, 100.0]).unwrap();
        assert!(close(b.q1, 2.0));
        assert!(close(b.median, 3.0));
        assert!(close(b.q3, 4.0));
        assert!(close(b.lower_whisker, 1.0));
        assert!(close(b.upper_whisker, 4.0));
        assert_eq!(b.outliers, vec![100.0]);
        assert!(box_stats(&[f64::NAN]).is_none());
    }

    #[test]
    fn test_group_summaries_pool_by_label() {
        let columns = vec![
            SpectrumColumn {
                name: "a".into(),
                values: vec![1.0, 2.0],
            },
            SpectrumColumn {
                name: "b".into(),
                values: vec![10.0, 20.0],
            },
            SpectrumColumn {
                name: "c".into(),
                values: vec![3.0, 4.0],
            },
        ];
        let labels = vec!["leaf".to_string(), "bark".to_string(), "leaf".to_string()];
        let groups = group_summaries(&columns, &labels);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, "leaf");
        assert_eq!(groups[0].1.count, 4);
        assert!(close(groups[0].1.max, 4.0));
        assert_eq!(groups[1].0, "bark");
        assert!(close(groups[1].1.mean, 15.0));
    }
}
