use std::ops::Range;

use serde::{Deserialize, Serialize};

use super::error::{Result, SpectrumError};
use super::model::{SpectrumColumn, WideSpectrumTable};

/// What to do with the columns left over after the last full window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemainderPolicy {
    /// Emit only full windows; trailing columns are not rendered.
    #[default]
    Drop,
    /// Emit a final, shorter window with the trailing columns.
    Keep,
}

// ---------------------------------------------------------------------------
// Window – a contiguous slice of data columns
// ---------------------------------------------------------------------------

/// Columns `[index * size, index * size + len)` of a wide table.
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    index: usize,
    range: (usize, usize),
    table: &'a WideSpectrumTable,
}

impl<'a> Window<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Positions of this window's columns in the table.
    pub fn column_range(&self) -> Range<usize> {
        self.range.0..self.range.1
    }

    pub fn columns(&self) -> &'a [SpectrumColumn] {
        &self.table.columns()[self.column_range()]
    }

    /// Class labels aligned with [`Window::columns`], if the table has them.
    pub fn labels(&self) -> Option<&'a [String]> {
        let range = self.column_range();
        self.table.labels().map(|labels| &labels[range])
    }

    pub fn len(&self) -> usize {
        self.range.1 - self.range.0
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn wavelength(&self) -> &'a [f64] {
        self.table.wavelength()
    }
}

/// Bitwise equality of column contents, so windows holding NaN compare
/// equal to themselves.
fn same_columns(a: &[SpectrumColumn], b: &[SpectrumColumn]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(x, y)| {
            x.name == y.name
                && x.values.len() == y.values.len()
                && x.values
                    .iter()
                    .zip(&y.values)
                    .all(|(p, q)| p.to_bits() == q.to_bits())
        })
}

impl PartialEq for Window<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
            && same_columns(self.columns(), other.columns())
            && self.labels() == other.labels()
    }
}

// ---------------------------------------------------------------------------
// Partition – restartable window sequence
// ---------------------------------------------------------------------------

/// A validated split of a table's data columns into fixed-size windows.
///
/// Nothing is copied; every call to [`Partition::iter`] starts over and
/// yields the same windows.
#[derive(Debug, Clone, Copy)]
pub struct Partition<'a> {
    table: &'a WideSpectrumTable,
    window_size: usize,
    policy: RemainderPolicy,
}

/// Partition with the default [`RemainderPolicy::Drop`].
pub fn partition(table: &WideSpectrumTable, window_size: usize) -> Result<Partition<'_>> {
    partition_with(table, window_size, RemainderPolicy::default())
}

pub fn partition_with(
    table: &WideSpectrumTable,
    window_size: usize,
    policy: RemainderPolicy,
) -> Result<Partition<'_>> {
    if window_size == 0 {
        return Err(SpectrumError::InvalidWindowSize(window_size));
    }
    if table.data_column_count() == 0 {
        return Err(SpectrumError::EmptyTable);
    }
    Ok(Partition {
        table,
        window_size,
        policy,
    })
}

impl<'a> Partition<'a> {
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn policy(&self) -> RemainderPolicy {
        self.policy
    }

    /// Number of windows the sequence yields.
    pub fn len(&self) -> usize {
        let n = self.table.data_column_count();
        let full = n / self.window_size;
        match self.policy {
            RemainderPolicy::Keep if n % self.window_size != 0 => full + 1,
            _ => full,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Columns not covered by any window.
    pub fn dropped_columns(&self) -> usize {
        match self.policy {
            RemainderPolicy::Drop => self.table.data_column_count() % self.window_size,
            RemainderPolicy::Keep => 0,
        }
    }

    pub fn iter(&self) -> Windows<'a> {
        Windows {
            partition: *self,
            next: 0,
            end: self.len(),
        }
    }
}

impl<'a> IntoIterator for &Partition<'a> {
    type Item = Window<'a>;
    type IntoIter = Windows<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over the windows of a [`Partition`].
#[derive(Debug, Clone)]
pub struct Windows<'a> {
    partition: Partition<'a>,
    next: usize,
    end: usize,
}

impl<'a> Iterator for Windows<'a> {
    type Item = Window<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let index = self.next;
        self.next += 1;

        let size = self.partition.window_size;
        let n = self.partition.table.data_column_count();
        let start = index * size;
        Some(Window {
            index,
            range: (start, (start + size).min(n)),
            table: self.partition.table,
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.end - self.next;
        (left, Some(left))
    }
}

impl ExactSizeIterator for Windows<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::assemble::assemble;
    use crate::data::model::{SampleCollection, SampleTable};

    fn table_with_columns(n: usize) -> WideSpectrumTable {
        let mut c = SampleCollection::new();
        for i in 0..n {
            c.insert(
                format!("s{i:03}"),
                SampleTable::new(vec![500.0, 510.0], vec![i as f64, i as f64 + 0.5]),
            )
            .unwrap();
        }
        assemble(&c).unwrap()
    }

    #[test]
    fn test_remainder_is_dropped_by_default() {
        let table = table_with_columns(250);
        let p = partition(&table, 100).unwrap();
        let windows: Vec<Window> = p.iter().collect();
        assert_eq!(windows.len(), 2);
        assert!(windows.iter().all(|w| w.len() == 100));
        assert_eq!(windows[1].column_range(), 100..200);
        assert_eq!(windows[1].columns()[99].name, "s199");
        assert_eq!(p.dropped_columns(), 50);
    }

    #[test]
    fn test_keep_emits_short_window() {
        let table = table_with_columns(250);
        let p = partition_with(&table, 100, RemainderPolicy::Keep).unwrap();
        let sizes: Vec<usize> = p.iter().map(|w| w.len()).collect();
        assert_eq!(sizes, vec![100, 100, 50]);
        assert_eq!(p.dropped_columns(), 0);
    }

    #[test]
    fn test_exact_multiple() {
        let table = table_with_columns(100);
        let p = partition(&table, 100).unwrap();
        assert_eq!(p.iter().count(), 1);
        let p = partition_with(&table, 100, RemainderPolicy::Keep).unwrap();
        assert_eq!(p.iter().count(), 1);
    }

    #[test]
    fn test_fewer_columns_than_window() {
        let table = table_with_columns(3);
        assert_eq!(partition(&table, 10).unwrap().iter().count(), 0);
        assert_eq!(
            partition_with(&table, 10, RemainderPolicy::Keep)
                .unwrap()
                .iter()
                .count(),
            1
        );
    }

    #[test]
    fn test_windows_are_in_order_and_contiguous() {
        let table = table_with_columns(9);
        let p = partition(&table, 3).unwrap();
        let names: Vec<Vec<&str>> = p
            .iter()
            .map(|w| w.columns().iter().map(|c| c.name.as_str()).collect())
            .collect();
        assert_eq!(
            names,
            vec![
                vec!["s000", "s001", "s002"],
                vec!["s003", "s004", "s005"],
                vec!["s006", "s007", "s008"],
            ]
        );
        let indices: Vec<usize> = p.iter().map(|w| w.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn test_invalid_window_size() {
        let table = table_with_columns(4);
        assert_eq!(
            partition(&table, 0).unwrap_err(),
            SpectrumError::InvalidWindowSize(0)
        );
    }

    #[test]
    fn test_restartable_and_deterministic() {
        let table = table_with_columns(25);
        let p = partition(&table, 4).unwrap();
        let first: Vec<Window> = p.iter().collect();
        let second: Vec<Window> = (&p).into_iter().collect();
        assert_eq!(first, second);

        let again = table_with_columns(25);
        let q = partition(&again, 4).unwrap();
        assert!(p.iter().zip(q.iter()).all(|(a, b)| a == b));
        assert_eq!(p.iter().len(), 6);
    }

    #[test]
    fn test_windows_with_missing_values_compare_equal() {
        let build = || {
            let mut c = SampleCollection::new();
            c.insert("a", SampleTable::new(vec![1.0, 2.0], vec![0.1, f64::NAN]))
                .unwrap();
            c.insert("b", SampleTable::new(vec![1.0, 2.0], vec![f64::NAN, 0.2]))
                .unwrap();
            assemble(&c).unwrap()
        };
        let (first, second) = (build(), build());
        let p = partition(&first, 1).unwrap();
        let q = partition(&second, 1).unwrap();
        assert_eq!(p.iter().collect::<Vec<_>>(), q.iter().collect::<Vec<_>>());

        let windows: Vec<Window> = p.iter().collect();
        assert_ne!(windows[0], windows[1]);
    }

    #[test]
    fn test_labels_follow_window() {
        let labels: Vec<String> = (0..6)
            .map(|i| if i < 3 { "leaf" } else { "bark" }.to_string())
            .collect();
        let table = table_with_columns(6).with_labels(labels).unwrap();
        let p = partition(&table, 2).unwrap();
        let w: Vec<Window> = p.iter().collect();
        assert_eq!(w[1].labels().unwrap(), &["leaf".to_string(), "bark".to_string()]);
    }

    #[test]
    fn test_empty_table() {
        let table = WideSpectrumTable::new(vec![1.0, 2.0], Vec::new());
        assert_eq!(partition(&table, 5).unwrap_err(), SpectrumError::EmptyTable);
    }
}
