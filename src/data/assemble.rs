use log::debug;

use super::error::{Result, SpectrumError};
use super::model::{SampleCollection, SpectrumColumn, WideSpectrumTable};

/// Knobs for [`assemble_with`].
#[derive(Debug, Clone, Copy, Default)]
pub struct AssembleOptions {
    /// Require every sample's wavelength values to equal the first sample's.
    pub strict_axis: bool,
}

/// Pivot a collection of (wavelength, reflectance) tables into one wide
/// table. See [`assemble_with`].
pub fn assemble(collection: &SampleCollection) -> Result<WideSpectrumTable> {
    assemble_with(collection, &AssembleOptions::default())
}

/// Pivot a collection into a [`WideSpectrumTable`].
///
/// * The wavelength column is copied from the first sample in insertion order.
/// * Every sample contributes its second column, named by its key, verbatim.
/// * Extra columns beyond the second are ignored.
/// * Every sample must have exactly as many rows as the first one; unless
///   `strict_axis` is set the wavelength values themselves are not compared.
pub fn assemble_with(
    collection: &SampleCollection,
    options: &AssembleOptions,
) -> Result<WideSpectrumTable> {
    let mut entries = collection.iter();
    let (first_key, first) = entries.next().ok_or(SpectrumError::EmptyCollection)?;

    let axis = axis_of(first_key, first.columns())?;
    let rows = axis.len();

    let mut columns = Vec::with_capacity(collection.len());
    for (key, table) in collection.iter() {
        let (wavelength, reflectance) = match table.columns() {
            [w, r, ..] => (w, r),
            other => {
                return Err(SpectrumError::MalformedSample {
                    key: key.to_string(),
                    columns: other.len(),
                })
            }
        };

        if wavelength.len() != rows || reflectance.len() != rows {
            return Err(SpectrumError::ShapeMismatch {
                key: key.to_string(),
                detail: format!(
                    "{} wavelength / {} reflectance row(s), expected {rows} (from '{first_key}')",
                    wavelength.len(),
                    reflectance.len()
                ),
            });
        }

        if options.strict_axis {
            if let Some(row) = wavelength
                .iter()
                .zip(axis)
                .position(|(a, b)| a.to_bits() != b.to_bits())
            {
                return Err(SpectrumError::ShapeMismatch {
                    key: key.to_string(),
                    detail: format!(
                        "wavelength {} at row {row} differs from {} in '{first_key}'",
                        wavelength[row], axis[row]
                    ),
                });
            }
        }

        columns.push(SpectrumColumn {
            name: key.to_string(),
            values: reflectance.clone(),
        });
    }

    debug!(
        "assembled {} sample column(s) over {rows} wavelength row(s)",
        columns.len()
    );
    Ok(WideSpectrumTable::new(axis.clone(), columns))
}

fn axis_of<'a>(key: &str, columns: &'a [Vec<f64>]) -> Result<&'a Vec<f64>> {
    match columns {
        [w, _, ..] => Ok(w),
        other => Err(SpectrumError::MalformedSample {
            key: key.to_string(),
            columns: other.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::SampleTable;

    fn collection(samples: &[(&str, Vec<f64>, Vec<f64>)]) -> SampleCollection {
        let mut c = SampleCollection::new();
        for (key, w, r) in samples {
            c.insert(*key, SampleTable::new(w.clone(), r.clone())).unwrap();
        }
        c
    }

    #[test]
    fn test_single_sample() {
        let c = collection(&[("a", vec![1.0, 2.0, 3.0], vec![10.0, 20.0, 30.0])]);
        let table = assemble(&c).unwrap();
        assert_eq!(table.wavelength(), &[1.0, 2.0, 3.0]);
        assert_eq!(table.data_column_count(), 1);
        assert_eq!(table.columns()[0].name, "a");
        assert_eq!(table.columns()[0].values, vec![10.0, 20.0, 30.0]);
    }

    #[test]
    fn test_shape_is_one_plus_k_by_m() {
        let w: Vec<f64> = (0..7).map(|i| 400.0 + i as f64).collect();
        let samples: Vec<(&str, Vec<f64>, Vec<f64>)> = ["s1", "s2", "s3", "s4"]
            .iter()
            .enumerate()
            .map(|(k, name)| (*name, w.clone(), vec![k as f64; 7]))
            .collect();
        let table = assemble(&collection(&samples)).unwrap();
        assert_eq!(1 + table.data_column_count(), 5);
        assert_eq!(table.row_count(), 7);
        assert!(table.columns().iter().all(|c| c.values.len() == 7));
    }

    #[test]
    fn test_column_order_follows_insertion() {
        let c = collection(&[
            ("b.txt", vec![1.0], vec![1.0]),
            ("a.txt", vec![1.0], vec![2.0]),
            ("c.txt", vec![1.0], vec![3.0]),
        ]);
        let table = assemble(&c).unwrap();
        let names: Vec<&str> = table.column_names().collect();
        assert_eq!(names, vec!["b.txt", "a.txt", "c.txt"]);
    }

    #[test]
    fn test_wavelength_comes_from_first_sample() {
        let c = collection(&[
            ("first", vec![1.0, 2.0], vec![0.1, 0.2]),
            ("second", vec![5.0, 6.0], vec![0.3, 0.4]),
        ]);
        let table = assemble(&c).unwrap();
        assert_eq!(table.wavelength(), &[1.0, 2.0]);

        let strict = AssembleOptions { strict_axis: true };
        assert!(matches!(
            assemble_with(&c, &strict),
            Err(SpectrumError::ShapeMismatch { key, .. }) if key == "second"
        ));
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let mut c = SampleCollection::new();
        c.insert(
            "wide",
            SampleTable::from_columns(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![9.0, 9.0]]),
        )
        .unwrap();
        let table = assemble(&c).unwrap();
        assert_eq!(table.columns()[0].values, vec![3.0, 4.0]);
    }

    #[test]
    fn test_empty_collection() {
        assert_eq!(
            assemble(&SampleCollection::new()),
            Err(SpectrumError::EmptyCollection)
        );
    }

    #[test]
    fn test_malformed_sample() {
        let mut c = SampleCollection::new();
        c.insert("ok", SampleTable::new(vec![1.0], vec![2.0])).unwrap();
        c.insert("bad", SampleTable::from_columns(vec![vec![1.0]]))
            .unwrap();
        assert_eq!(
            assemble(&c),
            Err(SpectrumError::MalformedSample {
                key: "bad".into(),
                columns: 1
            })
        );
    }

    #[test]
    fn test_row_count_mismatch() {
        let c = collection(&[
            ("a", vec![1.0, 2.0, 3.0], vec![0.1, 0.2, 0.3]),
            ("short", vec![1.0, 2.0], vec![0.1, 0.2]),
        ]);
        assert!(matches!(
            assemble(&c),
            Err(SpectrumError::ShapeMismatch { key, .. }) if key == "short"
        ));
    }
}
