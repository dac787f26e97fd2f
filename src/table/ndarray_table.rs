use crate::error::{Result, ScalerError};
use crate::table::{nan_min_max, Table};
use ndarray::Array2;

/// Table backed by an `ndarray::Array2<f64>` with one name per column.
///
/// Rows are samples, columns are features, the same orientation as the
/// feature matrices used elsewhere in the ecosystem.
///
/// # Example
/// ```
/// use bitscaler::table::{NdarrayTable, Table};
/// use ndarray::array;
///
/// let table = NdarrayTable::new(
///     vec!["x".to_string(), "y".to_string()],
///     array![[0.0, 1.0], [4.0, 3.0]],
/// ).unwrap();
/// assert_eq!(table.column_min_max("x").unwrap(), (0.0, 4.0));
/// ```
#[derive(Debug, Clone)]
pub struct NdarrayTable {
    names: Vec<String>,
    data: Array2<f64>,
}

impl NdarrayTable {
    /// Wrap `data`, naming its columns in order.
    ///
    /// # Errors
    /// [`ScalerError::ShapeMismatch`] if the name count differs from the
    /// column count or a name is repeated.
    pub fn new(names: Vec<String>, data: Array2<f64>) -> Result<Self> {
        if names.len() != data.ncols() {
            return Err(ScalerError::ShapeMismatch(format!(
                "{} names for {} columns",
                names.len(),
                data.ncols()
            )));
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(ScalerError::ShapeMismatch(format!(
                    "duplicate column '{}'",
                    name
                )));
            }
        }
        Ok(Self { names, data })
    }

    pub fn data(&self) -> &Array2<f64> {
        &self.data
    }

    pub fn into_inner(self) -> Array2<f64> {
        self.data
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.names
            .iter()
            .position(|n| n == name)
            .ok_or_else(|| ScalerError::MissingColumn(name.to_string()))
    }
}

impl Table for NdarrayTable {
    fn column_names(&self) -> Vec<&str> {
        self.names.iter().map(String::as_str).collect()
    }

    fn n_rows(&self) -> usize {
        self.data.nrows()
    }

    fn column_min_max(&self, name: &str) -> Result<(f64, f64)> {
        let idx = self.position(name)?;
        Ok(nan_min_max(self.data.column(idx).iter().copied()))
    }

    fn map_column<F: Fn(f64) -> f64>(&mut self, name: &str, f: F) -> Result<()> {
        let idx = self.position(name)?;
        self.data.column_mut(idx).mapv_inplace(f);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn create_test_table() -> NdarrayTable {
        NdarrayTable::new(
            vec!["a".to_string(), "b".to_string()],
            array![[0.0, 5.0], [100.0, 5.0], [50.0, 5.0]],
        )
        .unwrap()
    }

    #[test]
    fn test_ndarray_table_min_max() {
        let table = create_test_table();
        assert_eq!(table.n_rows(), 3);
        assert_eq!(table.column_min_max("a").unwrap(), (0.0, 100.0));
        assert_eq!(table.column_min_max("b").unwrap(), (5.0, 5.0));
    }

    #[test]
    fn test_ndarray_table_map_column() {
        let mut table = create_test_table();
        table.map_column("a", |x| x / 100.0).unwrap();
        assert_eq!(table.data().column(0).to_vec(), vec![0.0, 1.0, 0.5]);
        assert_eq!(table.data().column(1).to_vec(), vec![5.0, 5.0, 5.0]);

        let data = table.into_inner();
        assert_eq!(data.shape(), &[3, 2]);
        assert_eq!(data[[2, 0]], 0.5);
    }

    #[test]
    fn test_ndarray_table_name_count_mismatch() {
        let result = NdarrayTable::new(vec!["a".to_string()], array![[1.0, 2.0]]);
        assert!(matches!(result, Err(ScalerError::ShapeMismatch(_))));
    }

    #[test]
    fn test_ndarray_table_missing_column() {
        let mut table = create_test_table();
        assert!(table.map_column("c", |x| x).is_err());
        assert!(!table.has_column("c"));
    }
}
