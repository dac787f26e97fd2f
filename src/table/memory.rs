use crate::error::{Result, ScalerError};
use crate::table::{nan_min_max, Table};

/// Column-major in-memory table of `f64` columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemoryTable {
    names: Vec<String>,
    columns: Vec<Vec<f64>>,
    n_rows: usize,
}

impl InMemoryTable {
    /// Build a table from `(name, values)` pairs.
    ///
    /// # Errors
    /// [`ScalerError::ShapeMismatch`] if column lengths differ or a name is
    /// repeated.
    pub fn new<S: Into<String>>(columns: Vec<(S, Vec<f64>)>) -> Result<Self> {
        let mut table = Self::default();
        for (name, values) in columns {
            table.push_column(name, values)?;
        }
        Ok(table)
    }

    /// Append a column.
    ///
    /// The first column fixes the row count of the table.
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<()> {
        let name = name.into();
        if self.names.iter().any(|n| *n == name) {
            return Err(ScalerError::ShapeMismatch(format!(
                "duplicate column '{}'",
                name
            )));
        }
        if self.columns.is_empty() {
            self.n_rows = values.len();
        } else if values.len() != self.n_rows {
            return Err(ScalerError::ShapeMismatch(format!(
                "column '{}' has {} rows, expected {}",
                name,
                values.len(),
                self.n_rows
            )));
        }
        self.names.push(name);
        self.columns.push(values);
        Ok(())
    }

    /// Values of a column, if present.
    pub fn column(&self, name: &str) -> Option<&[f64]> {
        self.position(name).map(|i| self.columns[i].as_slice())
    }

    pub fn n_columns(&self) -> usize {
        self.names.len()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }
}

impl Table for InMemoryTable {
    fn column_names(&self) -> Vec<&str> {
        self.names.iter().map(String::as_str).collect()
    }

    fn n_rows(&self) -> usize {
        self.n_rows
    }

    fn has_column(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    fn column_min_max(&self, name: &str) -> Result<(f64, f64)> {
        let values = self
            .column(name)
            .ok_or_else(|| ScalerError::MissingColumn(name.to_string()))?;
        Ok(nan_min_max(values.iter().copied()))
    }

    fn map_column<F: Fn(f64) -> f64>(&mut self, name: &str, f: F) -> Result<()> {
        let idx = self
            .position(name)
            .ok_or_else(|| ScalerError::MissingColumn(name.to_string()))?;
        self.columns[idx].iter_mut().for_each(|v| *v = f(*v));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_table() -> InMemoryTable {
        InMemoryTable::new(vec![
            ("a", vec![0.0, 25.0, 100.0]),
            ("b", vec![5.0, 5.0, 5.0]),
        ])
        .unwrap()
    }

    #[test]
    fn test_table_shape() {
        let table = create_test_table();
        assert_eq!(table.n_rows(), 3);
        assert_eq!(table.n_columns(), 2);
        assert_eq!(table.column_names(), vec!["a", "b"]);
    }

    #[test]
    fn test_table_length_mismatch() {
        let result = InMemoryTable::new(vec![("a", vec![1.0, 2.0]), ("b", vec![1.0])]);
        assert!(matches!(result, Err(ScalerError::ShapeMismatch(_))));
    }

    #[test]
    fn test_table_duplicate_column() {
        let result = InMemoryTable::new(vec![("a", vec![1.0]), ("a", vec![2.0])]);
        assert!(matches!(result, Err(ScalerError::ShapeMismatch(_))));
    }

    #[test]
    fn test_table_min_max() {
        let table = create_test_table();
        assert_eq!(table.column_min_max("a").unwrap(), (0.0, 100.0));
        assert_eq!(table.column_min_max("b").unwrap(), (5.0, 5.0));
    }

    #[test]
    fn test_table_min_max_missing_column() {
        let table = create_test_table();
        assert!(matches!(
            table.column_min_max("zzz"),
            Err(ScalerError::MissingColumn(ref c)) if c == "zzz"
        ));
    }

    #[test]
    fn test_table_map_column() {
        let mut table = create_test_table();
        table.map_column("a", |x| x * 2.0).unwrap();
        assert_eq!(table.column("a").unwrap(), &[0.0, 50.0, 200.0]);
        assert_eq!(table.column("b").unwrap(), &[5.0, 5.0, 5.0]);
    }

    #[test]
    fn test_table_empty_rows() {
        let table = InMemoryTable::new(vec![("a", Vec::new())]).unwrap();
        assert_eq!(table.n_rows(), 0);
        assert_eq!(table.column_min_max("a").unwrap(), (0.0, 0.0));
    }
}
