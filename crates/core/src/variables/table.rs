use crate::metadata::Metadata;

/// A named numeric table defined in a data source.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub title: String,
    pub label: String,
    pub metadata: Metadata,
    /// Row-major values; every row has one value per column.
    pub rows: Vec<Vec<f64>>,
}

impl Table {
    pub fn label_for(name: &str) -> String {
        format!("tab:{name}")
    }

    /// Column names from the `cols` property.
    pub fn columns(&self) -> &[String] {
        self.metadata.get_list("cols").unwrap_or_default()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns().iter().position(|c| c == name)
    }

    /// Values of the `idx`-th column, top to bottom.
    pub fn column(&self, idx: usize) -> Vec<f64> {
        self.rows.iter().filter_map(|row| row.get(idx).copied()).collect()
    }

    /// All columns paired with their names, in declaration order.
    pub fn named_columns(&self) -> Vec<(&str, Vec<f64>)> {
        self.columns().iter().enumerate().map(|(i, c)| (c.as_str(), self.column(i))).collect()
    }
}
