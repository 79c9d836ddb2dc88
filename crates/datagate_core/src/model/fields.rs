//! Extracted column/value sets.

use sea_query::Value;

/// Persistable fields returned by `Model::extract()`.
///
/// Columns and values are matched by position. `push` keeps them aligned;
/// `from_parts` accepts whatever it is given and leaves the consistency check
/// to the gateway.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fields {
    columns: Vec<String>,
    values: Vec<Value>,
}

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a field set from separately collected columns and values.
    pub fn from_parts(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    /// Appends one column with its value.
    pub fn push(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.columns.push(column.into());
        self.values.push(value.into());
    }

    /// Builder-style `push`.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push(column, value);
        self
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub(crate) fn is_aligned(&self) -> bool {
        self.columns.len() == self.values.len()
    }

    /// Drops every column named in `excluded`, with its value.
    ///
    /// Only meaningful on an aligned set.
    pub(crate) fn without(self, excluded: &[&str]) -> Self {
        let (columns, values) = self
            .columns
            .into_iter()
            .zip(self.values)
            .filter(|(column, _)| !excluded.contains(&column.as_str()))
            .unzip();
        Self { columns, values }
    }

    pub(crate) fn into_parts(self) -> (Vec<String>, Vec<Value>) {
        (self.columns, self.values)
    }
}

#[cfg(test)]
mod tests {
    use super::Fields;
    use sea_query::Value;

    #[test]
    fn push_keeps_columns_and_values_aligned() {
        let fields = Fields::new()
            .with("name", "alice")
            .with("age", 41_i64);
        assert!(fields.is_aligned());
        assert_eq!(fields.columns(), ["name", "age"]);
        assert_eq!(fields.values()[1], Value::BigInt(Some(41)));
    }

    #[test]
    fn from_parts_allows_mismatch_for_later_checking() {
        let fields = Fields::from_parts(vec!["a".to_string(), "b".to_string()], vec![Value::String(None)]);
        assert!(!fields.is_aligned());
    }

    #[test]
    fn without_drops_named_columns_in_order() {
        let fields = Fields::new()
            .with("id", 7_i64)
            .with("title", "t")
            .with("extra_data", "x")
            .with("body", "b");

        let (columns, values) = fields.without(&["id", "extra_data"]).into_parts();
        assert_eq!(columns, ["title", "body"]);
        assert_eq!(values, [Value::from("t"), Value::from("b")]);
    }
}
