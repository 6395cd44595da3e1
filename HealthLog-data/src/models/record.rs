//! Table mapping shared by every health log record
//!
//! Each entity stores one flat row per entry. The leading columns are the same
//! for every table (`id`, `user_id`, `timestamp`, `created_at`); the remaining
//! columns are declared by the record type and read back positionally.

use std::fmt::Debug;

use crate::repository::RepositoryError;

/// Storage class of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// UTF-8 text
    Text,
    /// 64-bit signed integer
    Integer,
    /// Double precision float
    Real,
}

/// A single column definition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Column {
    /// Column name
    pub name: &'static str,
    /// Storage class
    pub kind: ColumnKind,
    /// Whether NULL is allowed
    pub nullable: bool,
}

impl Column {
    /// Required column
    pub const fn required(name: &'static str, kind: ColumnKind) -> Self {
        Self { name, kind, nullable: false }
    }

    /// Nullable column
    pub const fn optional(name: &'static str, kind: ColumnKind) -> Self {
        Self { name, kind, nullable: true }
    }
}

/// Columns every log table starts with, in order
pub const HEADER_COLUMNS: [Column; 4] = [
    Column::required("id", ColumnKind::Text),
    Column::required("user_id", ColumnKind::Text),
    Column::required("timestamp", ColumnKind::Text),
    Column::required("created_at", ColumnKind::Text),
];

/// A backend-neutral column value
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Text(String),
    Integer(i64),
    Real(f64),
}

impl From<String> for SqlValue {
    fn from(value: String) -> Self {
        SqlValue::Text(value)
    }
}

impl From<i64> for SqlValue {
    fn from(value: i64) -> Self {
        SqlValue::Integer(value)
    }
}

impl From<f64> for SqlValue {
    fn from(value: f64) -> Self {
        SqlValue::Real(value)
    }
}

impl<T: Into<SqlValue>> From<Option<T>> for SqlValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(SqlValue::Null)
    }
}

/// Identity and ownership shared by every stored record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordHeader {
    pub id: String,
    pub user_id: String,
    pub timestamp: String,
    pub created_at: String,
}

/// A record that has not been stored yet
pub trait NewLogRecord: Clone + Debug + Send + Sync + 'static {
    /// Owner of the record
    fn user_id(&self) -> &str;
}

/// A stored health log record and its table mapping
pub trait LogRecord: Clone + Debug + Send + Sync + 'static {
    /// Insert payload for this record
    type New: NewLogRecord;

    /// Table name
    const TABLE: &'static str;

    /// Entity-specific columns, in the order produced by `field_values`
    const FIELDS: &'static [Column];

    /// Build the stored record from its insert payload
    fn from_new(id: String, created_at: String, new: Self::New) -> Self;

    /// Common header columns
    fn header(&self) -> RecordHeader;

    /// Values of the entity-specific columns
    fn field_values(&self) -> Vec<SqlValue>;

    /// Rebuild a record from a header and its entity-specific values
    fn from_row(header: RecordHeader, fields: ValueReader) -> Result<Self, RepositoryError>;

    /// All columns of the table, header first
    fn columns() -> Vec<Column> {
        HEADER_COLUMNS.iter().chain(Self::FIELDS.iter()).copied().collect()
    }

    /// Values for every column, in the order of `columns()`
    fn values(&self) -> Vec<SqlValue> {
        let header = self.header();
        let mut values = vec![
            SqlValue::Text(header.id),
            SqlValue::Text(header.user_id),
            SqlValue::Text(header.timestamp),
            SqlValue::Text(header.created_at),
        ];
        values.extend(self.field_values());
        values
    }

    /// Rebuild a record from values ordered like `columns()`
    fn from_values(values: Vec<SqlValue>) -> Result<Self, RepositoryError> {
        let mut reader = ValueReader::new(Self::TABLE, values);
        let header = RecordHeader {
            id: reader.text()?,
            user_id: reader.text()?,
            timestamp: reader.text()?,
            created_at: reader.text()?,
        };
        Self::from_row(header, reader)
    }
}

/// Positional reader over a row of values
#[derive(Debug)]
pub struct ValueReader {
    table: &'static str,
    position: usize,
    values: std::vec::IntoIter<SqlValue>,
}

impl ValueReader {
    pub fn new(table: &'static str, values: Vec<SqlValue>) -> Self {
        Self { table, position: 0, values: values.into_iter() }
    }

    fn next_value(&mut self) -> Result<SqlValue, RepositoryError> {
        let position = self.position;
        self.position += 1;
        self.values.next().ok_or_else(|| {
            RepositoryError::Decode(format!("{}: missing column at position {}", self.table, position))
        })
    }

    fn mismatch(&self, expected: &str, found: &SqlValue) -> RepositoryError {
        RepositoryError::Decode(format!(
            "{}: expected {} at position {}, found {:?}",
            self.table,
            expected,
            self.position - 1,
            found
        ))
    }

    pub fn text(&mut self) -> Result<String, RepositoryError> {
        match self.next_value()? {
            SqlValue::Text(value) => Ok(value),
            other => Err(self.mismatch("text", &other)),
        }
    }

    pub fn optional_text(&mut self) -> Result<Option<String>, RepositoryError> {
        match self.next_value()? {
            SqlValue::Null => Ok(None),
            SqlValue::Text(value) => Ok(Some(value)),
            other => Err(self.mismatch("text or null", &other)),
        }
    }

    pub fn integer(&mut self) -> Result<i64, RepositoryError> {
        match self.next_value()? {
            SqlValue::Integer(value) => Ok(value),
            other => Err(self.mismatch("integer", &other)),
        }
    }

    pub fn optional_integer(&mut self) -> Result<Option<i64>, RepositoryError> {
        match self.next_value()? {
            SqlValue::Null => Ok(None),
            SqlValue::Integer(value) => Ok(Some(value)),
            other => Err(self.mismatch("integer or null", &other)),
        }
    }

    // SQLite hands back integers for REAL columns holding whole numbers
    pub fn real(&mut self) -> Result<f64, RepositoryError> {
        match self.next_value()? {
            SqlValue::Real(value) => Ok(value),
            SqlValue::Integer(value) => Ok(value as f64),
            other => Err(self.mismatch("real", &other)),
        }
    }

    pub fn optional_real(&mut self) -> Result<Option<f64>, RepositoryError> {
        match self.next_value()? {
            SqlValue::Null => Ok(None),
            SqlValue::Real(value) => Ok(Some(value)),
            SqlValue::Integer(value) => Ok(Some(value as f64)),
            other => Err(self.mismatch("real or null", &other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reader_reads_in_order() {
        let mut reader = ValueReader::new(
            "t",
            vec![
                SqlValue::Text("a".to_string()),
                SqlValue::Null,
                SqlValue::Integer(3),
                SqlValue::Integer(4),
            ],
        );

        assert_eq!(reader.text().unwrap(), "a");
        assert_eq!(reader.optional_integer().unwrap(), None);
        assert_eq!(reader.integer().unwrap(), 3);
        assert_eq!(reader.real().unwrap(), 4.0);
        assert!(reader.text().is_err());
    }

    #[test]
    fn test_reader_reports_type_mismatch() {
        let mut reader = ValueReader::new("water_entries", vec![SqlValue::Real(1.5)]);
        let err = reader.text().unwrap_err().to_string();
        assert!(err.contains("water_entries"));
        assert!(err.contains("expected text"));
    }

    #[test]
    fn test_option_into_sql_value() {
        assert_eq!(SqlValue::from(None::<String>), SqlValue::Null);
        assert_eq!(SqlValue::from(Some(2_i64)), SqlValue::Integer(2));
    }
}
