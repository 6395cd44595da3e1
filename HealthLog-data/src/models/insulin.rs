use serde::{Deserialize, Serialize};

use super::record::{Column, ColumnKind, LogRecord, NewLogRecord, RecordHeader, SqlValue, ValueReader};
use crate::repository::RepositoryError;

/// Storage model for an insulin dose
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InsulinRecord {
    pub id: String,
    pub user_id: String,
    /// Dose in international units
    pub units: f64,
    /// rapid, short, intermediate, long or mixed
    pub insulin_type: String,
    pub notes: Option<String>,
    pub timestamp: String,
    pub created_at: String,
}

/// Input data for storing a new insulin dose
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewInsulinRecord {
    pub user_id: String,
    pub units: f64,
    pub insulin_type: String,
    pub notes: Option<String>,
    pub timestamp: String,
}

impl NewLogRecord for NewInsulinRecord {
    fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl LogRecord for InsulinRecord {
    type New = NewInsulinRecord;

    const TABLE: &'static str = "insulin_entries";

    const FIELDS: &'static [Column] = &[
        Column::required("units", ColumnKind::Real),
        Column::required("insulin_type", ColumnKind::Text),
        Column::optional("notes", ColumnKind::Text),
    ];

    fn from_new(id: String, created_at: String, new: Self::New) -> Self {
        Self {
            id,
            user_id: new.user_id,
            units: new.units,
            insulin_type: new.insulin_type,
            notes: new.notes,
            timestamp: new.timestamp,
            created_at,
        }
    }

    fn header(&self) -> RecordHeader {
        RecordHeader {
            id: self.id.clone(),
            user_id: self.user_id.clone(),
            timestamp: self.timestamp.clone(),
            created_at: self.created_at.clone(),
        }
    }

    fn field_values(&self) -> Vec<SqlValue> {
        vec![
            self.units.into(),
            self.insulin_type.clone().into(),
            self.notes.clone().into(),
        ]
    }

    fn from_row(header: RecordHeader, mut fields: ValueReader) -> Result<Self, RepositoryError> {
        Ok(Self {
            units: fields.real()?,
            insulin_type: fields.text()?,
            notes: fields.optional_text()?,
            id: header.id,
            user_id: header.user_id,
            timestamp: header.timestamp,
            created_at: header.created_at,
        })
    }
}
