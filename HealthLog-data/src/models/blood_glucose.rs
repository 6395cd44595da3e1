use serde::{Deserialize, Serialize};

use super::record::{Column, ColumnKind, LogRecord, NewLogRecord, RecordHeader, SqlValue, ValueReader};
use crate::repository::RepositoryError;

/// Storage model for a blood glucose reading
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BloodGlucoseRecord {
    /// Unique identifier for the reading
    pub id: String,

    /// Owner of the reading
    pub user_id: String,

    /// Glucose concentration in mg/dL
    pub value_mg_dl: f64,

    /// Optional measurement context (fasting, after_meal, ...)
    pub context: Option<String>,

    /// Optional notes about the reading
    pub notes: Option<String>,

    /// When the reading was taken
    pub timestamp: String,

    /// When the row was inserted
    pub created_at: String,
}

/// Input data for storing a new blood glucose reading
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewBloodGlucoseRecord {
    pub user_id: String,
    pub value_mg_dl: f64,
    pub context: Option<String>,
    pub notes: Option<String>,
    pub timestamp: String,
}

impl NewLogRecord for NewBloodGlucoseRecord {
    fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl LogRecord for BloodGlucoseRecord {
    type New = NewBloodGlucoseRecord;

    const TABLE: &'static str = "blood_glucose_entries";

    const FIELDS: &'static [Column] = &[
        Column::required("value_mg_dl", ColumnKind::Real),
        Column::optional("context", ColumnKind::Text),
        Column::optional("notes", ColumnKind::Text),
    ];

    fn from_new(id: String, created_at: String, new: Self::New) -> Self {
        Self {
            id,
            user_id: new.user_id,
            value_mg_dl: new.value_mg_dl,
            context: new.context,
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
            self.value_mg_dl.into(),
            self.context.clone().into(),
            self.notes.clone().into(),
        ]
    }

    fn from_row(header: RecordHeader, mut fields: ValueReader) -> Result<Self, RepositoryError> {
        Ok(Self {
            value_mg_dl: fields.real()?,
            context: fields.optional_text()?,
            notes: fields.optional_text()?,
            id: header.id,
            user_id: header.user_id,
            timestamp: header.timestamp,
            created_at: header.created_at,
        })
    }
}
