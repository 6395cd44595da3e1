use serde::{Deserialize, Serialize};

use super::record::{Column, ColumnKind, LogRecord, NewLogRecord, RecordHeader, SqlValue, ValueReader};
use crate::repository::RepositoryError;

/// Storage model for a water intake entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WaterRecord {
    pub id: String,
    pub user_id: String,
    /// Amount in millilitres
    pub ml: i64,
    pub timestamp: String,
    pub created_at: String,
}

/// Input data for storing a new water intake entry
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewWaterRecord {
    pub user_id: String,
    pub ml: i64,
    pub timestamp: String,
}

impl NewLogRecord for NewWaterRecord {
    fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl LogRecord for WaterRecord {
    type New = NewWaterRecord;

    const TABLE: &'static str = "water_entries";

    const FIELDS: &'static [Column] = &[Column::required("ml", ColumnKind::Integer)];

    fn from_new(id: String, created_at: String, new: Self::New) -> Self {
        Self {
            id,
            user_id: new.user_id,
            ml: new.ml,
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
        vec![self.ml.into()]
    }

    fn from_row(header: RecordHeader, mut fields: ValueReader) -> Result<Self, RepositoryError> {
        Ok(Self {
            ml: fields.integer()?,
            id: header.id,
            user_id: header.user_id,
            timestamp: header.timestamp,
            created_at: header.created_at,
        })
    }
}
