use serde::{Deserialize, Serialize};

use super::record::{Column, ColumnKind, LogRecord, NewLogRecord, RecordHeader, SqlValue, ValueReader};
use crate::repository::RepositoryError;

/// Storage model for a weight reading
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeightRecord {
    pub id: String,
    pub user_id: String,
    pub weight_kg: f64,
    pub body_fat_percentage: Option<f64>,
    pub notes: Option<String>,
    pub timestamp: String,
    pub created_at: String,
}

/// Input data for storing a new weight reading
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewWeightRecord {
    pub user_id: String,
    pub weight_kg: f64,
    pub body_fat_percentage: Option<f64>,
    pub notes: Option<String>,
    pub timestamp: String,
}

impl NewLogRecord for NewWeightRecord {
    fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl LogRecord for WeightRecord {
    type New = NewWeightRecord;

    const TABLE: &'static str = "weight_entries";

    const FIELDS: &'static [Column] = &[
        Column::required("weight_kg", ColumnKind::Real),
        Column::optional("body_fat_percentage", ColumnKind::Real),
        Column::optional("notes", ColumnKind::Text),
    ];

    fn from_new(id: String, created_at: String, new: Self::New) -> Self {
        Self {
            id,
            user_id: new.user_id,
            weight_kg: new.weight_kg,
            body_fat_percentage: new.body_fat_percentage,
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
            self.weight_kg.into(),
            self.body_fat_percentage.into(),
            self.notes.clone().into(),
        ]
    }

    fn from_row(header: RecordHeader, mut fields: ValueReader) -> Result<Self, RepositoryError> {
        Ok(Self {
            weight_kg: fields.real()?,
            body_fat_percentage: fields.optional_real()?,
            notes: fields.optional_text()?,
            id: header.id,
            user_id: header.user_id,
            timestamp: header.timestamp,
            created_at: header.created_at,
        })
    }
}
