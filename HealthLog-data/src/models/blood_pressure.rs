use serde::{Deserialize, Serialize};

use super::record::{Column, ColumnKind, LogRecord, NewLogRecord, RecordHeader, SqlValue, ValueReader};
use crate::repository::RepositoryError;

/// Storage model for a blood pressure reading
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BloodPressureRecord {
    /// Unique identifier for the reading
    pub id: String,

    /// Owner of the reading
    pub user_id: String,

    /// Systolic blood pressure (the higher number)
    pub systolic: u16,

    /// Diastolic blood pressure (the lower number)
    pub diastolic: u16,

    /// Optional pulse rate in beats per minute
    pub pulse: Option<u16>,

    /// Optional position (e.g., sitting, standing)
    pub position: Option<String>,

    /// Optional arm used (left or right)
    pub arm: Option<String>,

    /// Optional notes about the reading
    pub notes: Option<String>,

    /// When the reading was taken
    pub timestamp: String,

    /// When the row was inserted
    pub created_at: String,
}

/// Input data for storing a new blood pressure reading
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewBloodPressureRecord {
    pub user_id: String,
    pub systolic: u16,
    pub diastolic: u16,
    pub pulse: Option<u16>,
    pub position: Option<String>,
    pub arm: Option<String>,
    pub notes: Option<String>,
    pub timestamp: String,
}

impl NewLogRecord for NewBloodPressureRecord {
    fn user_id(&self) -> &str {
        &self.user_id
    }
}

fn to_u16(value: i64, column: &str) -> Result<u16, RepositoryError> {
    u16::try_from(value)
        .map_err(|_| RepositoryError::Decode(format!("{} out of range: {}", column, value)))
}

impl LogRecord for BloodPressureRecord {
    type New = NewBloodPressureRecord;

    const TABLE: &'static str = "blood_pressure_entries";

    const FIELDS: &'static [Column] = &[
        Column::required("systolic", ColumnKind::Integer),
        Column::required("diastolic", ColumnKind::Integer),
        Column::optional("pulse", ColumnKind::Integer),
        Column::optional("position", ColumnKind::Text),
        Column::optional("arm", ColumnKind::Text),
        Column::optional("notes", ColumnKind::Text),
    ];

    fn from_new(id: String, created_at: String, new: Self::New) -> Self {
        Self {
            id,
            user_id: new.user_id,
            systolic: new.systolic,
            diastolic: new.diastolic,
            pulse: new.pulse,
            position: new.position,
            arm: new.arm,
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
            i64::from(self.systolic).into(),
            i64::from(self.diastolic).into(),
            self.pulse.map(i64::from).into(),
            self.position.clone().into(),
            self.arm.clone().into(),
            self.notes.clone().into(),
        ]
    }

    fn from_row(header: RecordHeader, mut fields: ValueReader) -> Result<Self, RepositoryError> {
        let systolic = to_u16(fields.integer()?, "systolic")?;
        let diastolic = to_u16(fields.integer()?, "diastolic")?;
        let pulse = fields
            .optional_integer()?
            .map(|p| to_u16(p, "pulse"))
            .transpose()?;

        Ok(Self {
            systolic,
            diastolic,
            pulse,
            position: fields.optional_text()?,
            arm: fields.optional_text()?,
            notes: fields.optional_text()?,
            id: header.id,
            user_id: header.user_id,
            timestamp: header.timestamp,
            created_at: header.created_at,
        })
    }
}
