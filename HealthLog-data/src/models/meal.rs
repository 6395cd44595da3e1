use serde::{Deserialize, Serialize};

use super::record::{Column, ColumnKind, LogRecord, NewLogRecord, RecordHeader, SqlValue, ValueReader};
use crate::repository::RepositoryError;

/// Storage model for a logged meal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MealRecord {
    pub id: String,
    pub user_id: String,
    /// breakfast, lunch, dinner or snack
    pub meal_type: String,
    pub description: String,
    /// Carbohydrates in grams
    pub carbs_g: Option<f64>,
    pub calories: Option<i64>,
    pub notes: Option<String>,
    pub timestamp: String,
    pub created_at: String,
}

/// Input data for storing a new meal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewMealRecord {
    pub user_id: String,
    pub meal_type: String,
    pub description: String,
    pub carbs_g: Option<f64>,
    pub calories: Option<i64>,
    pub notes: Option<String>,
    pub timestamp: String,
}

impl NewLogRecord for NewMealRecord {
    fn user_id(&self) -> &str {
        &self.user_id
    }
}

impl LogRecord for MealRecord {
    type New = NewMealRecord;

    const TABLE: &'static str = "meal_entries";

    const FIELDS: &'static [Column] = &[
        Column::required("meal_type", ColumnKind::Text),
        Column::required("description", ColumnKind::Text),
        Column::optional("carbs_g", ColumnKind::Real),
        Column::optional("calories", ColumnKind::Integer),
        Column::optional("notes", ColumnKind::Text),
    ];

    fn from_new(id: String, created_at: String, new: Self::New) -> Self {
        Self {
            id,
            user_id: new.user_id,
            meal_type: new.meal_type,
            description: new.description,
            carbs_g: new.carbs_g,
            calories: new.calories,
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
            self.meal_type.clone().into(),
            self.description.clone().into(),
            self.carbs_g.into(),
            self.calories.into(),
            self.notes.clone().into(),
        ]
    }

    fn from_row(header: RecordHeader, mut fields: ValueReader) -> Result<Self, RepositoryError> {
        Ok(Self {
            meal_type: fields.text()?,
            description: fields.text()?,
            carbs_g: fields.optional_real()?,
            calories: fields.optional_integer()?,
            notes: fields.optional_text()?,
            id: header.id,
            user_id: header.user_id,
            timestamp: header.timestamp,
            created_at: header.created_at,
        })
    }
}
