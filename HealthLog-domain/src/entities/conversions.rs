use health_log_data::models::{
    BloodGlucoseRecord, BloodPressureRecord, InsulinRecord, MealRecord, NewBloodGlucoseRecord,
    NewBloodPressureRecord, NewInsulinRecord, NewMealRecord, NewWaterRecord, NewWeightRecord,
    WaterRecord, WeightRecord,
};

use crate::entities::{
    BloodGlucoseEntry, BloodPressureEntry, InsulinEntry, LogBloodGlucoseRequest,
    LogBloodPressureRequest, LogInsulinRequest, LogMealRequest, LogWaterRequest,
    LogWeightRequest, MealEntry, WaterEntry, WeightEntry,
};
use crate::services::insights::{categorize_blood_pressure, classify_glucose};

/// Conversion functions between domain entities and data models.
/// `convert_to_data_*` builds the insert payload for a validated request with
/// the owner and normalized timestamp already resolved. `convert_to_domain_*`
/// rebuilds the client-facing entry and fails if a stored enum is unknown.

fn parse_optional<T>(value: Option<String>) -> Result<Option<T>, String>
where
    T: std::str::FromStr<Err = String>,
{
    value.as_deref().map(str::parse).transpose()
}

pub fn convert_to_data_glucose(request: LogBloodGlucoseRequest, user_id: String, timestamp: String) -> NewBloodGlucoseRecord {
    NewBloodGlucoseRecord {
        user_id,
        value_mg_dl: request.value_mg_dl,
        context: request.context.map(|c| c.as_str().to_string()),
        notes: request.notes,
        timestamp,
    }
}

pub fn convert_to_domain_glucose(record: BloodGlucoseRecord) -> Result<BloodGlucoseEntry, String> {
    Ok(BloodGlucoseEntry {
        range: classify_glucose(record.value_mg_dl),
        context: parse_optional(record.context)?,
        id: record.id,
        user_id: record.user_id,
        value_mg_dl: record.value_mg_dl,
        notes: record.notes,
        timestamp: record.timestamp,
        created_at: record.created_at,
    })
}

pub fn convert_to_data_blood_pressure(request: LogBloodPressureRequest, user_id: String, timestamp: String) -> NewBloodPressureRecord {
    NewBloodPressureRecord {
        user_id,
        systolic: request.systolic,
        diastolic: request.diastolic,
        pulse: request.pulse,
        position: request.position.map(|p| p.as_str().to_string()),
        arm: request.arm.map(|a| a.as_str().to_string()),
        notes: request.notes,
        timestamp,
    }
}

pub fn convert_to_domain_blood_pressure(record: BloodPressureRecord) -> Result<BloodPressureEntry, String> {
    Ok(BloodPressureEntry {
        category: categorize_blood_pressure(record.systolic, record.diastolic),
        position: parse_optional(record.position)?,
        arm: parse_optional(record.arm)?,
        id: record.id,
        user_id: record.user_id,
        systolic: record.systolic,
        diastolic: record.diastolic,
        pulse: record.pulse,
        notes: record.notes,
        timestamp: record.timestamp,
        created_at: record.created_at,
    })
}

pub fn convert_to_data_meal(request: LogMealRequest, user_id: String, timestamp: String) -> NewMealRecord {
    NewMealRecord {
        user_id,
        meal_type: request.meal_type.as_str().to_string(),
        description: request.description,
        carbs_g: request.carbs_g,
        calories: request.calories,
        notes: request.notes,
        timestamp,
    }
}

pub fn convert_to_domain_meal(record: MealRecord) -> Result<MealEntry, String> {
    Ok(MealEntry {
        meal_type: record.meal_type.parse()?,
        id: record.id,
        user_id: record.user_id,
        description: record.description,
        carbs_g: record.carbs_g,
        calories: record.calories,
        notes: record.notes,
        timestamp: record.timestamp,
        created_at: record.created_at,
    })
}

pub fn convert_to_data_water(request: LogWaterRequest, user_id: String, timestamp: String) -> NewWaterRecord {
    NewWaterRecord {
        user_id,
        ml: request.ml,
        timestamp,
    }
}

pub fn convert_to_domain_water(record: WaterRecord) -> Result<WaterEntry, String> {
    Ok(WaterEntry {
        id: record.id,
        user_id: record.user_id,
        ml: record.ml,
        timestamp: record.timestamp,
        created_at: record.created_at,
    })
}

pub fn convert_to_data_insulin(request: LogInsulinRequest, user_id: String, timestamp: String) -> NewInsulinRecord {
    NewInsulinRecord {
        user_id,
        units: request.units,
        insulin_type: request.insulin_type.as_str().to_string(),
        notes: request.notes,
        timestamp,
    }
}

pub fn convert_to_domain_insulin(record: InsulinRecord) -> Result<InsulinEntry, String> {
    Ok(InsulinEntry {
        insulin_type: record.insulin_type.parse()?,
        id: record.id,
        user_id: record.user_id,
        units: record.units,
        notes: record.notes,
        timestamp: record.timestamp,
        created_at: record.created_at,
    })
}

pub fn convert_to_data_weight(request: LogWeightRequest, user_id: String, timestamp: String) -> NewWeightRecord {
    NewWeightRecord {
        user_id,
        weight_kg: request.weight_kg,
        body_fat_percentage: request.body_fat_percentage,
        notes: request.notes,
        timestamp,
    }
}

pub fn convert_to_domain_weight(record: WeightRecord) -> Result<WeightEntry, String> {
    Ok(WeightEntry {
        id: record.id,
        user_id: record.user_id,
        weight_kg: record.weight_kg,
        body_fat_percentage: record.body_fat_percentage,
        notes: record.notes,
        timestamp: record.timestamp,
        created_at: record.created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Arm, BloodPressureCategory, BodyPosition, GlucoseRange, MealType};

    #[test]
    fn test_blood_pressure_request_to_data() {
        let request = LogBloodPressureRequest {
            systolic: 135,
            diastolic: 85,
            pulse: Some(70),
            position: Some(BodyPosition::Standing),
            arm: Some(Arm::Right),
            notes: Some("after stairs".to_string()),
            timestamp: "2024-03-01T09:30:00+02:00".to_string(),
        };

        let new = convert_to_data_blood_pressure(
            request,
            "user-1".to_string(),
            "2024-03-01T07:30:00.000Z".to_string(),
        );

        assert_eq!(new.user_id, "user-1");
        assert_eq!(new.position.as_deref(), Some("standing"));
        assert_eq!(new.arm.as_deref(), Some("right"));
        assert_eq!(new.timestamp, "2024-03-01T07:30:00.000Z");
    }

    #[test]
    fn test_blood_pressure_entry_carries_category() {
        let record = BloodPressureRecord {
            id: "a".to_string(),
            user_id: "user-1".to_string(),
            systolic: 135,
            diastolic: 85,
            pulse: None,
            position: Some("sitting".to_string()),
            arm: None,
            notes: None,
            timestamp: "2024-03-01T07:30:00.000Z".to_string(),
            created_at: "2024-03-01T07:31:00.000Z".to_string(),
        };

        let entry = convert_to_domain_blood_pressure(record).unwrap();
        assert_eq!(entry.category, BloodPressureCategory::Hypertension1);
        assert_eq!(entry.position, Some(BodyPosition::Sitting));
    }

    #[test]
    fn test_glucose_entry_carries_range() {
        let record = BloodGlucoseRecord {
            id: "g".to_string(),
            user_id: "user-1".to_string(),
            value_mg_dl: 62.0,
            context: None,
            notes: None,
            timestamp: "2024-03-01T07:30:00.000Z".to_string(),
            created_at: "2024-03-01T07:31:00.000Z".to_string(),
        };

        assert_eq!(convert_to_domain_glucose(record).unwrap().range, GlucoseRange::Low);
    }

    #[test]
    fn test_unknown_stored_enum_is_an_error() {
        let record = MealRecord {
            id: "m".to_string(),
            user_id: "user-1".to_string(),
            meal_type: "brunch".to_string(),
            description: "Eggs".to_string(),
            carbs_g: None,
            calories: None,
            notes: None,
            timestamp: "2024-03-01T07:30:00.000Z".to_string(),
            created_at: "2024-03-01T07:31:00.000Z".to_string(),
        };

        assert!(convert_to_domain_meal(record.clone()).is_err());

        let lunch = MealRecord { meal_type: "lunch".to_string(), ..record };
        assert_eq!(convert_to_domain_meal(lunch).unwrap().meal_type, MealType::Lunch);
    }
}
