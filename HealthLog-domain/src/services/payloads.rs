use health_log_data::models::{
    BloodGlucoseRecord, BloodPressureRecord, InsulinRecord, MealRecord, NewBloodGlucoseRecord,
    NewBloodPressureRecord, NewInsulinRecord, NewMealRecord, NewWaterRecord, NewWeightRecord,
    WaterRecord, WeightRecord,
};

use crate::entities::conversions;
use crate::entities::{
    BloodGlucoseEntry, BloodPressureEntry, InsulinEntry, LogBloodGlucoseRequest,
    LogBloodPressureRequest, LogInsulinRequest, LogMealRequest, LogWaterRequest,
    LogWeightRequest, MealEntry, WaterEntry, WeightEntry,
};
use super::log_entry::LogPayload;

impl LogPayload for LogBloodGlucoseRequest {
    type Record = BloodGlucoseRecord;
    type Entry = BloodGlucoseEntry;
    const KIND: &'static str = "blood glucose";

    fn timestamp(&self) -> &str {
        &self.timestamp
    }

    fn into_new_record(self, user_id: String, timestamp: String) -> NewBloodGlucoseRecord {
        conversions::convert_to_data_glucose(self, user_id, timestamp)
    }

    fn into_entry(record: BloodGlucoseRecord) -> Result<BloodGlucoseEntry, String> {
        conversions::convert_to_domain_glucose(record)
    }
}

impl LogPayload for LogBloodPressureRequest {
    type Record = BloodPressureRecord;
    type Entry = BloodPressureEntry;
    const KIND: &'static str = "blood pressure";

    fn timestamp(&self) -> &str {
        &self.timestamp
    }

    fn into_new_record(self, user_id: String, timestamp: String) -> NewBloodPressureRecord {
        conversions::convert_to_data_blood_pressure(self, user_id, timestamp)
    }

    fn into_entry(record: BloodPressureRecord) -> Result<BloodPressureEntry, String> {
        conversions::convert_to_domain_blood_pressure(record)
    }
}

impl LogPayload for LogMealRequest {
    type Record = MealRecord;
    type Entry = MealEntry;
    const KIND: &'static str = "meal";

    fn timestamp(&self) -> &str {
        &self.timestamp
    }

    fn into_new_record(self, user_id: String, timestamp: String) -> NewMealRecord {
        conversions::convert_to_data_meal(self, user_id, timestamp)
    }

    fn into_entry(record: MealRecord) -> Result<MealEntry, String> {
        conversions::convert_to_domain_meal(record)
    }
}

impl LogPayload for LogWaterRequest {
    type Record = WaterRecord;
    type Entry = WaterEntry;
    const KIND: &'static str = "water";

    fn timestamp(&self) -> &str {
        &self.timestamp
    }

    fn into_new_record(self, user_id: String, timestamp: String) -> NewWaterRecord {
        conversions::convert_to_data_water(self, user_id, timestamp)
    }

    fn into_entry(record: WaterRecord) -> Result<WaterEntry, String> {
        conversions::convert_to_domain_water(record)
    }
}

impl LogPayload for LogInsulinRequest {
    type Record = InsulinRecord;
    type Entry = InsulinEntry;
    const KIND: &'static str = "insulin";

    fn timestamp(&self) -> &str {
        &self.timestamp
    }

    fn into_new_record(self, user_id: String, timestamp: String) -> NewInsulinRecord {
        conversions::convert_to_data_insulin(self, user_id, timestamp)
    }

    fn into_entry(record: InsulinRecord) -> Result<InsulinEntry, String> {
        conversions::convert_to_domain_insulin(record)
    }
}

impl LogPayload for LogWeightRequest {
    type Record = WeightRecord;
    type Entry = WeightEntry;
    const KIND: &'static str = "weight";

    fn timestamp(&self) -> &str {
        &self.timestamp
    }

    fn into_new_record(self, user_id: String, timestamp: String) -> NewWeightRecord {
        conversions::convert_to_data_weight(self, user_id, timestamp)
    }

    fn into_entry(record: WeightRecord) -> Result<WeightEntry, String> {
        conversions::convert_to_domain_weight(record)
    }
}
