use crate::entities::{BloodPressureCategory, GlucoseRange};

/// Lower bound of the glucose target range in mg/dL
pub const GLUCOSE_TARGET_LOW: f64 = 70.0;

/// Upper bound of the glucose target range in mg/dL
pub const GLUCOSE_TARGET_HIGH: f64 = 180.0;

/// Categorize blood pressure based on measurements
pub fn categorize_blood_pressure(systolic: u16, diastolic: u16) -> BloodPressureCategory {
    if systolic >= 180 || diastolic >= 120 {
        BloodPressureCategory::HypertensiveCrisis
    } else if systolic >= 140 || diastolic >= 90 {
        BloodPressureCategory::Hypertension2
    } else if systolic >= 130 || diastolic >= 80 {
        BloodPressureCategory::Hypertension1
    } else if systolic >= 120 {
        BloodPressureCategory::Elevated
    } else {
        BloodPressureCategory::Normal
    }
}

/// Place a glucose value relative to the target range
pub fn classify_glucose(value_mg_dl: f64) -> GlucoseRange {
    if value_mg_dl < GLUCOSE_TARGET_LOW {
        GlucoseRange::Low
    } else if value_mg_dl > GLUCOSE_TARGET_HIGH {
        GlucoseRange::High
    } else {
        GlucoseRange::InRange
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bp_category_normal() {
        let category = categorize_blood_pressure(110, 75);
        assert_eq!(category, BloodPressureCategory::Normal);
    }

    #[test]
    fn test_bp_category_elevated() {
        let category = categorize_blood_pressure(125, 75);
        assert_eq!(category, BloodPressureCategory::Elevated);
    }

    #[test]
    fn test_bp_category_hypertension1() {
        // systolic drives the category
        assert_eq!(categorize_blood_pressure(135, 75), BloodPressureCategory::Hypertension1);

        // diastolic drives the category
        assert_eq!(categorize_blood_pressure(120, 85), BloodPressureCategory::Hypertension1);
    }

    #[test]
    fn test_bp_category_hypertension2() {
        assert_eq!(categorize_blood_pressure(145, 75), BloodPressureCategory::Hypertension2);
        assert_eq!(categorize_blood_pressure(120, 95), BloodPressureCategory::Hypertension2);
    }

    #[test]
    fn test_bp_category_crisis() {
        assert_eq!(categorize_blood_pressure(185, 75), BloodPressureCategory::HypertensiveCrisis);
        assert_eq!(categorize_blood_pressure(150, 125), BloodPressureCategory::HypertensiveCrisis);
    }

    #[test]
    fn test_glucose_range_boundaries() {
        assert_eq!(classify_glucose(69.9), GlucoseRange::Low);
        assert_eq!(classify_glucose(70.0), GlucoseRange::InRange);
        assert_eq!(classify_glucose(180.0), GlucoseRange::InRange);
        assert_eq!(classify_glucose(180.5), GlucoseRange::High);
    }
}
