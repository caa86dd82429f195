//! Reference formulas the mock server answers with.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bmi {
    pub bmi_value: f64,
    pub bmi_category: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BodyFat {
    pub body_fat_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Calories {
    pub daily_calories: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bmr {
    pub bmr_value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IdealWeight {
    pub min_weight_kg: f64,
    pub max_weight_kg: f64,
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn require_positive(field: &str, value: f64) -> Result<(), String> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(format!("{field} must be greater than zero"))
    }
}

pub fn bmi(weight_kg: f64, height_cm: f64) -> Result<Bmi, String> {
    require_positive("height_cm", height_cm)?;
    let height_m = height_cm / 100.0;
    let value = weight_kg / (height_m * height_m);
    let category = match value {
        v if v < 18.5 => "Underweight",
        v if v < 25.0 => "Normal",
        v if v < 30.0 => "Overweight",
        _ => "Obese",
    };
    Ok(Bmi {
        bmi_value: round2(value),
        bmi_category: category,
    })
}

/// U.S. Navy method. Men use waist - neck, women waist + hip - neck.
pub fn body_fat(male: bool, height_cm: f64, neck_cm: f64, waist_cm: f64, hip_cm: f64) -> Result<BodyFat, String> {
    require_positive("height_cm", height_cm)?;
    let percentage = if male {
        let girth = waist_cm - neck_cm;
        require_positive("waist_cm - neck_cm", girth)?;
        495.0 / (1.0324 - 0.19077 * girth.log10() + 0.15456 * height_cm.log10()) - 450.0
    } else {
        let girth = waist_cm + hip_cm - neck_cm;
        require_positive("waist_cm + hip_cm - neck_cm", girth)?;
        495.0 / (1.29579 - 0.35004 * girth.log10() + 0.22100 * height_cm.log10()) - 450.0
    };
    Ok(BodyFat {
        body_fat_percentage: round2(percentage),
    })
}

/// Mifflin-St Jeor, unrounded.
fn mifflin_st_jeor(male: bool, age_years: i64, weight_kg: f64, height_cm: f64) -> f64 {
    let base = 10.0 * weight_kg + 6.25 * height_cm - 5.0 * age_years as f64;
    if male {
        base + 5.0
    } else {
        base - 161.0
    }
}

pub fn bmr(male: bool, age_years: i64, weight_kg: f64, height_cm: f64) -> Bmr {
    Bmr {
        bmr_value: mifflin_st_jeor(male, age_years, weight_kg, height_cm).trunc() as i64,
    }
}

/// Unknown activity labels fall back to sedentary.
pub fn activity_multiplier(label: &str) -> f64 {
    match label {
        "Lightly Active" => 1.375,
        "Moderately Active" => 1.55,
        "Very Active" => 1.725,
        "Extra Active" => 1.9,
        _ => 1.2,
    }
}

pub fn calories(male: bool, age_years: i64, weight_kg: f64, height_cm: f64, activity: &str) -> Calories {
    let needed = mifflin_st_jeor(male, age_years, weight_kg, height_cm) * activity_multiplier(activity);
    Calories {
        daily_calories: needed.round_ties_even() as i64,
    }
}

/// Robinson-style base weight with a +/-10% band.
pub fn ideal_weight(male: bool, height_cm: f64) -> Result<IdealWeight, String> {
    require_positive("height_cm", height_cm)?;
    let extra_inches = (height_cm - 152.4) / 2.54;
    let base = if male {
        48.0 + 2.7 * extra_inches
    } else {
        45.5 + 2.2 * extra_inches
    };
    Ok(IdealWeight {
        min_weight_kg: round2(base * 0.9),
        max_weight_kg: round2(base * 1.1),
    })
}
