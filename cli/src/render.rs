//! Plain-text result panels.

use health_core::{
    ActivityLevel, BmiResult, BmrResult, BodyFatResult, CalorieResult, DeleteOutcome, Fields,
    HistoryRecord, IdealWeightResult,
};
use serde_json::Value;

const SAVED: &str = "✓ Saved to history";
const NO_HISTORY: &str = "No calculation history found for this username.";

fn panel(title: &str, lines: &[String], saved: bool) -> String {
    let mut out = String::from(title);
    for line in lines {
        out.push('\n');
        out.push_str(line);
    }
    if saved {
        out.push('\n');
        out.push_str(SAVED);
    }
    out
}

pub fn bmi(result: &BmiResult, saved: bool) -> String {
    panel(
        "Your BMI Results",
        &[
            format!("BMI Value: {}", result.bmi_value),
            format!("Category: {}", result.bmi_category),
        ],
        saved,
    )
}

pub fn body_fat(result: &BodyFatResult, saved: bool) -> String {
    panel(
        "Your Body Fat Results",
        &[format!("Body Fat Percentage: {}%", result.body_fat_percentage)],
        saved,
    )
}

pub fn calorie(result: &CalorieResult, activity: ActivityLevel, saved: bool) -> String {
    panel(
        "Your Daily Calorie Needs",
        &[
            format!("Daily Calories: {} kcal", result.daily_calories),
            format!("Activity Level: {activity}"),
        ],
        saved,
    )
}

pub fn bmr(result: &BmrResult, saved: bool) -> String {
    panel(
        "Your BMR Results",
        &[
            format!("Basal Metabolic Rate: {} kcal/day", result.bmr_value),
            "This is the number of calories your body needs at rest.".to_string(),
        ],
        saved,
    )
}

pub fn ideal_weight(result: &IdealWeightResult, saved: bool) -> String {
    panel(
        "Your Ideal Weight Range",
        &[
            format!("Minimum Weight: {} kg", result.min_weight_kg),
            format!("Maximum Weight: {} kg", result.max_weight_kg),
            "Based on your height and gender.".to_string(),
        ],
        saved,
    )
}

/// Strings print bare, everything else as JSON.
fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `key: value` pairs joined with ", ", or "-" when empty.
fn pairs(fields: &Fields) -> String {
    if fields.is_empty() {
        return "-".to_string();
    }
    fields
        .iter()
        .map(|(key, value)| format!("{key}: {}", scalar(value)))
        .collect::<Vec<_>>()
        .join(", ")
}

fn timestamp(record: &HistoryRecord) -> String {
    record
        .created_at
        .map(|at| at.format("%Y-%m-%d %H:%M:%S %:z").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn history(records: &[HistoryRecord]) -> String {
    if records.is_empty() {
        return NO_HISTORY.to_string();
    }
    records
        .iter()
        .map(|record| {
            format!(
                "#{} {} Calculation\n  Inputs: {}\n  Results: {}\n  Calculated on: {}",
                record.id,
                record.calc_type,
                pairs(&record.inputs),
                pairs(&record.result),
                timestamp(record),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn record(record: &HistoryRecord) -> String {
    panel(
        &format!("Record #{}", record.id),
        &[
            format!("Type: {}", record.calc_type),
            format!("Inputs: {}", pairs(&record.inputs)),
            format!("Result: {}", pairs(&record.result)),
            format!("Calculated on: {}", timestamp(record)),
        ],
        false,
    )
}

pub fn updated(record: &HistoryRecord) -> String {
    panel(
        "Record Updated",
        &[
            format!("ID: {}", record.id),
            format!("Type: {}", record.calc_type),
            format!("Inputs: {}", Value::Object(record.inputs.clone())),
            format!("Result: {}", Value::Object(record.result.clone())),
        ],
        false,
    )
}

pub fn deleted(id: i64, outcome: &DeleteOutcome) -> String {
    match outcome {
        DeleteOutcome::Deleted { detail: Some(detail) } => detail.clone(),
        DeleteOutcome::Deleted { detail: None } => format!("Record #{id} deleted."),
        DeleteOutcome::Cancelled => "Delete cancelled.".to_string(),
    }
}

pub fn healthy(url: &str) -> String {
    format!("API at {url} is healthy.")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use serde_json::json;

    fn fields(value: Value) -> Fields {
        value.as_object().cloned().unwrap()
    }

    fn sample() -> HistoryRecord {
        HistoryRecord {
            id: 4,
            calc_type: "bmi".to_string(),
            inputs: fields(json!({"height_cm": 175.0, "gender": true})),
            result: fields(json!({"bmi_category": "Normal"})),
            created_at: FixedOffset::east_opt(2 * 3600)
                .unwrap()
                .with_ymd_and_hms(2025, 5, 2, 9, 30, 0)
                .single(),
        }
    }

    #[test]
    fn bmi_panel_mentions_history_only_when_saved() {
        let result = BmiResult {
            bmi_value: 22.86,
            bmi_category: "Normal".to_string(),
        };
        assert_eq!(
            bmi(&result, false),
            "Your BMI Results\nBMI Value: 22.86\nCategory: Normal"
        );
        assert!(bmi(&result, true).ends_with(SAVED));
    }

    #[test]
    fn calorie_panel_shows_activity_label() {
        let text = calorie(
            &CalorieResult { daily_calories: 2400 },
            ActivityLevel::ModeratelyActive,
            false,
        );
        assert!(text.contains("Daily Calories: 2400 kcal"));
        assert!(text.contains("Activity Level: Moderately Active"));
    }

    #[test]
    fn empty_history_message() {
        assert_eq!(history(&[]), NO_HISTORY);
    }

    #[test]
    fn history_lists_pairs_and_timestamp() {
        let text = history(&[sample()]);
        assert!(text.starts_with("#4 bmi Calculation"));
        assert!(text.contains("Results: bmi_category: Normal"));
        assert!(text.contains("gender: true"));
        assert!(text.contains("Calculated on: 2025-05-02 09:30:00 +02:00"));
    }

    #[test]
    fn history_entries_are_separated_by_newlines() {
        let mut older = sample();
        older.id = 3;
        let text = history(&[sample(), older]);
        assert_eq!(text.lines().count(), 8);
        assert!(text.contains("09:30:00 +02:00\n#3 bmi Calculation"));
    }

    #[test]
    fn record_with_empty_parts_uses_dash() {
        let mut bare = sample();
        bare.inputs = Fields::new();
        bare.created_at = None;
        let text = record(&bare);
        assert!(text.contains("Inputs: -"));
        assert!(text.contains("Calculated on: -"));
    }

    #[test]
    fn delete_messages() {
        assert_eq!(deleted(3, &DeleteOutcome::Cancelled), "Delete cancelled.");
        assert_eq!(
            deleted(3, &DeleteOutcome::Deleted { detail: None }),
            "Record #3 deleted."
        );
    }
}
