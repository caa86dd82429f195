//! Domain DTOs for the health metrics API.
//!
//! # Design
//! These types mirror the API's JSON schema but are defined independently of
//! the mock-server crate; integration tests catch schema drift. History
//! `inputs` and `result` vary by calculator, so they stay an open `Fields`
//! mapping instead of a record per calculator.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Open string-to-JSON mapping used for history `inputs` and `result`.
pub type Fields = serde_json::Map<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

/// Biological sex as the formulas use it. Sent as `true` (male) / `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "bool", into = "bool")]
pub enum Gender {
    Male,
    Female,
}

impl From<bool> for Gender {
    fn from(is_male: bool) -> Self {
        if is_male {
            Gender::Male
        } else {
            Gender::Female
        }
    }
}

impl From<Gender> for bool {
    fn from(gender: Gender) -> Self {
        gender == Gender::Male
    }
}

impl FromStr for Gender {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" | "m" => Ok(Gender::Male),
            "female" | "f" => Ok(Gender::Female),
            "" => Err(ApiError::validation("Please select a gender.")),
            other => Err(ApiError::validation(format!(
                "Unknown gender '{other}', expected 'male' or 'female'."
            ))),
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "Male"),
            Gender::Female => write!(f, "Female"),
        }
    }
}

/// Activity multiplier for the calorie calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActivityLevel {
    #[serde(rename = "Sedentary")]
    Sedentary,
    #[serde(rename = "Lightly Active")]
    LightlyActive,
    #[serde(rename = "Moderately Active")]
    ModeratelyActive,
    #[serde(rename = "Very Active")]
    VeryActive,
    #[serde(rename = "Extra Active")]
    ExtraActive,
}

impl ActivityLevel {
    pub const ALL: [ActivityLevel; 5] = [
        ActivityLevel::Sedentary,
        ActivityLevel::LightlyActive,
        ActivityLevel::ModeratelyActive,
        ActivityLevel::VeryActive,
        ActivityLevel::ExtraActive,
    ];

    /// The label the API expects on the wire.
    pub fn label(self) -> &'static str {
        match self {
            ActivityLevel::Sedentary => "Sedentary",
            ActivityLevel::LightlyActive => "Lightly Active",
            ActivityLevel::ModeratelyActive => "Moderately Active",
            ActivityLevel::VeryActive => "Very Active",
            ActivityLevel::ExtraActive => "Extra Active",
        }
    }
}

impl FromStr for ActivityLevel {
    type Err = ApiError;

    /// Accepts the wire label or its kebab/snake form, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .trim()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        ActivityLevel::ALL
            .into_iter()
            .find(|level| level.label().replace(' ', "").to_ascii_lowercase() == wanted)
            .ok_or_else(|| {
                ApiError::validation(format!(
                    "Unknown activity level '{}', expected one of: {}.",
                    s.trim(),
                    ActivityLevel::ALL.map(ActivityLevel::label).join(", ")
                ))
            })
    }
}

impl fmt::Display for ActivityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The five calculators the API exposes under `/calc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Calculator {
    Bmi,
    BodyFat,
    Calorie,
    Bmr,
    IdealWeight,
}

impl Calculator {
    /// Path segment under `/calc`; also the `calc_type` of stored records.
    pub fn slug(self) -> &'static str {
        match self {
            Calculator::Bmi => "bmi",
            Calculator::BodyFat => "body-fat",
            Calculator::Calorie => "calorie",
            Calculator::Bmr => "bmr",
            Calculator::IdealWeight => "ideal-weight",
        }
    }
}

// ---------------------------------------------------------------------------
// Calculation requests
// ---------------------------------------------------------------------------

/// A calculator request: knows its endpoint, its success shape and how to
/// check itself before it is sent.
pub trait Calculation: Serialize {
    type Output: DeserializeOwned;

    const CALCULATOR: Calculator;

    fn username(&self) -> Option<&str>;

    /// Presence and parseability checks only; ranges are the server's job.
    fn validate(&self) -> Result<(), ApiError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiRequest {
    pub username: Option<String>,
    pub age_years: u32,
    pub gender: Gender,
    pub weight_kg: f64,
    pub height_cm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyFatRequest {
    pub username: Option<String>,
    pub age_years: u32,
    pub gender: Gender,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub neck_cm: f64,
    pub waist_cm: f64,
    pub hip_cm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorieRequest {
    pub username: Option<String>,
    pub age_years: u32,
    pub gender: Gender,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub activity_factor: ActivityLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmrRequest {
    pub username: Option<String>,
    pub age_years: u32,
    pub gender: Gender,
    pub weight_kg: f64,
    pub height_cm: f64,
}

/// Ideal weight depends on height and sex only; there is no weight field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdealWeightRequest {
    pub username: Option<String>,
    pub age_years: u32,
    pub gender: Gender,
    pub height_cm: f64,
}

fn ensure_finite(field: &str, value: f64) -> Result<(), ApiError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ApiError::validation(format!("{field} must be a number.")))
    }
}

fn ensure_optional_username(username: Option<&str>) -> Result<(), ApiError> {
    match username {
        Some(name) if name.trim().is_empty() => {
            Err(ApiError::validation("Username must not be blank."))
        }
        _ => Ok(()),
    }
}

impl Calculation for BmiRequest {
    type Output = BmiResult;
    const CALCULATOR: Calculator = Calculator::Bmi;

    fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    fn validate(&self) -> Result<(), ApiError> {
        ensure_optional_username(self.username())?;
        ensure_finite("weight_kg", self.weight_kg)?;
        ensure_finite("height_cm", self.height_cm)
    }
}

impl Calculation for BodyFatRequest {
    type Output = BodyFatResult;
    const CALCULATOR: Calculator = Calculator::BodyFat;

    fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    fn validate(&self) -> Result<(), ApiError> {
        ensure_optional_username(self.username())?;
        ensure_finite("weight_kg", self.weight_kg)?;
        ensure_finite("height_cm", self.height_cm)?;
        ensure_finite("neck_cm", self.neck_cm)?;
        ensure_finite("waist_cm", self.waist_cm)?;
        ensure_finite("hip_cm", self.hip_cm)
    }
}

impl Calculation for CalorieRequest {
    type Output = CalorieResult;
    const CALCULATOR: Calculator = Calculator::Calorie;

    fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    fn validate(&self) -> Result<(), ApiError> {
        ensure_optional_username(self.username())?;
        ensure_finite("weight_kg", self.weight_kg)?;
        ensure_finite("height_cm", self.height_cm)
    }
}

impl Calculation for BmrRequest {
    type Output = BmrResult;
    const CALCULATOR: Calculator = Calculator::Bmr;

    fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    fn validate(&self) -> Result<(), ApiError> {
        ensure_optional_username(self.username())?;
        ensure_finite("weight_kg", self.weight_kg)?;
        ensure_finite("height_cm", self.height_cm)
    }
}

impl Calculation for IdealWeightRequest {
    type Output = IdealWeightResult;
    const CALCULATOR: Calculator = Calculator::IdealWeight;

    fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    fn validate(&self) -> Result<(), ApiError> {
        ensure_optional_username(self.username())?;
        ensure_finite("height_cm", self.height_cm)
    }
}

// ---------------------------------------------------------------------------
// Calculation results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    pub bmi_value: f64,
    pub bmi_category: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyFatResult {
    pub body_fat_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalorieResult {
    pub daily_calories: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BmrResult {
    pub bmr_value: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IdealWeightResult {
    pub min_weight_kg: f64,
    pub max_weight_kg: f64,
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// One stored calculation as the API returns it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: i64,
    pub calc_type: String,
    #[serde(default)]
    pub inputs: Fields,
    #[serde(default)]
    pub result: Fields,
    /// Kept in the offset the server sent it with.
    #[serde(default, deserialize_with = "timestamp::deserialize")]
    pub created_at: Option<DateTime<FixedOffset>>,
}

/// Parameters for listing a user's history. `None` leaves the server default
/// (limit 100, offset 0).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryQuery {
    pub username: String,
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl HistoryQuery {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            limit: None,
            offset: None,
        }
    }
}

/// PATCH payload. Omitted parts are sent as explicit `null` and left
/// untouched by the server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordUpdate {
    pub username: String,
    pub inputs: Option<Fields>,
    pub result: Option<Fields>,
}

/// Result of a delete call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The server removed the record; `detail` is its message, if any.
    Deleted { detail: Option<String> },
    /// Confirmation was refused, nothing was sent.
    Cancelled,
}

/// Lenient `created_at` parsing: RFC 3339 with its offset preserved, or an
/// offset-less ISO timestamp read as UTC.
pub mod timestamp {
    use chrono::{DateTime, FixedOffset, NaiveDateTime};
    use serde::{de, Deserialize, Deserializer};

    pub fn parse(raw: &str) -> Result<DateTime<FixedOffset>, chrono::ParseError> {
        DateTime::parse_from_rfc3339(raw)
            .or_else(|_| raw.parse::<NaiveDateTime>().map(|naive| naive.and_utc().fixed_offset()))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        raw.map(|s| parse(&s).map_err(de::Error::custom)).transpose()
    }
}
