//! Turns a parsed command line into one session call and its rendered output.

use anyhow::Result;
use health_core::form::{normalize_username, parse_fields, parse_number, parse_record_id, require_username};
use health_core::{
    ActivityLevel, BmiRequest, BmrRequest, BodyFatRequest, CalorieRequest, Gender, HistoryQuery,
    IdealWeightRequest, RecordUpdate, Session, Transport,
};
use tracing::info;

use crate::cli::{BodyArgs, Command, HistoryCommand, PersonArgs};
use crate::render;

struct Person {
    username: Option<String>,
    age_years: u32,
    gender: Gender,
}

fn person(username: Option<&str>, args: &PersonArgs) -> Result<Person> {
    Ok(Person {
        username: normalize_username(username),
        age_years: parse_number("age", &args.age)?,
        gender: args.gender.parse()?,
    })
}

fn weight_and_height(args: &BodyArgs) -> Result<(f64, f64)> {
    Ok((
        parse_number("weight", &args.weight)?,
        parse_number("height", &args.height)?,
    ))
}

fn optional_count(field: &str, raw: Option<&str>) -> Result<Option<u32>> {
    Ok(match raw {
        Some(raw) => Some(parse_number(field, raw)?),
        None => None,
    })
}

/// Run `command` and return the text to print.
///
/// `confirm` is only asked for deletes, after the record ID and username
/// have been checked.
pub fn execute<T, F>(session: &Session<T>, username: Option<&str>, command: &Command, confirm: F) -> Result<String>
where
    T: Transport,
    F: FnOnce(i64) -> bool,
{
    match command {
        Command::Bmi(body) => {
            let who = person(username, &body.person)?;
            let (weight_kg, height_cm) = weight_and_height(body)?;
            let saved = who.username.is_some();
            let result = session.compute_bmi(&BmiRequest {
                username: who.username,
                age_years: who.age_years,
                gender: who.gender,
                weight_kg,
                height_cm,
            })?;
            Ok(render::bmi(&result, saved))
        }
        Command::BodyFat { body, neck, waist, hip } => {
            let who = person(username, &body.person)?;
            let (weight_kg, height_cm) = weight_and_height(body)?;
            let saved = who.username.is_some();
            let result = session.compute_body_fat(&BodyFatRequest {
                username: who.username,
                age_years: who.age_years,
                gender: who.gender,
                weight_kg,
                height_cm,
                neck_cm: parse_number("neck", neck)?,
                waist_cm: parse_number("waist", waist)?,
                hip_cm: parse_number("hip", hip)?,
            })?;
            Ok(render::body_fat(&result, saved))
        }
        Command::Calorie { body, activity } => {
            let who = person(username, &body.person)?;
            let (weight_kg, height_cm) = weight_and_height(body)?;
            let activity: ActivityLevel = activity.parse()?;
            let saved = who.username.is_some();
            let result = session.compute_calorie(&CalorieRequest {
                username: who.username,
                age_years: who.age_years,
                gender: who.gender,
                weight_kg,
                height_cm,
                activity_factor: activity,
            })?;
            Ok(render::calorie(&result, activity, saved))
        }
        Command::Bmr(body) => {
            let who = person(username, &body.person)?;
            let (weight_kg, height_cm) = weight_and_height(body)?;
            let saved = who.username.is_some();
            let result = session.compute_bmr(&BmrRequest {
                username: who.username,
                age_years: who.age_years,
                gender: who.gender,
                weight_kg,
                height_cm,
            })?;
            Ok(render::bmr(&result, saved))
        }
        Command::IdealWeight { person: args, height } => {
            let who = person(username, args)?;
            let saved = who.username.is_some();
            let result = session.compute_ideal_weight(&IdealWeightRequest {
                username: who.username,
                age_years: who.age_years,
                gender: who.gender,
                height_cm: parse_number("height", height)?,
            })?;
            Ok(render::ideal_weight(&result, saved))
        }
        Command::History(history) => execute_history(session, username, history, confirm),
        Command::Health => {
            session.health_check()?;
            Ok(render::healthy(session.client().base_url()))
        }
    }
}

fn execute_history<T, F>(session: &Session<T>, username: Option<&str>, command: &HistoryCommand, confirm: F) -> Result<String>
where
    T: Transport,
    F: FnOnce(i64) -> bool,
{
    let username = require_username(username)?;
    match command {
        HistoryCommand::List { limit, offset } => {
            let query = HistoryQuery {
                username,
                limit: optional_count("limit", limit.as_deref())?,
                offset: optional_count("offset", offset.as_deref())?,
            };
            let records = session.list_history(&query)?;
            info!(count = records.len(), "history loaded");
            Ok(render::history(&records))
        }
        HistoryCommand::Get { id } => {
            let id = parse_record_id(id)?;
            let record = session.get_record(id, &username)?;
            Ok(render::record(&record))
        }
        HistoryCommand::Update { id, inputs, result } => {
            let id = parse_record_id(id)?;
            let update = RecordUpdate {
                username,
                inputs: parse_fields("inputs", inputs.as_deref())?,
                result: parse_fields("result", result.as_deref())?,
            };
            let record = session.update_record(id, &update)?;
            Ok(render::updated(&record))
        }
        HistoryCommand::Delete { id, yes } => {
            let id = parse_record_id(id)?;
            let yes = *yes;
            let outcome = session.delete_record(id, &username, |id| yes || confirm(id))?;
            Ok(render::deleted(id, &outcome))
        }
    }
}
