//! In-memory stand-in for the health metrics API.
//!
//! Serves the same routes and JSON shapes as the real service so the client
//! can be exercised end-to-end: five calculators under `/calc`, per-user
//! history under `/calc/history`, and `/health`. Errors are rendered as
//! `{"detail": message}`.

pub mod calculators;
pub mod store;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{error, info};

pub use store::{HistoryRecord, Lookup, Store};

pub type Db = Arc<RwLock<Store>>;

const DEFAULT_LIMIT: usize = 100;

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
pub struct BmiRequest {
    pub username: Option<String>,
    pub age_years: i64,
    pub gender: bool,
    pub weight_kg: f64,
    pub height_cm: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BodyFatRequest {
    pub username: Option<String>,
    pub age_years: i64,
    pub gender: bool,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub neck_cm: f64,
    pub waist_cm: f64,
    pub hip_cm: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CalorieRequest {
    pub username: Option<String>,
    pub age_years: i64,
    pub gender: bool,
    pub weight_kg: f64,
    pub height_cm: f64,
    pub activity_factor: String,
}

/// BMR takes exactly the BMI inputs.
pub type BmrRequest = BmiRequest;

#[derive(Debug, Serialize, Deserialize)]
pub struct IdealWeightRequest {
    pub username: Option<String>,
    pub age_years: i64,
    pub gender: bool,
    pub height_cm: f64,
}

#[derive(Debug, Deserialize)]
pub struct HistoryUpdate {
    pub username: String,
    pub inputs: Option<Map<String, Value>>,
    pub result: Option<Map<String, Value>>,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub username: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct OwnerParams {
    pub username: String,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub detail: String,
}

impl AppError {
    fn not_found(detail: &str) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            detail: detail.to_string(),
        }
    }

    fn unprocessable(detail: String) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail,
        }
    }

    fn lookup(lookup: Lookup, missing_record: &str) -> Self {
        match lookup {
            Lookup::UnknownUser => Self::not_found("User not found"),
            Lookup::NotFound => Self::not_found(missing_record),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "detail": self.detail }))).into_response()
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::default()));
    Router::new()
        .route("/health", get(health))
        .route("/calc/bmi", post(compute_bmi))
        .route("/calc/body-fat", post(compute_body_fat))
        .route("/calc/calorie", post(compute_calorie))
        .route("/calc/bmr", post(compute_bmr))
        .route("/calc/ideal-weight", post(compute_ideal_weight))
        .route("/calc/history", get(list_history))
        .route(
            "/calc/history/{id}",
            get(get_record).patch(update_record).delete(delete_record),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Serve on an ephemeral localhost port from a background thread and return
/// the bound address. Used by tests in the other crates.
pub fn spawn() -> std::io::Result<SocketAddr> {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = std_listener.local_addr()?;
    std_listener.set_nonblocking(true)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    std::thread::spawn(move || {
        let served = runtime.block_on(async {
            match TcpListener::from_std(std_listener) {
                Ok(listener) => run(listener).await,
                Err(e) => Err(e),
            }
        });
        if let Err(e) = served {
            error!("mock server stopped: {e}");
        }
    });
    info!("mock server listening on {addr}");
    Ok(addr)
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

fn into_fields<T: Serialize>(value: &T) -> Map<String, Value> {
    match serde_json::to_value(value) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

/// Store the calculation when a username was given and echo the result.
async fn respond<R: Serialize, O: Serialize>(
    db: &Db,
    calc_type: &str,
    request: &R,
    result: O,
) -> Json<Value> {
    let mut inputs = into_fields(request);
    let owner = match inputs.remove("username") {
        Some(Value::String(name)) if !name.trim().is_empty() => Some(name),
        _ => None,
    };
    let result = into_fields(&result);
    let id = db
        .write()
        .await
        .save(owner, calc_type, inputs, result.clone());
    info!(calc_type, id, "calculation stored");
    Json(Value::Object(result))
}

async fn compute_bmi(
    State(db): State<Db>,
    Json(input): Json<BmiRequest>,
) -> Result<Json<Value>, AppError> {
    let result = calculators::bmi(input.weight_kg, input.height_cm).map_err(AppError::unprocessable)?;
    Ok(respond(&db, "bmi", &input, result).await)
}

async fn compute_body_fat(
    State(db): State<Db>,
    Json(input): Json<BodyFatRequest>,
) -> Result<Json<Value>, AppError> {
    let result = calculators::body_fat(
        input.gender,
        input.height_cm,
        input.neck_cm,
        input.waist_cm,
        input.hip_cm,
    )
    .map_err(AppError::unprocessable)?;
    Ok(respond(&db, "body-fat", &input, result).await)
}

async fn compute_calorie(State(db): State<Db>, Json(input): Json<CalorieRequest>) -> Json<Value> {
    let result = calculators::calories(
        input.gender,
        input.age_years,
        input.weight_kg,
        input.height_cm,
        &input.activity_factor,
    );
    respond(&db, "calorie", &input, result).await
}

async fn compute_bmr(State(db): State<Db>, Json(input): Json<BmrRequest>) -> Json<Value> {
    let result = calculators::bmr(input.gender, input.age_years, input.weight_kg, input.height_cm);
    respond(&db, "bmr", &input, result).await
}

async fn compute_ideal_weight(
    State(db): State<Db>,
    Json(input): Json<IdealWeightRequest>,
) -> Result<Json<Value>, AppError> {
    let result = calculators::ideal_weight(input.gender, input.height_cm).map_err(AppError::unprocessable)?;
    Ok(respond(&db, "ideal-weight", &input, result).await)
}

async fn list_history(State(db): State<Db>, Query(params): Query<ListParams>) -> Json<Vec<HistoryRecord>> {
    let Some(username) = params.username.filter(|name| !name.is_empty()) else {
        return Json(Vec::new());
    };
    let store = db.read().await;
    Json(store.list(
        &username,
        params.limit.unwrap_or(DEFAULT_LIMIT),
        params.offset.unwrap_or(0),
    ))
}

async fn get_record(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Query(params): Query<OwnerParams>,
) -> Result<Json<HistoryRecord>, AppError> {
    let store = db.read().await;
    store
        .get(id, &params.username)
        .map(|record| Json(record.clone()))
        .map_err(|lookup| AppError::lookup(lookup, "Record not found"))
}

async fn update_record(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Json(input): Json<HistoryUpdate>,
) -> Result<Json<HistoryRecord>, AppError> {
    let mut store = db.write().await;
    store
        .update(id, &input.username, input.inputs, input.result)
        .map(Json)
        .map_err(|lookup| AppError::lookup(lookup, "Record not found or not owned by user"))
}

async fn delete_record(
    State(db): State<Db>,
    Path(id): Path<i64>,
    Query(params): Query<OwnerParams>,
) -> Result<Json<Value>, AppError> {
    let mut store = db.write().await;
    store
        .delete(id, &params.username)
        .map_err(|lookup| AppError::lookup(lookup, "Record not found or not owned by user"))?;
    info!(id, "record deleted");
    Ok(Json(json!({ "detail": "Record deleted successfully" })))
}
