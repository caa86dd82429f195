//! Client core for the health metrics calculator API.
//!
//! # Overview
//! The API computes BMI, body fat, daily calories, BMR and ideal weight, and
//! keeps a per-user history of past calculations. This crate builds the HTTP
//! requests for those operations, sends them, and turns the responses into
//! typed results or one of four typed failures.
//!
//! # Design
//! - `HealthClient` is stateless and I/O-free: `build_*` produces an
//!   `HttpRequest`, `parse_*` consumes an `HttpResponse`.
//! - `Transport` performs the round-trip; `UreqTransport` is the blocking
//!   default.
//! - `Session` joins the two and is what front ends call. It also gates
//!   deletes behind a confirmation callback.
//! - `form` holds the local presence/parseability checks for raw text input.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod form;
pub mod http;
pub mod session;
pub mod transport;
pub mod types;

pub use client::HealthClient;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use session::Session;
pub use transport::{Transport, UreqTransport};
pub use types::{
    ActivityLevel, BmiRequest, BmiResult, BmrRequest, BmrResult, BodyFatRequest, BodyFatResult,
    Calculation, Calculator, CalorieRequest, CalorieResult, DeleteOutcome, Fields, Gender,
    HistoryQuery, HistoryRecord, IdealWeightRequest, IdealWeightResult, RecordUpdate,
};
