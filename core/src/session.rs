//! One call per API operation: build, execute, parse.
//!
//! `Session` owns a `HealthClient` and a `Transport` and holds nothing else.
//! Every method issues at most one request and reports every failure exactly
//! once; there are no retries and no caching.

use tracing::{debug, warn};

use crate::client::HealthClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::{
    BmiRequest, BmiResult, BmrRequest, BmrResult, BodyFatRequest, BodyFatResult, Calculation,
    CalorieRequest, CalorieResult, DeleteOutcome, HistoryQuery, HistoryRecord, IdealWeightRequest,
    IdealWeightResult, RecordUpdate,
};

pub struct Session<T = UreqTransport> {
    client: HealthClient,
    transport: T,
}

impl Session<UreqTransport> {
    /// Session over the default blocking transport.
    pub fn connect(base_url: &str) -> Self {
        Self::new(HealthClient::new(base_url), UreqTransport::default())
    }
}

impl<T: Transport> Session<T> {
    pub fn new(client: HealthClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &HealthClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Run any calculator. The named `compute_*` methods delegate here.
    pub fn compute<C: Calculation>(&self, input: &C) -> Result<C::Output, ApiError> {
        let request = self.client.build_calculation(input)?;
        let response = self.execute(request)?;
        self.client
            .parse_calculation::<C>(response)
            .inspect_err(|e| warn!(calculator = C::CALCULATOR.slug(), error = %e, "calculation failed"))
    }

    pub fn compute_bmi(&self, input: &BmiRequest) -> Result<BmiResult, ApiError> {
        self.compute(input)
    }

    pub fn compute_body_fat(&self, input: &BodyFatRequest) -> Result<BodyFatResult, ApiError> {
        self.compute(input)
    }

    pub fn compute_calorie(&self, input: &CalorieRequest) -> Result<CalorieResult, ApiError> {
        self.compute(input)
    }

    pub fn compute_bmr(&self, input: &BmrRequest) -> Result<BmrResult, ApiError> {
        self.compute(input)
    }

    pub fn compute_ideal_weight(&self, input: &IdealWeightRequest) -> Result<IdealWeightResult, ApiError> {
        self.compute(input)
    }

    pub fn list_history(&self, query: &HistoryQuery) -> Result<Vec<HistoryRecord>, ApiError> {
        let request = self.client.build_list_history(query)?;
        let response = self.execute(request)?;
        self.client
            .parse_list_history(response)
            .inspect_err(|e| warn!(error = %e, "listing history failed"))
    }

    pub fn get_record(&self, id: i64, username: &str) -> Result<HistoryRecord, ApiError> {
        let request = self.client.build_get_record(id, username)?;
        let response = self.execute(request)?;
        self.client
            .parse_get_record(response)
            .inspect_err(|e| warn!(id, error = %e, "fetching record failed"))
    }

    pub fn update_record(&self, id: i64, update: &RecordUpdate) -> Result<HistoryRecord, ApiError> {
        let request = self.client.build_update_record(id, update)?;
        let response = self.execute(request)?;
        self.client
            .parse_update_record(response)
            .inspect_err(|e| warn!(id, error = %e, "updating record failed"))
    }

    /// Input is validated first, then `confirm` is asked. A refusal returns
    /// `DeleteOutcome::Cancelled` without touching the network.
    pub fn delete_record<F>(&self, id: i64, username: &str, confirm: F) -> Result<DeleteOutcome, ApiError>
    where
        F: FnOnce(i64) -> bool,
    {
        let request = self.client.build_delete_record(id, username)?;
        if !confirm(id) {
            debug!(id, "delete cancelled");
            return Ok(DeleteOutcome::Cancelled);
        }
        let response = self.execute(request)?;
        self.client
            .parse_delete_record(response)
            .inspect_err(|e| warn!(id, error = %e, "deleting record failed"))
    }

    pub fn health_check(&self) -> Result<(), ApiError> {
        let response = self.execute(self.client.build_health_check())?;
        self.client.parse_health_check(response)
    }

    fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), path = %request.path, "sending request");
        let response = self
            .transport
            .execute(request)
            .inspect_err(|e| warn!(error = %e, "no response from server"))?;
        debug!(status = response.status, "received response");
        Ok(response)
    }
}
