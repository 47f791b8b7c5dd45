//! API endpoint handlers.
//!
//! `/api/1` fans out to `/api/2` and `/api/3`; those two simulate a bounded
//! unit of work whose delay is random (GET) or supplied by the caller (POST).

use axum::extract::State;
use axum::response::Response;
use axum::Json;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::SimulationConfig;
use crate::downstream::{CallDescriptor, CallValue};
use crate::http::response::{internal_error, json_or_internal_error, ok_json};
use crate::http::server::AppState;
use crate::orchestration::{run_bounded_with, simulate_work};

pub const API2_RESOURCE: &str = "api/2";
pub const API3_RESOURCE: &str = "api/3";

/// Composed payload of `/api/1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Api1Response {
    pub api2: CallValue,
    pub api3: CallValue,
}

/// Body of `POST /api/1`: the delay each downstream should simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Api1PostRequest {
    pub api2_delay: i64,
    pub api3_delay: i64,
}

pub async fn get_1(State(state): State<AppState>) -> Response {
    let descriptors = vec![
        CallDescriptor::get(API2_RESOURCE),
        CallDescriptor::get(API3_RESOURCE),
    ];
    compose_api1(&state, "Get1Async", descriptors).await
}

pub async fn post_1(
    State(state): State<AppState>,
    Json(request): Json<Api1PostRequest>,
) -> Response {
    let descriptors = vec![
        CallDescriptor::post(API2_RESOURCE, request.api2_delay),
        CallDescriptor::post(API3_RESOURCE, request.api3_delay),
    ];
    compose_api1(&state, "Post1Async", descriptors).await
}

async fn compose_api1(
    state: &AppState,
    operation: &str,
    descriptors: Vec<CallDescriptor>,
) -> Response {
    match state.orchestrator.compose(operation, descriptors).await {
        Ok(values) => match values[..] {
            [api2, api3] => ok_json(Api1Response { api2, api3 }),
            _ => {
                tracing::error!(
                    api = operation,
                    values = values.len(),
                    "Unexpected number of composed values"
                );
                internal_error()
            }
        },
        Err(_) => internal_error(),
    }
}

pub async fn get_2(State(state): State<AppState>) -> Response {
    let delay = random_delay(&state.simulation);
    single_call(&state, "Get2Async", delay).await
}

pub async fn get_3(State(state): State<AppState>) -> Response {
    let delay = random_delay(&state.simulation);
    single_call(&state, "Get3Async", delay).await
}

pub async fn post_2(State(state): State<AppState>, Json(delay): Json<i64>) -> Response {
    single_call(&state, "Post2Async", delay).await
}

pub async fn post_3(State(state): State<AppState>, Json(delay): Json<i64>) -> Response {
    single_call(&state, "Post3Async", delay).await
}

pub async fn health() -> &'static str {
    "ok"
}

fn random_delay(simulation: &SimulationConfig) -> i64 {
    let (min, max) = (simulation.random_delay_min_ms, simulation.random_delay_max_ms);
    if min < max {
        rand::thread_rng().gen_range(min..max)
    } else {
        min
    }
}

async fn single_call(state: &AppState, label: &str, delay: i64) -> Response {
    let result = run_bounded_with(simulate_work(delay), label, state.orchestrator.sink()).await;
    json_or_internal_error(result)
}
