//! Function invocation endpoint.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, State},
    routing::post,
};
use serde_json::Value;
use tracing::instrument;

use crate::{error::AppError, state::AppState};

/// Build the functions router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/functions/{name}", post(invoke))
}

/// Call a function by name.
///
/// The request body is the function's JSON argument; an empty body means no
/// argument.
///
/// # Errors
///
/// Returns an error if the body is not JSON or the function call fails.
#[instrument(skip(state, body), fields(function = %name))]
pub async fn invoke(
    State(state): State<AppState>,
    Path(name): Path<String>,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    let args = parse_args(&body)?;
    let result = state.registry().lock().await.call(&name, &args)?;
    Ok(Json(result))
}

fn parse_args(body: &[u8]) -> Result<Value, AppError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(body).map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {e}")))
}
