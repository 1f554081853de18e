//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! service layer, then maps the outcome onto the status-code contract.

use axum::{
    body::Bytes,
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{StatusCode, Uri},
    response::Redirect,
    Json,
};

use super::dto::{parse_ids, FactQuery, FactRequest, HealthResponse};
use super::error::AppError;
use super::state::AppState;
use crate::api::{Fact, FactId};
use crate::db::services as db_services;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// GET /
///
/// API homepage; sends the client to the docs.
pub async fn root() -> Redirect {
    Redirect::temporary("/docs")
}

/// GET /health
///
/// Health check endpoint to verify the service is running and database is accessible.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: state.config.version.clone(),
        database: db_status,
    }))
}

/// GET /fact/{fact_id}
///
/// Retrieve a fact from its id.
pub async fn get_fact(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> HandlerResult<Fact> {
    let fact_id = path_fact_id(path)?;
    let text = db_services::get_fact(state.repository.as_ref(), fact_id)
        .await
        .map_err(|e| AppError::for_fact(fact_id, e))?;

    Ok(Json(Fact::new(fact_id, text)))
}

/// GET /facts/?ids=1&ids=2
///
/// Retrieve facts, optionally only those with the given ids.
pub async fn get_facts(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> HandlerResult<Vec<Fact>> {
    let Query(pairs) = query?;
    let ids = parse_ids(&pairs)?;
    let facts = db_services::get_facts(state.repository.as_ref(), ids.as_deref()).await?;
    Ok(Json(facts))
}

/// POST /facts/
///
/// Create a new fact from the request body.
pub async fn create_fact(
    State(state): State<AppState>,
    uri: Uri,
    body: Bytes,
) -> Result<(StatusCode, Json<Fact>), AppError> {
    let text = fact_text(&uri, &body)?;
    let fact = db_services::insert_fact(state.repository.as_ref(), &text)
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?;

    if !fact.id.is_assigned() {
        return Err(AppError::Forbidden("Cannot insert fact".to_string()));
    }

    Ok((StatusCode::CREATED, Json(fact)))
}

/// PUT /fact/{fact_id}
///
/// Replace the text of a fact.
pub async fn update_fact(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    uri: Uri,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    let fact_id = path_fact_id(path)?;
    let text = fact_text(&uri, &body)?;
    db_services::update_fact(state.repository.as_ref(), fact_id, &text)
        .await
        .map_err(|e| AppError::for_fact(fact_id, e))?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /fact/{fact_id}
///
/// Remove a fact. Deleting a missing fact answers 403, not 404.
pub async fn delete_fact(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let fact_id = path_fact_id(path)?;
    db_services::delete_fact(state.repository.as_ref(), fact_id)
        .await
        .map_err(|e| {
            if e.is_not_found() {
                AppError::Forbidden(e.to_string())
            } else {
                AppError::for_fact(fact_id, e)
            }
        })?;

    Ok(StatusCode::NO_CONTENT)
}

/// Path ids that are not integers are answered with a JSON 400.
fn path_fact_id(path: Result<Path<i64>, PathRejection>) -> Result<FactId, AppError> {
    let Path(raw) = path?;
    Ok(FactId::new(raw))
}

/// Pull the fact text from a JSON body, falling back to `?fact=`.
///
/// The query string is only looked at when the body is empty.
fn fact_text(uri: &Uri, body: &Bytes) -> Result<String, AppError> {
    if !body.is_empty() {
        let request: FactRequest = serde_json::from_slice(body)
            .map_err(|e| AppError::BadRequest(format!("Invalid request body: {}", e)))?;
        return Ok(request.fact);
    }

    let Query(query) = Query::<FactQuery>::try_from_uri(uri)?;
    query.fact.ok_or_else(|| {
        AppError::BadRequest("Missing 'fact' in request body or query string".to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fact_text_prefers_body() {
        let uri: Uri = "/facts/?fact=from%20query".parse().unwrap();
        let body = Bytes::from_static(br#"{"fact": "from body"}"#);
        assert_eq!(fact_text(&uri, &body).unwrap(), "from body");
    }

    #[test]
    fn test_fact_text_ignores_query_when_body_present() {
        let uri: Uri = "/facts/?fact=a&fact=b".parse().unwrap();
        let body = Bytes::from_static(br#"{"fact": "x"}"#);
        assert_eq!(fact_text(&uri, &body).unwrap(), "x");
    }

    #[test]
    fn test_fact_text_falls_back_to_query() {
        let uri: Uri = "/facts/?fact=from%20query".parse().unwrap();
        assert_eq!(fact_text(&uri, &Bytes::new()).unwrap(), "from query");
    }

    #[test]
    fn test_fact_text_missing() {
        let uri: Uri = "/facts/".parse().unwrap();
        assert!(matches!(
            fact_text(&uri, &Bytes::new()),
            Err(AppError::BadRequest(_))
        ));
        assert!(matches!(
            fact_text(&uri, &Bytes::from_static(b"{\"text\": 1}")),
            Err(AppError::BadRequest(_))
        ));
    }
}
