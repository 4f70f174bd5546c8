//! Quote handlers

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};
use validator::Validate;

use domain_rating::QuoteRequest;

use crate::dto::quote::{CreateQuoteRequest, QuoteResponse};
use crate::{error::ApiError, AppState};

/// Prices a new quote
pub async fn create_quote(
    State(state): State<AppState>,
    payload: Result<Json<CreateQuoteRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<QuoteResponse>), ApiError> {
    let Json(dto) = payload?;
    dto.validate()?;

    let request = QuoteRequest::from(dto);
    let quote = state.service.generate_quote(&request).await?;

    Ok((StatusCode::CREATED, Json(QuoteResponse::from(&quote))))
}
