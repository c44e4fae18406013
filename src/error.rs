use crate::{
	banking::FieldErrors, crypto::CryptoError, gateway::GatewayError, models::ApiResponse,
	repo::RepoError,
};
use actix_web::{error::BlockingError, http::StatusCode, HttpResponse, ResponseError};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
	#[error("{0}")]
	BadRequest(String),
	#[error("{0}")]
	Invalid(String, Value),
	#[error("{0}")]
	Unauthorized(String),
	#[error("{0}")]
	Forbidden(String),
	#[error("{0}")]
	NotFound(String),
	#[error("{0}")]
	Conflict(String),
	#[error("{0}")]
	Blocked(String, Value),
	#[error("{0}")]
	Unavailable(String),
	#[error("{0}")]
	Internal(String),
}

impl ApiError {
	pub fn bad_request(msg: impl Into<String>) -> Self {
		Self::BadRequest(msg.into())
	}

	pub fn not_found(msg: impl Into<String>) -> Self {
		Self::NotFound(msg.into())
	}

	pub fn forbidden(msg: impl Into<String>) -> Self {
		Self::Forbidden(msg.into())
	}

	pub fn conflict(msg: impl Into<String>) -> Self {
		Self::Conflict(msg.into())
	}

	fn details(&self) -> Option<Value> {
		match self {
			ApiError::Invalid(_, d) | ApiError::Blocked(_, d) => Some(d.clone()),
			_ => None,
		}
	}
}

impl ResponseError for ApiError {
	fn status_code(&self) -> StatusCode {
		match self {
			ApiError::BadRequest(_) | ApiError::Invalid(..) => StatusCode::BAD_REQUEST,
			ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
			ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
			ApiError::NotFound(_) => StatusCode::NOT_FOUND,
			ApiError::Conflict(_) | ApiError::Blocked(..) => StatusCode::CONFLICT,
			ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
			ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	fn error_response(&self) -> HttpResponse {
		HttpResponse::build(self.status_code())
			.json(ApiResponse::<()>::failure(self.to_string(), self.details()))
	}
}

impl From<RepoError> for ApiError {
	fn from(err: RepoError) -> Self {
		match err {
			RepoError::NotFound(what) => ApiError::NotFound(format!("{what} not found")),
			RepoError::Conflict(msg) => ApiError::Conflict(msg),
			RepoError::InsufficientBalance => ApiError::Conflict("Insufficient balance".to_string()),
			other => {
				log::error!("Repository failure: {}", other);
				ApiError::Internal("Database error".to_string())
			},
		}
	}
}

impl From<BlockingError> for ApiError {
	fn from(err: BlockingError) -> Self {
		log::error!("Blocking task failed: {}", err);
		ApiError::Internal("Internal server error".to_string())
	}
}

impl From<CryptoError> for ApiError {
	fn from(err: CryptoError) -> Self {
		log::error!("Crypto failure: {}", err);
		ApiError::Internal("Failed to process sensitive data".to_string())
	}
}

impl From<GatewayError> for ApiError {
	fn from(err: GatewayError) -> Self {
		log::error!("Payment gateway failure: {}", err);
		match err {
			GatewayError::NotConfigured => ApiError::Unavailable("Stripe is not configured".to_string()),
			GatewayError::Api(_, msg) => ApiError::Internal(format!("Stripe error: {msg}")),
			_ => ApiError::Internal("Payment provider error".to_string()),
		}
	}
}

impl From<validator::ValidationErrors> for ApiError {
	fn from(errs: validator::ValidationErrors) -> Self {
		let details = serde_json::to_value(&errs).unwrap_or(Value::Null);
		ApiError::Invalid("Validation failed".to_string(), details)
	}
}

impl From<FieldErrors> for ApiError {
	fn from(errs: FieldErrors) -> Self {
		let details = serde_json::to_value(&errs.0).unwrap_or(Value::Null);
		ApiError::Invalid("Invalid bank details".to_string(), details)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use actix_web::body::MessageBody;

	#[test]
	fn renders_error_envelope_with_details() {
		let err = ApiError::Blocked("Prerequisites not met".into(), serde_json::json!(["connectAccount"]));
		assert_eq!(err.status_code(), StatusCode::CONFLICT);
		let body = err.error_response().into_body().try_into_bytes().unwrap();
		let parsed: Value = serde_json::from_slice(&body).unwrap();
		assert_eq!(parsed["status"], "error");
		assert_eq!(parsed["data"], Value::Null);
		assert_eq!(parsed["error"], "Prerequisites not met");
		assert_eq!(parsed["details"][0], "connectAccount");
	}

	#[test]
	fn maps_repository_errors() {
		assert_eq!(ApiError::from(RepoError::NotFound("Booking")).status_code(), StatusCode::NOT_FOUND);
		assert_eq!(ApiError::from(RepoError::InsufficientBalance).status_code(), StatusCode::CONFLICT);
		assert_eq!(
			ApiError::from(RepoError::Database(diesel::result::Error::RollbackTransaction))
				.status_code(),
			StatusCode::INTERNAL_SERVER_ERROR
		);
		assert_eq!(ApiError::from(GatewayError::NotConfigured).status_code(), StatusCode::SERVICE_UNAVAILABLE);
	}
}
