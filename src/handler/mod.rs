pub mod admin;
pub mod badge;
pub mod bank_account;
pub mod booking;
pub mod payout;
pub mod provider;
pub mod verification;
pub mod wallet;

use crate::{error::ApiError, models::ApiResponse, repo::RepoError};
use actix_web::{web, HttpResponse};
use serde::Serialize;

/// Runs a repository call on the blocking pool.
pub async fn blocking<F, T>(f: F) -> Result<T, ApiError>
where
	F: FnOnce() -> Result<T, RepoError> + Send + 'static,
	T: Send + 'static,
{
	Ok(web::block(f).await??)
}

pub fn ok<T: Serialize>(data: T) -> HttpResponse {
	HttpResponse::Ok().json(ApiResponse::success(data))
}

pub fn created<T: Serialize>(data: T) -> HttpResponse {
	HttpResponse::Created().json(ApiResponse::success(data))
}

/// Uppercased currency code, `USD` when absent.
pub fn currency_or_default(raw: Option<&str>) -> String {
	raw.map(str::trim).filter(|c| !c.is_empty()).unwrap_or("USD").to_uppercase()
}
