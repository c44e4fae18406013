//! Stripe Connect client.

use async_trait::async_trait;
use bigdecimal::{BigDecimal, RoundingMode, ToPrimitive};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use uuid::Uuid;

pub const DEFAULT_STRIPE_API_BASE: &str = "https://api.stripe.com";

const ZERO_DECIMAL_CURRENCIES: &[&str] = &[
	"BIF", "CLP", "DJF", "GNF", "JPY", "KMF", "KRW", "MGA", "PYG", "RWF", "UGX", "VND", "VUV",
	"XAF", "XOF", "XPF",
];

#[derive(Debug, Error)]
pub enum GatewayError {
	#[error("Stripe is not configured")]
	NotConfigured,
	#[error("network error: {0}")]
	Network(String),
	#[error("stripe error {0}: {1}")]
	Api(u16, String),
	#[error("invalid amount: {0}")]
	InvalidAmount(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectAccountRequest {
	pub user_id: Uuid,
	pub country: String,
	pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TransferRequest {
	pub amount: BigDecimal,
	pub currency: String,
	pub destination: String,
	pub payout_request_id: Uuid,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
	/// Creates an Express connected account and returns its id.
	async fn create_connect_account(
		&self,
		request: ConnectAccountRequest,
	) -> Result<String, GatewayError>;

	/// Returns the hosted onboarding URL for a connected account.
	async fn create_onboarding_link(&self, account_id: String) -> Result<String, GatewayError>;

	/// Moves funds to a connected account and returns the transfer id.
	async fn create_transfer(&self, transfer: TransferRequest) -> Result<String, GatewayError>;
}

/// Amount in the currency's smallest unit, rounded half-up.
pub fn minor_units(amount: &BigDecimal, currency: &str) -> Result<i64, GatewayError> {
	let scaled = if ZERO_DECIMAL_CURRENCIES.contains(&currency.to_uppercase().as_str()) {
		amount.clone()
	} else {
		amount * BigDecimal::from(100)
	};
	scaled
		.with_scale_round(0, RoundingMode::HalfUp)
		.to_i64()
		.filter(|v| *v > 0)
		.ok_or_else(|| GatewayError::InvalidAmount(amount.to_string()))
}

/// Stripe replays the first transfer for a repeated key, so one payout request moves money once.
pub fn transfer_idempotency_key(payout_request_id: Uuid) -> String {
	format!("payout-{payout_request_id}")
}

#[derive(Deserialize)]
struct IdResponse {
	id: String,
}

#[derive(Deserialize)]
struct UrlResponse {
	url: String,
}

#[derive(Deserialize)]
struct StripeErrorBody {
	error: StripeErrorDetail,
}

#[derive(Deserialize)]
struct StripeErrorDetail {
	message: Option<String>,
}

pub struct StripeClient {
	http: reqwest::Client,
	secret_key: String,
	api_base: String,
	app_url: String,
}

impl StripeClient {
	pub fn new(secret_key: String, api_base: String, app_url: String) -> Result<Self, GatewayError> {
		let http = reqwest::Client::builder()
			.timeout(Duration::from_secs(30))
			.build()
			.map_err(|e| GatewayError::Network(e.to_string()))?;
		Ok(Self { http, secret_key, api_base: api_base.trim_end_matches('/').to_string(), app_url })
	}

	async fn post<T: for<'de> Deserialize<'de>>(
		&self,
		path: &str,
		form: &[(String, String)],
		idempotency_key: Option<&str>,
	) -> Result<T, GatewayError> {
		let url = format!("{}{}", self.api_base, path);
		log::info!("POST {}", url);
		let mut builder = self.http.post(&url).basic_auth(&self.secret_key, Some("")).form(form);
		if let Some(key) = idempotency_key {
			builder = builder.header("Idempotency-Key", key);
		}
		let resp = builder
			.send()
			.await
			.map_err(|e| GatewayError::Network(e.to_string()))?;

		let status = resp.status();
		if !status.is_success() {
			let message = resp
				.json::<StripeErrorBody>()
				.await
				.ok()
				.and_then(|b| b.error.message)
				.unwrap_or_else(|| status.to_string());
			log::error!("Stripe {} failed with {}: {}", path, status.as_u16(), message);
			return Err(GatewayError::Api(status.as_u16(), message));
		}
		resp.json::<T>().await.map_err(|e| GatewayError::Network(e.to_string()))
	}
}

fn pair(k: &str, v: impl Into<String>) -> (String, String) {
	(k.to_string(), v.into())
}

#[async_trait]
impl PaymentGateway for StripeClient {
	async fn create_connect_account(
		&self,
		request: ConnectAccountRequest,
	) -> Result<String, GatewayError> {
		let mut form = vec![
			pair("type", "express"),
			pair("country", request.country.to_uppercase()),
			pair("business_type", "individual"),
			pair("capabilities[transfers][requested]", "true"),
			pair("metadata[user_id]", request.user_id.to_string()),
		];
		if let Some(email) = request.email {
			form.push(pair("email", email));
		}
		let account: IdResponse = self.post("/v1/accounts", &form, None).await?;
		Ok(account.id)
	}

	async fn create_onboarding_link(&self, account_id: String) -> Result<String, GatewayError> {
		let form = vec![
			pair("account", account_id),
			pair("refresh_url", format!("{}/settings/payouts?refresh=true", self.app_url)),
			pair("return_url", format!("{}/settings/payouts?onboarding=complete", self.app_url)),
			pair("type", "account_onboarding"),
		];
		let link: UrlResponse = self.post("/v1/account_links", &form, None).await?;
		Ok(link.url)
	}

	async fn create_transfer(&self, transfer: TransferRequest) -> Result<String, GatewayError> {
		let amount = minor_units(&transfer.amount, &transfer.currency)?;
		let form = vec![
			pair("amount", amount.to_string()),
			pair("currency", transfer.currency.to_lowercase()),
			pair("destination", transfer.destination),
			pair("metadata[payout_request_id]", transfer.payout_request_id.to_string()),
		];
		let key = transfer_idempotency_key(transfer.payout_request_id);
		let created: IdResponse = self.post("/v1/transfers", &form, Some(&key)).await?;
		Ok(created.id)
	}
}

/// Stands in when `STRIPE_SECRET_KEY` is not set.
pub struct UnconfiguredGateway;

#[async_trait]
impl PaymentGateway for UnconfiguredGateway {
	async fn create_connect_account(&self, _: ConnectAccountRequest) -> Result<String, GatewayError> {
		Err(GatewayError::NotConfigured)
	}

	async fn create_onboarding_link(&self, _: String) -> Result<String, GatewayError> {
		Err(GatewayError::NotConfigured)
	}

	async fn create_transfer(&self, _: TransferRequest) -> Result<String, GatewayError> {
		Err(GatewayError::NotConfigured)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::str::FromStr;

	#[test]
	fn converts_to_minor_units() {
		let amount = BigDecimal::from_str("25.005").unwrap();
		assert_eq!(minor_units(&amount, "usd").unwrap(), 2501);
		assert_eq!(minor_units(&BigDecimal::from(1500), "JPY").unwrap(), 1500);
		assert_eq!(minor_units(&BigDecimal::from_str("1499.5").unwrap(), "JPY").unwrap(), 1500);
		assert!(minor_units(&BigDecimal::from(0), "USD").is_err());
	}

	#[test]
	fn transfer_key_is_stable_per_payout() {
		let id = Uuid::new_v4();
		assert_eq!(transfer_idempotency_key(id), transfer_idempotency_key(id));
		assert_eq!(transfer_idempotency_key(id), format!("payout-{id}"));
		assert_ne!(transfer_idempotency_key(id), transfer_idempotency_key(Uuid::new_v4()));
	}
}
