use anyhow::{Context, Result};
use std::env;
use uuid::Uuid;

use crate::gateway::DEFAULT_STRIPE_API_BASE;

#[derive(Debug, Clone)]
pub struct AppConfig {
	pub database_url: String,
	pub socket_url: String,
	pub jwt_secret: String,
	pub bank_data_key: Option<String>,
	pub stripe_secret_key: Option<String>,
	pub stripe_api_base: String,
	pub public_app_url: String,
	pub admin_user_ids: Vec<Uuid>,
}

fn optional(key: &str) -> Option<String> {
	env::var(key).ok().map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn required(key: &str) -> Result<String> {
	optional(key).with_context(|| format!("{key} must be set"))
}

pub fn parse_admin_ids(raw: &str) -> Result<Vec<Uuid>> {
	raw.split(',')
		.map(str::trim)
		.filter(|s| !s.is_empty())
		.map(|s| Uuid::parse_str(s).with_context(|| format!("invalid admin user id {s}")))
		.collect()
}

impl AppConfig {
	pub fn from_env() -> Result<Self> {
		dotenvy::dotenv().ok();
		Ok(Self {
			database_url: required("DATABASE_URL")?,
			socket_url: required("SOCKET_URL")?,
			jwt_secret: required("JWT_SECRET")?,
			bank_data_key: optional("BANK_DATA_KEY"),
			stripe_secret_key: optional("STRIPE_SECRET_KEY"),
			stripe_api_base: optional("STRIPE_API_BASE")
				.unwrap_or_else(|| DEFAULT_STRIPE_API_BASE.to_string()),
			public_app_url: optional("PUBLIC_APP_URL")
				.unwrap_or_else(|| "http://localhost:3000".to_string())
				.trim_end_matches('/')
				.to_string(),
			admin_user_ids: parse_admin_ids(&optional("ADMIN_USER_IDS").unwrap_or_default())?,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_admin_ids() {
		let a = Uuid::new_v4();
		let b = Uuid::new_v4();
		assert_eq!(parse_admin_ids(&format!(" {a}, {b} ,")).unwrap(), vec![a, b]);
		assert!(parse_admin_ids("").unwrap().is_empty());
		assert!(parse_admin_ids("nope").is_err());
	}
}
