use super::{blocking, ok};
use crate::{
	banking::{self, BankDetailsForm},
	crypto::FieldEncryptor,
	error::ApiError,
	gateway::{ConnectAccountRequest, PaymentGateway},
	midware::jwt::AuthUser,
	models::{BankAccount, BankAccountView, ConnectAccountResp, NewBankAccount},
	repo::BankAccountRepo,
};
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::json;

pub struct BankAccountHandler {}

/// Masked projection of a stored account.
pub fn account_view(
	account: BankAccount,
	encryptor: &FieldEncryptor,
) -> Result<BankAccountView, ApiError> {
	let routing_number_masked = match &account.routing_number_encrypted {
		Some(sealed) => Some(banking::mask(&encryptor.decrypt(sealed)?)),
		None => None,
	};
	Ok(BankAccountView {
		id: account.id,
		country: account.country,
		currency: account.currency,
		banking_system: account.banking_system,
		account_holder_name: account.account_holder_name,
		bank_name: account.bank_name,
		account_type: account.account_type,
		account_number_masked: format!("••••{}", account.account_number_last4),
		routing_number_masked,
		stripe_account_id: account.stripe_account_id,
		verification_status: account.verification_status,
		is_verified: account.is_verified,
		created_at: account.created_at,
		updated_at: account.updated_at,
	})
}

impl BankAccountHandler {
	pub async fn list_countries() -> Result<HttpResponse, ApiError> {
		Ok(ok(banking::countries()))
	}

	pub async fn get_country(code: web::Path<String>) -> Result<HttpResponse, ApiError> {
		let country = banking::lookup(&code).ok_or_else(|| {
			log::info!("Banking details requested for unsupported country {}", code);
			ApiError::not_found("Country not supported")
		})?;
		Ok(ok(country))
	}

	pub async fn validate_details(form: web::Json<BankDetailsForm>) -> Result<HttpResponse, ApiError> {
		let details = banking::validate(&form).map_err(|errs| {
			log::info!("Bank details for {} failed validation: {:?}", form.country, errs.0);
			ApiError::from(errs)
		})?;
		Ok(ok(json!({
			"valid": true,
			"country": details.country,
			"currency": details.currency,
			"banking_system": details.banking_system,
			"account_number_masked": banking::mask(&details.account_number),
			"routing_identifier_masked": details.routing_identifier.as_deref().map(banking::mask),
		})))
	}

	pub async fn get_bank_account(
		user: AuthUser,
		repo: web::Data<dyn BankAccountRepo>,
		encryptor: web::Data<FieldEncryptor>,
	) -> Result<HttpResponse, ApiError> {
		let AuthUser(user_id) = user;
		log::info!("Fetching bank account for user {}", user_id);
		let repo = repo.into_inner();
		let account = blocking(move || repo.find_bank_account(user_id)).await?;
		let view = match account {
			Some(account) => Some(account_view(account, &encryptor)?),
			None => None,
		};
		Ok(ok(view))
	}

	pub async fn save_bank_account(
		user: AuthUser,
		form: web::Json<BankDetailsForm>,
		repo: web::Data<dyn BankAccountRepo>,
		encryptor: web::Data<FieldEncryptor>,
	) -> Result<HttpResponse, ApiError> {
		let AuthUser(user_id) = user;
		log::info!("Saving {} bank account for user {}", form.country, user_id);
		let details = banking::validate(&form).map_err(|errs| {
			log::info!("Bank account for user {} rejected: {:?}", user_id, errs.0);
			ApiError::from(errs)
		})?;

		let last4: String = {
			let chars: Vec<char> = details.account_number.chars().collect();
			chars[chars.len().saturating_sub(4)..].iter().collect()
		};
		let routing_number_encrypted = match &details.routing_identifier {
			Some(routing) => Some(encryptor.encrypt(routing)?),
			None => None,
		};
		let account = NewBankAccount {
			user_id,
			country: details.country.to_string(),
			currency: details.currency.to_string(),
			banking_system: details.banking_system.to_string(),
			account_holder_name: details.account_holder_name.clone(),
			bank_name: details.bank_name.clone(),
			account_type: details.account_type.clone(),
			account_number_encrypted: encryptor.encrypt(&details.account_number)?,
			account_number_last4: last4,
			routing_number_encrypted,
			verification_status: "pending".to_string(),
			is_verified: false,
			updated_at: Utc::now(),
		};

		let repo = repo.into_inner();
		let saved = blocking(move || repo.upsert_bank_account(account)).await.map_err(|e| {
			log::error!("Failed to save bank account for user {}: {}", user_id, e);
			e
		})?;
		log::info!("Bank account {} saved for user {}", saved.id, user_id);
		Ok(ok(account_view(saved, &encryptor)?))
	}

	pub async fn create_connect_account(
		user: AuthUser,
		repo: web::Data<dyn BankAccountRepo>,
		gateway: web::Data<dyn PaymentGateway>,
	) -> Result<HttpResponse, ApiError> {
		let AuthUser(user_id) = user;
		let lookup = repo.clone().into_inner();
		let account = blocking(move || lookup.find_bank_account(user_id))
			.await?
			.ok_or_else(|| {
				log::info!("User {} tried to connect Stripe without a bank account", user_id);
				ApiError::bad_request("Add a bank account before connecting Stripe")
			})?;

		let account_id = match account.stripe_account_id {
			Some(existing) => existing,
			None => {
				let created = gateway
					.create_connect_account(ConnectAccountRequest {
						user_id,
						country: account.country.clone(),
						email: None,
					})
					.await?;
				log::info!("Created Stripe account {} for user {}", created, user_id);
				let repo = repo.into_inner();
				let stored = created.clone();
				blocking(move || repo.set_stripe_account(user_id, stored)).await?;
				created
			},
		};

		let onboarding_url = gateway.create_onboarding_link(account_id.clone()).await?;
		Ok(ok(ConnectAccountResp { account_id, onboarding_url }))
	}
}
