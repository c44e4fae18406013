use super::{blocking, created, ok};
use crate::{
	crypto::FieldEncryptor,
	error::ApiError,
	midware::jwt::AuthUser,
	models::{NewWithdrawalMethod, TransactionQuery, WithdrawalMethodRequest},
	repo::{PayoutRepo, WalletRepo},
	wallet::{self, page_bounds},
};
use actix_web::{web, HttpResponse};
use serde_json::Value;
use uuid::Uuid;
use validator::Validate;

pub struct WalletHandler {}

impl WalletHandler {
	pub async fn get_wallets(
		user: AuthUser,
		repo: web::Data<dyn WalletRepo>,
	) -> Result<HttpResponse, ApiError> {
		let AuthUser(user_id) = user;
		let repo = repo.into_inner();
		let wallets = blocking(move || repo.list_wallets(user_id)).await?;
		Ok(ok(wallets))
	}

	pub async fn list_transactions(
		user: AuthUser,
		query: web::Query<TransactionQuery>,
		repo: web::Data<dyn WalletRepo>,
	) -> Result<HttpResponse, ApiError> {
		let AuthUser(user_id) = user;
		let TransactionQuery { limit, offset, currency } = query.into_inner();
		let (limit, offset) = page_bounds(limit, offset);
		let currency = currency.map(|c| c.trim().to_uppercase()).filter(|c| !c.is_empty());
		log::info!("Listing wallet transactions for user {} (limit {}, offset {})", user_id, limit, offset);
		let repo = repo.into_inner();
		let rows = blocking(move || repo.list_transactions(user_id, currency, limit, offset)).await?;
		Ok(ok(rows))
	}

	pub async fn list_withdrawal_methods(
		user: AuthUser,
		repo: web::Data<dyn WalletRepo>,
	) -> Result<HttpResponse, ApiError> {
		let AuthUser(user_id) = user;
		let repo = repo.into_inner();
		let methods = blocking(move || repo.list_withdrawal_methods(user_id)).await?;
		Ok(ok(methods))
	}

	pub async fn add_withdrawal_method(
		user: AuthUser,
		req: web::Json<WithdrawalMethodRequest>,
		repo: web::Data<dyn WalletRepo>,
		encryptor: web::Data<FieldEncryptor>,
	) -> Result<HttpResponse, ApiError> {
		let AuthUser(user_id) = user;
		log::info!("Adding {} withdrawal method for user {}", req.method_type, user_id);
		req.validate()?;
		let method = wallet::validate_method(&req).map_err(|details| {
			log::info!("Withdrawal method for user {} rejected: {}", user_id, details);
			match details {
				Value::String(msg) => ApiError::bad_request(msg),
				other => ApiError::Invalid("Invalid withdrawal method".to_string(), other),
			}
		})?;

		let row = NewWithdrawalMethod {
			user_id,
			method_type: method.method_type,
			method_name: req.method_name.trim().to_string(),
			country: method.country,
			currency: method.currency,
			banking_system: method.banking_system,
			encrypted_details: encryptor.encrypt_json(&method.details)?,
			masked_details: method.masked,
			is_default: false,
			is_verified: false,
		};
		let repo = repo.into_inner();
		let saved = blocking(move || repo.add_withdrawal_method(row)).await?;
		log::info!("Withdrawal method {} added for user {}", saved.id, user_id);
		Ok(created(saved))
	}

	pub async fn set_default_method(
		user: AuthUser,
		path: web::Path<Uuid>,
		repo: web::Data<dyn WalletRepo>,
	) -> Result<HttpResponse, ApiError> {
		let AuthUser(user_id) = user;
		let method_id = path.into_inner();
		let repo = repo.into_inner();
		let method = blocking(move || repo.set_default_withdrawal_method(user_id, method_id)).await?;
		log::info!("Withdrawal method {} is now default for user {}", method_id, user_id);
		Ok(ok(method))
	}

	pub async fn revenue_summary(
		user: AuthUser,
		wallets: web::Data<dyn WalletRepo>,
		payouts: web::Data<dyn PayoutRepo>,
	) -> Result<HttpResponse, ApiError> {
		let AuthUser(user_id) = user;
		let wallets = wallets.into_inner();
		let payouts = payouts.into_inner();
		let (balances, totals, pending) = blocking(move || {
			Ok((
				wallets.list_wallets(user_id)?,
				wallets.transaction_totals(user_id)?,
				payouts.open_payout_totals(user_id)?,
			))
		})
		.await?;
		Ok(ok(wallet::revenue_summary(&balances, &totals, &pending)))
	}
}
