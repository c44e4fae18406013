use super::{blocking, created, currency_or_default, ok};
use crate::{
	banking, bookings,
	error::ApiError,
	midware::jwt::AuthUser,
	models::{NewPayoutRequest, PageQuery, PayoutCurrencyQuery, PayoutRequestBody},
	payouts::{self, PayoutStatus},
	repo::{BankAccountRepo, PayoutRepo, WalletRepo},
	wallet::page_bounds,
};
use actix_web::{web, HttpResponse};
use bigdecimal::{BigDecimal, Zero};

pub struct PayoutHandler {}

impl PayoutHandler {
	pub async fn eligibility(
		user: AuthUser,
		query: web::Query<PayoutCurrencyQuery>,
		wallet_repo: web::Data<dyn WalletRepo>,
		payout_repo: web::Data<dyn PayoutRepo>,
	) -> Result<HttpResponse, ApiError> {
		let AuthUser(user_id) = user;
		let currency = currency_or_default(query.currency.as_deref());
		let (wallet_repo, payout_repo) = (wallet_repo.into_inner(), payout_repo.into_inner());
		let lookup = currency.clone();
		let (balance, pending) = blocking(move || {
			Ok((
				wallet_repo.wallet_balance(user_id, lookup.clone())?,
				payout_repo.open_payout_total(user_id, lookup)?,
			))
		})
		.await?;
		log::info!(
			"Payout eligibility for user {} in {}: balance {}, pending {}",
			user_id,
			currency,
			balance,
			pending
		);
		Ok(ok(payouts::eligibility(&currency, balance, pending)))
	}

	pub async fn history(
		user: AuthUser,
		query: web::Query<PageQuery>,
		payout_repo: web::Data<dyn PayoutRepo>,
	) -> Result<HttpResponse, ApiError> {
		let AuthUser(user_id) = user;
		let (limit, offset) = page_bounds(query.limit, query.offset);
		let payout_repo = payout_repo.into_inner();
		let rows = blocking(move || payout_repo.list_payouts(user_id, limit, offset)).await?;
		Ok(ok(rows))
	}

	pub async fn request_payout(
		user: AuthUser,
		body: web::Json<PayoutRequestBody>,
		wallet_repo: web::Data<dyn WalletRepo>,
		payout_repo: web::Data<dyn PayoutRepo>,
		account_repo: web::Data<dyn BankAccountRepo>,
	) -> Result<HttpResponse, ApiError> {
		let AuthUser(user_id) = user;
		let PayoutRequestBody { amount, currency } = body.into_inner();
		let currency = currency_or_default(currency.as_deref());
		let amount = bookings::to_cents(&amount);
		log::info!("User {} requested a payout of {} {}", user_id, amount, currency);

		if amount <= BigDecimal::zero() {
			return Err(ApiError::bad_request("Valid amount is required"));
		}
		if !banking::is_supported_currency(&currency) {
			return Err(ApiError::bad_request(format!("Unsupported currency: {currency}")));
		}
		let min_payout = payouts::minimum_payout(&currency);
		if amount < min_payout {
			return Err(ApiError::bad_request(format!(
				"Minimum payout amount is {min_payout} {currency}"
			)));
		}

		let (wallet_repo, payout_repo, account_repo) =
			(wallet_repo.into_inner(), payout_repo.into_inner(), account_repo.into_inner());
		let lookup = currency.clone();
		let reader = payout_repo.clone();
		let (balance, pending, account) = blocking(move || {
			Ok((
				wallet_repo.wallet_balance(user_id, lookup.clone())?,
				reader.open_payout_total(user_id, lookup)?,
				account_repo.find_bank_account(user_id)?,
			))
		})
		.await?;

		let eligibility = payouts::eligibility(&currency, balance, pending);
		if amount > eligibility.withdrawable_amount {
			log::info!(
				"Payout of {} rejected for user {}: only {} withdrawable",
				amount,
				user_id,
				eligibility.withdrawable_amount
			);
			return Err(ApiError::bad_request("Insufficient balance"));
		}
		let account = account
			.ok_or_else(|| ApiError::bad_request("Add a bank account before requesting a payout"))?;
		if account.stripe_account_id.is_none() {
			return Err(ApiError::bad_request(
				"Stripe Connect account not found. Please complete onboarding first.",
			));
		}
		if !account.is_verified {
			return Err(ApiError::bad_request(
				"Your payout account is not yet verified. Please complete the verification process.",
			));
		}

		let request = NewPayoutRequest {
			user_id,
			bank_account_id: account.id,
			amount,
			currency,
			status: PayoutStatus::Pending.as_str().to_string(),
		};
		let saved = blocking(move || payout_repo.create_payout(request)).await.map_err(|e| {
			log::error!("Failed to store payout request for user {}: {}", user_id, e);
			e
		})?;
		log::info!("Payout request {} created for user {}", saved.id, user_id);
		Ok(created(saved))
	}
}
