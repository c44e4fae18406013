use super::{bank_account::account_view, blocking, ok};
use crate::{
	crypto::FieldEncryptor,
	error::ApiError,
	gateway::{PaymentGateway, TransferRequest},
	midware::jwt::AdminUser,
	models::{
		AdminPayoutQuery, BankVerificationUpdate, PayoutRequest, PayoutStatusChange,
		PayoutStatusUpdate, VerificationDecisionRequest,
	},
	payouts::PayoutStatus,
	repo::{BankAccountRepo, PayoutRepo, RepoError, VerificationRepo},
	verification::Decision,
	wallet::page_bounds,
};
use actix_web::{web, HttpResponse};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub struct AdminHandler {}

/// Runs the transfer for a request already claimed as processing. A rejected transfer
/// leaves the request failed with the gateway message as admin notes.
async fn start_transfer(
	payout_id: Uuid,
	transfer: TransferRequest,
	payout_repo: Arc<dyn PayoutRepo>,
	gateway: web::Data<dyn PaymentGateway>,
) -> Result<PayoutRequest, ApiError> {
	let processing = PayoutStatus::Processing.as_str().to_string();
	match gateway.create_transfer(transfer).await {
		Ok(transfer_id) => {
			log::info!("Stripe transfer {} created for payout request {}", transfer_id, payout_id);
			let change = PayoutStatusChange {
				status: processing.clone(),
				admin_notes: None,
				stripe_transfer_id: Some(transfer_id),
				processed_at: None,
				updated_at: Utc::now(),
			};
			blocking(move || payout_repo.update_payout(payout_id, processing, change)).await
		},
		Err(e) => {
			log::error!("Stripe transfer for payout request {} failed: {}", payout_id, e);
			let now = Utc::now();
			let change = PayoutStatusChange {
				status: PayoutStatus::Failed.as_str().to_string(),
				admin_notes: Some(format!("Stripe transfer failed: {e}")),
				stripe_transfer_id: None,
				processed_at: Some(now),
				updated_at: now,
			};
			if let Err(mark) =
				blocking(move || payout_repo.update_payout(payout_id, processing, change)).await
			{
				log::error!("Payout request {} not marked failed: {}", payout_id, mark);
			}
			Err(e.into())
		},
	}
}

impl AdminHandler {
	pub async fn verify_bank_account(
		admin: AdminUser,
		path: web::Path<Uuid>,
		req: web::Json<BankVerificationUpdate>,
		repo: web::Data<dyn BankAccountRepo>,
		encryptor: web::Data<FieldEncryptor>,
	) -> Result<HttpResponse, ApiError> {
		let AdminUser(admin_id) = admin;
		let user_id = path.into_inner();
		let verified = req.verified;
		let repo = repo.into_inner();
		let account = blocking(move || repo.set_bank_verification(user_id, verified)).await?;
		let account = account_view(account, &encryptor)?;
		log::info!(
			"Admin {} set bank account of user {} verified={}",
			admin_id,
			user_id,
			verified
		);
		Ok(ok(account))
	}

	pub async fn list_payouts(
		_admin: AdminUser,
		query: web::Query<AdminPayoutQuery>,
		repo: web::Data<dyn PayoutRepo>,
	) -> Result<HttpResponse, ApiError> {
		let AdminPayoutQuery { status, limit, offset } = query.into_inner();
		let status = match status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
			Some(raw) => Some(
				raw.parse::<PayoutStatus>().map_err(ApiError::bad_request)?.as_str().to_string(),
			),
			None => None,
		};
		let (limit, offset) = page_bounds(limit, offset);
		let repo = repo.into_inner();
		let rows = blocking(move || repo.list_payouts_by_status(status, limit, offset)).await?;
		Ok(ok(rows))
	}

	pub async fn update_payout(
		admin: AdminUser,
		path: web::Path<Uuid>,
		req: web::Json<PayoutStatusUpdate>,
		payout_repo: web::Data<dyn PayoutRepo>,
		account_repo: web::Data<dyn BankAccountRepo>,
		gateway: web::Data<dyn PaymentGateway>,
	) -> Result<HttpResponse, ApiError> {
		let AdminUser(admin_id) = admin;
		let payout_id = path.into_inner();
		req.validate()?;
		let PayoutStatusUpdate { status, notes } = req.into_inner();
		let next: PayoutStatus = status.parse().map_err(ApiError::bad_request)?;
		log::info!("Admin {} moving payout request {} to {}", admin_id, payout_id, next.as_str());

		let (payout_repo, account_repo) = (payout_repo.into_inner(), account_repo.into_inner());
		let reader = payout_repo.clone();
		let (payout, account) = blocking(move || {
			let payout =
				reader.find_payout(payout_id)?.ok_or(RepoError::NotFound("Payout request"))?;
			let account = account_repo.find_bank_account(payout.user_id)?;
			Ok((payout, account))
		})
		.await?;

		let current: PayoutStatus = payout.status.parse().map_err(ApiError::Internal)?;
		if !current.can_transition_to(next) {
			return Err(ApiError::bad_request(format!(
				"Cannot change payout status from {} to {}",
				current.as_str(),
				next.as_str()
			)));
		}

		let now = Utc::now();
		let notes = notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
		let from_status = payout.status.clone();
		if next == PayoutStatus::Processing {
			let destination = account.and_then(|a| a.stripe_account_id).ok_or_else(|| {
				ApiError::bad_request("Payout account is not connected to Stripe")
			})?;
			let claim = PayoutStatusChange {
				status: next.as_str().to_string(),
				admin_notes: notes,
				stripe_transfer_id: None,
				processed_at: None,
				updated_at: now,
			};
			let claimer = payout_repo.clone();
			blocking(move || claimer.update_payout(payout_id, from_status, claim)).await.map_err(
				|e| {
					log::info!("Payout request {} was not claimed for processing: {}", payout_id, e);
					e
				},
			)?;
			let transfer = TransferRequest {
				amount: payout.amount.clone(),
				currency: payout.currency.clone(),
				destination,
				payout_request_id: payout.id,
			};
			let updated = start_transfer(payout_id, transfer, payout_repo, gateway).await?;
			return Ok(ok(updated));
		}

		let finished = matches!(
			next,
			PayoutStatus::Completed | PayoutStatus::Rejected | PayoutStatus::Failed
		);
		let change = PayoutStatusChange {
			status: next.as_str().to_string(),
			admin_notes: notes,
			stripe_transfer_id: None,
			processed_at: finished.then_some(now),
			updated_at: now,
		};
		let updated = blocking(move || {
			if next == PayoutStatus::Completed {
				payout_repo.complete_payout(payout_id, from_status, change)
			} else {
				payout_repo.update_payout(payout_id, from_status, change)
			}
		})
		.await
		.map_err(|e| {
			log::error!("Payout request {} not moved to {}: {}", payout_id, next.as_str(), e);
			e
		})?;
		log::info!("Payout request {} is now {}", payout_id, updated.status);
		Ok(ok(updated))
	}

	pub async fn get_verification(
		_admin: AdminUser,
		path: web::Path<Uuid>,
		repo: web::Data<dyn VerificationRepo>,
	) -> Result<HttpResponse, ApiError> {
		let request_id = path.into_inner();
		let repo = repo.into_inner();
		let request = blocking(move || {
			repo.find_verification_request(request_id)?
				.ok_or(RepoError::NotFound("Verification request"))
		})
		.await?;
		Ok(ok(request))
	}

	pub async fn decide_verification(
		admin: AdminUser,
		path: web::Path<Uuid>,
		req: web::Json<VerificationDecisionRequest>,
		repo: web::Data<dyn VerificationRepo>,
	) -> Result<HttpResponse, ApiError> {
		let AdminUser(admin_id) = admin;
		let request_id = path.into_inner();
		req.validate()?;
		let VerificationDecisionRequest { decision, notes } = req.into_inner();
		let decision: Decision = decision.parse().map_err(ApiError::bad_request)?;
		let notes = notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
		let repo = repo.into_inner();
		let decided =
			blocking(move || repo.decide_verification(request_id, admin_id, decision, notes)).await?;
		log::info!(
			"Admin {} {} verification request {}",
			admin_id,
			decided.status,
			request_id
		);
		Ok(ok(decided))
	}
}
