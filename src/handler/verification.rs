use super::{blocking, created, ok, provider::{ensure_owner, require_provider}};
use crate::{
	error::ApiError,
	midware::jwt::AuthUser,
	models::{NewVerificationRequest, VerificationSubmission},
	repo::{ProviderRepo, RepoError, VerificationRepo},
	verification,
};
use actix_web::{web, HttpResponse};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

pub struct VerificationHandler {}

impl VerificationHandler {
	pub async fn get_status(
		user: AuthUser,
		path: web::Path<Uuid>,
		provider_repo: web::Data<dyn ProviderRepo>,
		verification_repo: web::Data<dyn VerificationRepo>,
	) -> Result<HttpResponse, ApiError> {
		let AuthUser(user_id) = user;
		let provider_id = path.into_inner();
		ensure_owner(user_id, provider_id, "view verification")?;
		let (provider_repo, verification_repo) =
			(provider_repo.into_inner(), verification_repo.into_inner());
		let (profile, stats, latest) = blocking(move || {
			let profile = require_provider(provider_repo.as_ref(), provider_id)?;
			Ok((
				profile,
				provider_repo.provider_stats(provider_id)?,
				verification_repo.latest_verification_request(provider_id)?,
			))
		})
		.await?;
		let prerequisites = verification::prerequisites(&profile, stats);
		Ok(ok(json!({
			"status": profile.verification_status,
			"isVerified": profile.is_verified,
			"idVerified": profile.id_verified,
			"submittedAt": profile.verification_submitted_at,
			"verifiedAt": profile.verified_at,
			"latestRequest": latest,
			"prerequisites": prerequisites,
		})))
	}

	pub async fn submit_request(
		user: AuthUser,
		path: web::Path<Uuid>,
		req: web::Json<VerificationSubmission>,
		provider_repo: web::Data<dyn ProviderRepo>,
		verification_repo: web::Data<dyn VerificationRepo>,
	) -> Result<HttpResponse, ApiError> {
		let AuthUser(user_id) = user;
		let provider_id = path.into_inner();
		ensure_owner(user_id, provider_id, "request verification")?;
		req.validate()?;
		let VerificationSubmission { notes, documents } = req.into_inner();
		verification::check_documents(&documents).map_err(|msg| {
			log::info!("Verification request from {} rejected: {}", provider_id, msg);
			ApiError::bad_request(msg)
		})?;

		let (provider_repo, verification_repo) =
			(provider_repo.into_inner(), verification_repo.into_inner());
		let saved = blocking(move || -> Result<Result<_, ApiError>, RepoError> {
			let profile = require_provider(provider_repo.as_ref(), provider_id)?;
			let stats = provider_repo.provider_stats(provider_id)?;
			let prerequisites = verification::prerequisites(&profile, stats);
			let unmet = verification::unmet_blocking(&prerequisites);
			if !unmet.is_empty() {
				log::info!(
					"Verification for {} blocked by {} unmet prerequisites",
					provider_id,
					unmet.len()
				);
				return Ok(Err(ApiError::Blocked(
					"Verification prerequisites are not met".to_string(),
					json!({ "unmet": unmet }),
				)));
			}
			let request = NewVerificationRequest {
				provider_id,
				status: "pending".to_string(),
				notes: notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
				automated_checks: verification::automated_checks(&prerequisites),
			};
			Ok(Ok(verification_repo.submit_verification(request, documents)?))
		})
		.await??;
		log::info!("Verification request {} submitted by {}", saved.request.id, provider_id);
		Ok(created(saved))
	}
}
