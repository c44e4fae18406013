use super::{blocking, ok, provider::{ensure_owner, require_provider}};
use crate::{
	badges,
	error::ApiError,
	midware::jwt::AuthUser,
	models::TrustSettingsRequest,
	repo::{ProviderRepo, RepoError},
};
use actix_web::{web, HttpResponse};
use uuid::Uuid;

const HISTORY_LIMIT: i64 = 5;

pub struct BadgeHandler {}

impl BadgeHandler {
	pub async fn get_insights(
		user: AuthUser,
		path: web::Path<Uuid>,
		repo: web::Data<dyn ProviderRepo>,
	) -> Result<HttpResponse, ApiError> {
		let AuthUser(user_id) = user;
		let provider_id = path.into_inner();
		ensure_owner(user_id, provider_id, "view badge insights")?;
		let repo = repo.into_inner();
		let (profile, history) = blocking(move || {
			let profile = require_provider(repo.as_ref(), provider_id)?;
			Ok((profile, repo.badge_history(provider_id, HISTORY_LIMIT)?))
		})
		.await?;
		Ok(ok(badges::insights(&profile, history)))
	}

	pub async fn update_trust_settings(
		user: AuthUser,
		path: web::Path<Uuid>,
		req: web::Json<TrustSettingsRequest>,
		repo: web::Data<dyn ProviderRepo>,
	) -> Result<HttpResponse, ApiError> {
		let AuthUser(user_id) = user;
		let provider_id = path.into_inner();
		ensure_owner(user_id, provider_id, "update trust settings")?;
		let req = req.into_inner();
		let repo = repo.into_inner();
		let (profile, history) = blocking(move || -> Result<Result<_, ApiError>, RepoError> {
			let profile = require_provider(repo.as_ref(), provider_id)?;
			let completed = profile.completed_booking_count;
			let changes = match badges::trust_settings_changes(&req, completed) {
				Ok(changes) => changes,
				Err(msg) => return Ok(Err(ApiError::bad_request(msg))),
			};
			let updated = repo.update_trust_settings(provider_id, changes)?;
			Ok(Ok((updated, repo.badge_history(provider_id, HISTORY_LIMIT)?)))
		})
		.await??;
		log::info!("Trust settings updated for provider {}", provider_id);
		Ok(ok(badges::insights(&profile, history)))
	}
}
