use super::{blocking, created, ok};
use crate::{
	error::ApiError,
	midware::jwt::{AuthUser, MaybeAuthUser},
	models::{
		AvailabilityRequest, CreateProviderRequest, IncludeQuery, OfferingRequest, OfferingUpdate,
		PortfolioRequest, ProviderProfile, UpdateProviderRequest,
	},
	providers,
	repo::{ProviderRepo, RepoError},
};
use actix_web::{web, HttpResponse};
use chrono::Utc;
use serde_json::{json, Map, Value};
use uuid::Uuid;
use validator::Validate;

pub struct ProviderHandler {}

pub fn ensure_owner(user_id: Uuid, provider_id: Uuid, action: &str) -> Result<(), ApiError> {
	if user_id != provider_id {
		log::info!("User {} tried to {} for provider {}", user_id, action, provider_id);
		return Err(ApiError::forbidden(format!(
			"You can only {action} for your own service provider profile"
		)));
	}
	Ok(())
}

pub fn require_provider(
	repo: &dyn ProviderRepo,
	provider_id: Uuid,
) -> Result<ProviderProfile, RepoError> {
	repo.find_provider(provider_id)?.ok_or(RepoError::NotFound("Service provider profile"))
}

/// Profiles that are not active are only shown to their owner.
fn require_visible(
	repo: &dyn ProviderRepo,
	provider_id: Uuid,
	is_owner: bool,
) -> Result<Result<ProviderProfile, ApiError>, RepoError> {
	let profile = require_provider(repo, provider_id)?;
	if !is_owner && profile.status != "active" {
		return Ok(Err(ApiError::forbidden("Service provider profile is not available")));
	}
	Ok(Ok(profile))
}

fn to_value<T: serde::Serialize>(rows: T) -> Value {
	serde_json::to_value(rows).unwrap_or(Value::Null)
}

impl ProviderHandler {
	pub async fn create_profile(
		user: AuthUser,
		req: web::Json<CreateProviderRequest>,
		repo: web::Data<dyn ProviderRepo>,
	) -> Result<HttpResponse, ApiError> {
		let AuthUser(user_id) = user;
		log::info!("Creating service provider profile for user {}", user_id);
		req.validate()?;
		let profile = providers::new_profile(user_id, &req).map_err(ApiError::bad_request)?;
		let repo = repo.into_inner();
		let saved = blocking(move || repo.create_provider(profile)).await.map_err(|e| {
			log::info!("Service provider profile for user {} not created: {}", user_id, e);
			e
		})?;
		Ok(created(json!({ "provider": saved })))
	}

	pub async fn get_profile(
		user: MaybeAuthUser,
		path: web::Path<Uuid>,
		query: web::Query<IncludeQuery>,
		repo: web::Data<dyn ProviderRepo>,
	) -> Result<HttpResponse, ApiError> {
		let provider_id = path.into_inner();
		let is_owner = user.0 == Some(provider_id);
		let includes = providers::parse_includes(query.include.as_deref());
		let repo = repo.into_inner();
		let body = blocking(move || -> Result<Result<Map<String, Value>, ApiError>, RepoError> {
			let profile = match require_visible(repo.as_ref(), provider_id, is_owner)? {
				Ok(profile) => profile,
				Err(e) => return Ok(Err(e)),
			};
			let mut body = Map::new();
			body.insert("provider".into(), to_value(&profile));
			if includes.contains("offerings") {
				body.insert("offerings".into(), to_value(repo.list_offerings(provider_id, !is_owner)?));
			}
			if includes.contains("portfolio") {
				body.insert("portfolio".into(), to_value(repo.list_portfolio(provider_id)?));
			}
			if includes.contains("availability") {
				let after = if is_owner { None } else { Some(Utc::now()) };
				body.insert(
					"availability".into(),
					to_value(repo.list_availability(provider_id, after, !is_owner)?),
				);
			}
			if includes.contains("reviews") {
				body.insert("reviews".into(), to_value(repo.list_reviews(provider_id, !is_owner)?));
			}
			Ok(Ok(body))
		})
		.await??;
		Ok(ok(Value::Object(body)))
	}

	pub async fn update_profile(
		user: AuthUser,
		path: web::Path<Uuid>,
		req: web::Json<UpdateProviderRequest>,
		repo: web::Data<dyn ProviderRepo>,
	) -> Result<HttpResponse, ApiError> {
		let AuthUser(user_id) = user;
		let provider_id = path.into_inner();
		ensure_owner(user_id, provider_id, "update the profile")?;
		req.validate()?;
		let changes = providers::profile_changes(&req).map_err(|msg| {
			log::info!("Profile update for {} rejected: {}", provider_id, msg);
			ApiError::bad_request(msg)
		})?;
		let repo = repo.into_inner();
		let updated = blocking(move || repo.update_provider(provider_id, changes)).await?;
		log::info!("Service provider profile {} updated", provider_id);
		Ok(ok(json!({ "provider": updated })))
	}

	pub async fn list_offerings(
		user: MaybeAuthUser,
		path: web::Path<Uuid>,
		repo: web::Data<dyn ProviderRepo>,
	) -> Result<HttpResponse, ApiError> {
		let provider_id = path.into_inner();
		let is_owner = user.0 == Some(provider_id);
		let repo = repo.into_inner();
		let offerings = blocking(move || {
			if let Err(e) = require_visible(repo.as_ref(), provider_id, is_owner)? {
				return Ok(Err(e));
			}
			Ok(Ok(repo.list_offerings(provider_id, !is_owner)?))
		})
		.await??;
		Ok(ok(offerings))
	}

	pub async fn create_offering(
		user: AuthUser,
		path: web::Path<Uuid>,
		req: web::Json<OfferingRequest>,
		repo: web::Data<dyn ProviderRepo>,
	) -> Result<HttpResponse, ApiError> {
		let AuthUser(user_id) = user;
		let provider_id = path.into_inner();
		ensure_owner(user_id, provider_id, "manage offerings")?;
		req.validate()?;
		let req = req.into_inner();
		let repo = repo.into_inner();
		let saved = blocking(move || -> Result<Result<_, ApiError>, RepoError> {
			let profile = require_provider(repo.as_ref(), provider_id)?;
			match providers::new_offering(provider_id, &profile.rate_currency, &req) {
				Ok(offering) => Ok(Ok(repo.create_offering(offering)?)),
				Err(msg) => Ok(Err(ApiError::bad_request(msg))),
			}
		})
		.await??;
		log::info!("Offering {} created for provider {}", saved.id, provider_id);
		Ok(created(saved))
	}

	pub async fn update_offering(
		user: AuthUser,
		path: web::Path<(Uuid, Uuid)>,
		req: web::Json<OfferingUpdate>,
		repo: web::Data<dyn ProviderRepo>,
	) -> Result<HttpResponse, ApiError> {
		let AuthUser(user_id) = user;
		let (provider_id, offering_id) = path.into_inner();
		ensure_owner(user_id, provider_id, "manage offerings")?;
		req.validate()?;
		let changes = providers::offering_changes(&req).map_err(ApiError::bad_request)?;
		let repo = repo.into_inner();
		let updated =
			blocking(move || repo.update_offering(provider_id, offering_id, changes)).await?;
		Ok(ok(updated))
	}

	pub async fn list_portfolio(
		user: MaybeAuthUser,
		path: web::Path<Uuid>,
		repo: web::Data<dyn ProviderRepo>,
	) -> Result<HttpResponse, ApiError> {
		let provider_id = path.into_inner();
		let is_owner = user.0 == Some(provider_id);
		let repo = repo.into_inner();
		let items = blocking(move || {
			if let Err(e) = require_visible(repo.as_ref(), provider_id, is_owner)? {
				return Ok(Err(e));
			}
			Ok(Ok(repo.list_portfolio(provider_id)?))
		})
		.await??;
		Ok(ok(items))
	}

	pub async fn create_portfolio_item(
		user: AuthUser,
		path: web::Path<Uuid>,
		req: web::Json<PortfolioRequest>,
		repo: web::Data<dyn ProviderRepo>,
	) -> Result<HttpResponse, ApiError> {
		let AuthUser(user_id) = user;
		let provider_id = path.into_inner();
		ensure_owner(user_id, provider_id, "manage the portfolio")?;
		req.validate()?;
		let item = providers::new_portfolio_item(provider_id, &req).map_err(ApiError::bad_request)?;
		let repo = repo.into_inner();
		let saved = blocking(move || {
			require_provider(repo.as_ref(), provider_id)?;
			repo.create_portfolio_item(item)
		})
		.await?;
		Ok(created(saved))
	}

	pub async fn delete_portfolio_item(
		user: AuthUser,
		path: web::Path<(Uuid, Uuid)>,
		repo: web::Data<dyn ProviderRepo>,
	) -> Result<HttpResponse, ApiError> {
		let AuthUser(user_id) = user;
		let (provider_id, item_id) = path.into_inner();
		ensure_owner(user_id, provider_id, "manage the portfolio")?;
		let repo = repo.into_inner();
		blocking(move || repo.delete_portfolio_item(provider_id, item_id)).await?;
		log::info!("Portfolio item {} removed by provider {}", item_id, provider_id);
		Ok(ok(json!({ "id": item_id, "deleted": true })))
	}

	pub async fn list_availability(
		user: MaybeAuthUser,
		path: web::Path<Uuid>,
		repo: web::Data<dyn ProviderRepo>,
	) -> Result<HttpResponse, ApiError> {
		let provider_id = path.into_inner();
		let is_owner = user.0 == Some(provider_id);
		let after = if is_owner { None } else { Some(Utc::now()) };
		let repo = repo.into_inner();
		let slots = blocking(move || {
			if let Err(e) = require_visible(repo.as_ref(), provider_id, is_owner)? {
				return Ok(Err(e));
			}
			Ok(Ok(repo.list_availability(provider_id, after, !is_owner)?))
		})
		.await??;
		Ok(ok(slots))
	}

	pub async fn create_availability(
		user: AuthUser,
		path: web::Path<Uuid>,
		req: web::Json<AvailabilityRequest>,
		repo: web::Data<dyn ProviderRepo>,
	) -> Result<HttpResponse, ApiError> {
		let AuthUser(user_id) = user;
		let provider_id = path.into_inner();
		ensure_owner(user_id, provider_id, "manage availability")?;
		req.validate()?;
		let slot = providers::new_availability(provider_id, &req).map_err(ApiError::bad_request)?;
		let repo = repo.into_inner();
		let saved = blocking(move || {
			require_provider(repo.as_ref(), provider_id)?;
			repo.create_availability(slot)
		})
		.await?;
		Ok(created(saved))
	}

	pub async fn delete_availability(
		user: AuthUser,
		path: web::Path<(Uuid, Uuid)>,
		repo: web::Data<dyn ProviderRepo>,
	) -> Result<HttpResponse, ApiError> {
		let AuthUser(user_id) = user;
		let (provider_id, slot_id) = path.into_inner();
		ensure_owner(user_id, provider_id, "manage availability")?;
		let repo = repo.into_inner();
		blocking(move || repo.delete_availability(provider_id, slot_id)).await?;
		Ok(ok(json!({ "id": slot_id, "deleted": true })))
	}
}
