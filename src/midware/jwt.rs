use crate::error::ApiError;
use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};
use chrono::{Duration, Utc};
use futures::future::{ready, Ready};
use jsonwebtoken::{decode, encode, errors::Error, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::{error, info};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_TOKEN_HOURS: i64 = 24 * 7;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
	pub iat: usize,
	pub exp: usize,
	pub sub: String,
}

pub struct JWT {
	secret: String,
}

impl JWT {
	pub fn new(s: &str) -> Self {
		Self { secret: s.to_string() }
	}

	pub fn create_jwt(&self, user_id: Uuid, hours: i64) -> Result<String, Error> {
		let now = Utc::now();
		let claims = Claims {
			iat: now.timestamp() as usize,
			exp: (now + Duration::hours(hours)).timestamp() as usize,
			sub: user_id.to_string(),
		};
		info!("Creating token for user {}", claims.sub);
		encode(&Header::default(), &claims, &EncodingKey::from_secret(self.secret.as_ref()))
	}

	pub fn verify_jwt(&self, token: &str) -> Result<Claims, Error> {
		let mut validation = Validation::new(Algorithm::HS256);
		// identity-provider tokens carry an audience we do not pin
		validation.validate_aud = false;
		decode::<Claims>(token, &DecodingKey::from_secret(self.secret.as_ref()), &validation)
			.map(|data| data.claims)
	}
}

/// Token secret and administrator ids, registered as app data.
#[derive(Debug, Clone)]
pub struct AuthConfig {
	pub jwt_secret: String,
	pub admin_ids: Vec<Uuid>,
}

impl AuthConfig {
	pub fn is_admin(&self, user_id: Uuid) -> bool {
		self.admin_ids.contains(&user_id)
	}
}

fn bearer_token(req: &HttpRequest) -> Option<&str> {
	let value = req.headers().get(AUTHORIZATION)?.to_str().ok()?;
	if value.starts_with("bearer ") || value.starts_with("Bearer ") {
		Some(value[7..].trim())
	} else {
		None
	}
}

fn auth_config(req: &HttpRequest) -> Result<&AuthConfig, ApiError> {
	req.app_data::<web::Data<AuthConfig>>().map(|c| c.get_ref()).ok_or_else(|| {
		error!("AuthConfig is not registered");
		ApiError::Internal("Internal server error".to_string())
	})
}

/// `Ok(None)` when no bearer token was sent.
fn identify(req: &HttpRequest) -> Result<Option<Uuid>, ApiError> {
	let Some(token) = bearer_token(req) else {
		return Ok(None);
	};
	let config = auth_config(req)?;
	let claims = JWT::new(&config.jwt_secret).verify_jwt(token).map_err(|e| {
		error!("Invalid token: {:?}", e);
		ApiError::Unauthorized("Invalid token".to_string())
	})?;
	let user_id = Uuid::parse_str(&claims.sub).map_err(|_| {
		error!("Token subject is not a user id: {}", claims.sub);
		ApiError::Unauthorized("Invalid token".to_string())
	})?;
	Ok(Some(user_id))
}

/// The caller, authenticated by bearer token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

impl FromRequest for AuthUser {
	type Error = ApiError;
	type Future = Ready<Result<Self, Self::Error>>;

	fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
		ready(identify(req).and_then(|id| {
			id.map(AuthUser).ok_or_else(|| ApiError::Unauthorized("Missing or invalid token".to_string()))
		}))
	}
}

/// Anonymous callers are allowed; a bad token is still rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaybeAuthUser(pub Option<Uuid>);

impl FromRequest for MaybeAuthUser {
	type Error = ApiError;
	type Future = Ready<Result<Self, Self::Error>>;

	fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
		ready(identify(req).map(MaybeAuthUser))
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminUser(pub Uuid);

impl FromRequest for AdminUser {
	type Error = ApiError;
	type Future = Ready<Result<Self, Self::Error>>;

	fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
		let result = identify(req).and_then(|id| {
			let user_id =
				id.ok_or_else(|| ApiError::Unauthorized("Missing or invalid token".to_string()))?;
			if auth_config(req)?.is_admin(user_id) {
				Ok(AdminUser(user_id))
			} else {
				error!("User {} attempted an admin action", user_id);
				Err(ApiError::forbidden("Admin access required"))
			}
		});
		ready(result)
	}
}
