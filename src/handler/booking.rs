use super::{blocking, created, currency_or_default, ok, provider::ensure_owner};
use crate::{
	bookings::{self, BookingStatus, BookingType, ACTIVE_STATUSES},
	error::ApiError,
	midware::jwt::AuthUser,
	models::{
		Booking, BookingListQuery, BookingStatusUpdate, CreateBookingRequest, NewBooking, NewReview,
		ReviewRequest,
	},
	repo::{bookings::OVERLAP_MESSAGE, BookingRepo, BookingTransition, ProviderRepo, RepoError},
};
use actix_web::{web, HttpResponse};
use bigdecimal::{BigDecimal, Zero};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

pub struct BookingHandler {}

fn status_filter(query: &BookingListQuery) -> Result<Vec<String>, ApiError> {
	bookings::parse_status_filter(query.status.as_deref()).map_err(ApiError::bad_request)
}

fn actor_role(booking: &Booking, user_id: Uuid) -> Option<&'static str> {
	if booking.provider_id == user_id {
		Some("provider")
	} else if booking.booker_id == user_id {
		Some("booker")
	} else {
		None
	}
}

/// Shared path for booker- and provider-initiated bookings.
async fn place_booking(
	req: CreateBookingRequest,
	booker_id: Uuid,
	actor_id: Uuid,
	requested_by: &'static str,
	provider_repo: web::Data<dyn ProviderRepo>,
	booking_repo: web::Data<dyn BookingRepo>,
) -> Result<HttpResponse, ApiError> {
	let booking_type: BookingType = req.booking_type.parse().map_err(|_| {
		ApiError::bad_request("bookingType must be either \"service\" or \"venue\"")
	})?;
	let requested = bookings::to_cents(&req.total_amount);
	if requested <= BigDecimal::zero() {
		return Err(ApiError::bad_request("totalAmount must be greater than zero"));
	}
	if req.scheduled_end <= req.scheduled_start {
		return Err(ApiError::bad_request("scheduledEnd must be after scheduledStart"));
	}
	if req.provider_id == booker_id {
		return Err(ApiError::bad_request("You cannot book your own services"));
	}

	let provider_id = req.provider_id;
	let offering_id = req.service_offering_id;
	let (provider_repo, booking_repo) = (provider_repo.into_inner(), booking_repo.into_inner());
	let writer = booking_repo.clone();
	let (profile, offering, slots, existing) = blocking(move || {
		let Some(profile) = provider_repo.find_provider(provider_id)? else {
			return Ok((None, None, Vec::new(), Vec::new()));
		};
		let offering = match offering_id {
			Some(id) => provider_repo.find_offering(provider_id, id)?,
			None => None,
		};
		let slots = provider_repo.list_availability(provider_id, None, true)?;
		let statuses = ACTIVE_STATUSES.iter().map(|s| s.to_string()).collect();
		let existing = booking_repo.bookings_for_provider(provider_id, statuses)?;
		Ok((Some(profile), offering, slots, existing))
	})
	.await?;

	let profile = profile.ok_or_else(|| ApiError::not_found("Provider not found"))?;
	if profile.status != "active" {
		log::info!("Booking rejected: provider {} is {}", provider_id, profile.status);
		return Err(ApiError::conflict("This provider is not currently accepting bookings."));
	}
	let offering = match offering_id {
		Some(_) => {
			let offering = offering.ok_or_else(|| {
				ApiError::not_found("Service offering not found for this provider")
			})?;
			if !offering.is_active {
				return Err(ApiError::conflict("This service offering is not currently bookable."));
			}
			Some(offering)
		},
		None => None,
	};
	let (start, end) = (req.scheduled_start, req.scheduled_end);
	if !bookings::slot_covers(start, end, &slots) {
		return Err(ApiError::conflict(
			"This provider has no availability covering the requested time. Try another slot.",
		));
	}
	if bookings::has_conflict(start, end, &existing) {
		log::info!("Booking for provider {} overlaps an existing booking", provider_id);
		return Err(ApiError::conflict(OVERLAP_MESSAGE));
	}

	let first_booking =
		profile.first_booking_discount_enabled && profile.completed_booking_count == 0;
	let discount = first_booking.then_some(&profile.first_booking_discount_percent);
	let amounts = bookings::calculate_amounts(&requested, booking_type, discount);
	let currency = currency_or_default(
		req.currency
			.as_deref()
			.filter(|c| !c.trim().is_empty())
			.or(offering.as_ref().map(|o| o.rate_currency.as_str()))
			.or(Some(profile.rate_currency.as_str())),
	);
	let metadata = json!({
		"bookingType": booking_type.as_str(),
		"requestedBy": requested_by,
		"requestedAmount": requested.to_string(),
		"discountAmount": amounts.discount_amount.to_string(),
		"platformFee": amounts.platform_fee.to_string(),
	});
	let booking = NewBooking {
		provider_id,
		booker_id,
		offering_id: offering.map(|o| o.id),
		booking_type: booking_type.as_str().to_string(),
		status: BookingStatus::Pending.as_str().to_string(),
		scheduled_start: start,
		scheduled_end: end,
		currency,
		total_amount: amounts.total_amount,
		discount_amount: amounts.discount_amount,
		platform_fee: amounts.platform_fee,
		provider_payout: amounts.provider_payout,
		booking_notes: req
			.booking_notes
			.map(|n| n.trim().to_string())
			.filter(|n| !n.is_empty()),
	};
	let saved = blocking(move || writer.create_booking(booking, actor_id, metadata))
		.await
		.map_err(|e| {
			log::info!("Booking for provider {} not created: {}", provider_id, e);
			e
		})?;
	log::info!("Booking {} created for provider {} by {}", saved.id, provider_id, actor_id);
	Ok(created(saved))
}

impl BookingHandler {
	pub async fn create_booking(
		user: AuthUser,
		req: web::Json<CreateBookingRequest>,
		provider_repo: web::Data<dyn ProviderRepo>,
		booking_repo: web::Data<dyn BookingRepo>,
	) -> Result<HttpResponse, ApiError> {
		let AuthUser(booker_id) = user;
		req.validate()?;
		let req = req.into_inner();
		log::info!("User {} requested a booking with provider {}", booker_id, req.provider_id);
		place_booking(req, booker_id, booker_id, "booker", provider_repo, booking_repo).await
	}

	/// A provider books a slot on behalf of a client.
	pub async fn create_provider_booking(
		user: AuthUser,
		path: web::Path<Uuid>,
		req: web::Json<CreateBookingRequest>,
		provider_repo: web::Data<dyn ProviderRepo>,
		booking_repo: web::Data<dyn BookingRepo>,
	) -> Result<HttpResponse, ApiError> {
		let AuthUser(user_id) = user;
		let provider_id = path.into_inner();
		ensure_owner(user_id, provider_id, "create bookings")?;
		req.validate()?;
		let req = req.into_inner();
		if req.provider_id != provider_id {
			return Err(ApiError::bad_request("Provider ID mismatch with URL parameter"));
		}
		let booker_id = req.booker_id.ok_or_else(|| ApiError::bad_request("bookerId is required"))?;
		log::info!("Provider {} booking a slot for {}", provider_id, booker_id);
		place_booking(req, booker_id, user_id, "provider", provider_repo, booking_repo).await
	}

	pub async fn list_my_bookings(
		user: AuthUser,
		query: web::Query<BookingListQuery>,
		repo: web::Data<dyn BookingRepo>,
	) -> Result<HttpResponse, ApiError> {
		let AuthUser(user_id) = user;
		let statuses = status_filter(&query)?;
		let repo = repo.into_inner();
		let rows = blocking(move || repo.bookings_for_booker(user_id, statuses)).await?;
		Ok(ok(rows))
	}

	pub async fn provider_bookings(
		user: AuthUser,
		path: web::Path<Uuid>,
		query: web::Query<BookingListQuery>,
		repo: web::Data<dyn BookingRepo>,
	) -> Result<HttpResponse, ApiError> {
		let AuthUser(user_id) = user;
		let provider_id = path.into_inner();
		ensure_owner(user_id, provider_id, "view bookings")?;
		let statuses = status_filter(&query)?;
		let repo = repo.into_inner();
		let rows = blocking(move || repo.bookings_for_provider(provider_id, statuses)).await?;
		Ok(ok(rows))
	}

	pub async fn update_status(
		user: AuthUser,
		path: web::Path<Uuid>,
		req: web::Json<BookingStatusUpdate>,
		provider_repo: web::Data<dyn ProviderRepo>,
		booking_repo: web::Data<dyn BookingRepo>,
	) -> Result<HttpResponse, ApiError> {
		let AuthUser(user_id) = user;
		let booking_id = path.into_inner();
		req.validate()?;
		let BookingStatusUpdate { status, notes } = req.into_inner();
		let next: BookingStatus = status.parse().map_err(ApiError::bad_request)?;
		log::info!("User {} moving booking {} to {}", user_id, booking_id, next);

		let (provider_repo, booking_repo) = (provider_repo.into_inner(), booking_repo.into_inner());
		let updated = blocking(move || -> Result<Result<Booking, ApiError>, RepoError> {
			let booking =
				booking_repo.find_booking(booking_id)?.ok_or(RepoError::NotFound("Booking"))?;
			let Some(role) = actor_role(&booking, user_id) else {
				return Ok(Err(ApiError::forbidden("You do not have access to this booking")));
			};
			let current: BookingStatus = match booking.status.parse() {
				Ok(s) => s,
				Err(msg) => return Ok(Err(ApiError::Internal(msg))),
			};
			if current.is_final() {
				return Ok(Err(ApiError::bad_request(format!(
					"Booking is already {current} and can no longer be updated"
				))));
			}
			if !current.can_transition_to(next) {
				return Ok(Err(ApiError::bad_request(format!(
					"Cannot change booking status from {current} to {next}"
				))));
			}
			let completed = provider_repo
				.find_provider(booking.provider_id)?
				.map(|p| p.completed_booking_count)
				.unwrap_or(0);
			let change =
				bookings::status_change(&booking, next, notes.clone(), completed, Utc::now());
			let metadata =
				bookings::transition_metadata(current, &change, role, notes.as_deref(), completed);
			let transition = BookingTransition {
				booking_id,
				actor_id: user_id,
				from_status: booking.status.clone(),
				change,
				metadata,
			};
			let saved = if next == BookingStatus::Completed {
				booking_repo.complete_booking(transition)?
			} else {
				booking_repo.update_booking_status(transition)?
			};
			Ok(Ok(saved))
		})
		.await??;
		log::info!("Booking {} is now {}", booking_id, updated.status);
		Ok(ok(updated))
	}

	pub async fn create_review(
		user: AuthUser,
		path: web::Path<Uuid>,
		req: web::Json<ReviewRequest>,
		repo: web::Data<dyn BookingRepo>,
	) -> Result<HttpResponse, ApiError> {
		let AuthUser(user_id) = user;
		let booking_id = path.into_inner();
		req.validate()?;
		let ReviewRequest { rating, comment } = req.into_inner();
		let repo = repo.into_inner();
		let review = blocking(move || -> Result<Result<_, ApiError>, RepoError> {
			let booking = repo.find_booking(booking_id)?.ok_or(RepoError::NotFound("Booking"))?;
			if booking.booker_id != user_id {
				return Ok(Err(ApiError::forbidden("Only the booker can review this booking")));
			}
			if booking.status != BookingStatus::Completed.as_str() {
				return Ok(Err(ApiError::bad_request("Only completed bookings can be reviewed")));
			}
			let review = NewReview {
				booking_id,
				provider_id: booking.provider_id,
				reviewer_id: user_id,
				rating,
				comment: comment.map(|c| c.trim().to_string()).filter(|c| !c.is_empty()),
			};
			Ok(Ok(repo.create_review(review)?))
		})
		.await??;
		log::info!("Review {} left on booking {} by {}", review.id, booking_id, user_id);
		Ok(created(review))
	}
}
