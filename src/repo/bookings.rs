use super::{providers::refresh_badge, BookingRepo, BookingTransition, PgRepo, RepoError};
use crate::{
	bookings::ACTIVE_STATUSES,
	models::*,
	schema::{
		booking_activity, service_bookings, service_provider_profiles, service_reviews, user_wallets,
		wallet_transactions,
	},
};
use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::Utc;
use diesel::{
	dsl::{avg, count},
	pg::PgConnection,
	prelude::*,
};
use serde_json::Value;
use uuid::Uuid;

pub const OVERLAP_MESSAGE: &str =
	"The provider already has a booking that overlaps with this time. Please choose another slot.";

fn transition(conn: &mut PgConnection, t: &BookingTransition) -> Result<Booking, RepoError> {
	let updated = diesel::update(
		service_bookings::table
			.filter(service_bookings::id.eq(t.booking_id))
			.filter(service_bookings::status.eq(&t.from_status)),
	)
	.set(&t.change)
	.returning(Booking::as_returning())
	.get_result(conn)
	.optional()?;
	let booking = match updated {
		Some(booking) => booking,
		None => {
			let exists = service_bookings::table
				.find(t.booking_id)
				.select(service_bookings::id)
				.first::<Uuid>(conn)
				.optional()?;
			return Err(match exists {
				Some(_) => RepoError::Conflict("Booking status has changed".to_string()),
				None => RepoError::NotFound("Booking"),
			});
		},
	};
	diesel::insert_into(booking_activity::table)
		.values(&NewBookingActivity {
			booking_id: booking.id,
			actor_id: t.actor_id,
			action: format!("status_changed_{}", booking.status),
			metadata: t.metadata.clone(),
		})
		.execute(conn)?;
	Ok(booking)
}

impl BookingRepo for PgRepo {
	fn create_booking(
		&self,
		booking: NewBooking,
		actor_id: Uuid,
		metadata: Value,
	) -> Result<Booking, RepoError> {
		let mut conn = self.conn()?;
		conn.transaction(|conn| {
			// Serializes concurrent requests against the same provider calendar.
			service_provider_profiles::table
				.find(booking.provider_id)
				.select(service_provider_profiles::user_id)
				.for_update()
				.first::<Uuid>(conn)
				.optional()?
				.ok_or(RepoError::NotFound("Service provider"))?;
			let overlapping: i64 = service_bookings::table
				.filter(service_bookings::provider_id.eq(booking.provider_id))
				.filter(service_bookings::status.eq_any(ACTIVE_STATUSES.to_vec()))
				.filter(service_bookings::scheduled_start.lt(booking.scheduled_end))
				.filter(service_bookings::scheduled_end.gt(booking.scheduled_start))
				.count()
				.get_result(conn)?;
			if overlapping > 0 {
				return Err(RepoError::Conflict(OVERLAP_MESSAGE.to_string()));
			}
			let saved = diesel::insert_into(service_bookings::table)
				.values(&booking)
				.returning(Booking::as_returning())
				.get_result(conn)?;
			diesel::insert_into(booking_activity::table)
				.values(&NewBookingActivity {
					booking_id: saved.id,
					actor_id,
					action: "booking_requested".to_string(),
					metadata,
				})
				.execute(conn)?;
			Ok(saved)
		})
	}

	fn find_booking(&self, id: Uuid) -> Result<Option<Booking>, RepoError> {
		let mut conn = self.conn()?;
		let booking = service_bookings::table
			.find(id)
			.select(Booking::as_select())
			.first(&mut conn)
			.optional()?;
		Ok(booking)
	}

	fn bookings_for_provider(
		&self,
		provider_id: Uuid,
		statuses: Vec<String>,
	) -> Result<Vec<Booking>, RepoError> {
		let mut conn = self.conn()?;
		let mut query = service_bookings::table
			.filter(service_bookings::provider_id.eq(provider_id))
			.select(Booking::as_select())
			.into_boxed();
		if !statuses.is_empty() {
			query = query.filter(service_bookings::status.eq_any(statuses));
		}
		let rows = query.order(service_bookings::scheduled_start.desc()).load(&mut conn)?;
		Ok(rows)
	}

	fn bookings_for_booker(
		&self,
		booker_id: Uuid,
		statuses: Vec<String>,
	) -> Result<Vec<Booking>, RepoError> {
		let mut conn = self.conn()?;
		let mut query = service_bookings::table
			.filter(service_bookings::booker_id.eq(booker_id))
			.select(Booking::as_select())
			.into_boxed();
		if !statuses.is_empty() {
			query = query.filter(service_bookings::status.eq_any(statuses));
		}
		let rows = query.order(service_bookings::scheduled_start.desc()).load(&mut conn)?;
		Ok(rows)
	}

	fn update_booking_status(&self, t: BookingTransition) -> Result<Booking, RepoError> {
		let mut conn = self.conn()?;
		conn.transaction(|conn| transition(conn, &t))
	}

	fn complete_booking(&self, t: BookingTransition) -> Result<Booking, RepoError> {
		let mut conn = self.conn()?;
		conn.transaction(|conn| {
			let booking = transition(conn, &t)?;
			let now = Utc::now();
			diesel::insert_into(user_wallets::table)
				.values((
					user_wallets::user_id.eq(booking.provider_id),
					user_wallets::currency.eq(&booking.currency),
					user_wallets::balance.eq(booking.provider_payout.clone()),
					user_wallets::updated_at.eq(now),
				))
				.on_conflict((user_wallets::user_id, user_wallets::currency))
				.do_update()
				.set((
					user_wallets::balance.eq(user_wallets::balance + booking.provider_payout.clone()),
					user_wallets::updated_at.eq(now),
				))
				.execute(conn)?;
			diesel::insert_into(wallet_transactions::table)
				.values(&NewWalletTransaction {
					user_id: booking.provider_id,
					currency: booking.currency.clone(),
					amount: booking.provider_payout.clone(),
					transaction_type: "booking_payout".to_string(),
					reference_id: Some(booking.id),
					description: Some("Completed booking payout".to_string()),
				})
				.execute(conn)?;
			diesel::update(service_provider_profiles::table.find(booking.provider_id))
				.set((
					service_provider_profiles::completed_booking_count
						.eq(service_provider_profiles::completed_booking_count + 1),
					service_provider_profiles::updated_at.eq(now),
				))
				.execute(conn)?;
			refresh_badge(conn, booking.provider_id, "Booking completed")?;
			Ok(booking)
		})
	}

	fn create_review(&self, review: NewReview) -> Result<Review, RepoError> {
		let mut conn = self.conn()?;
		conn.transaction(|conn| {
			let saved = diesel::insert_into(service_reviews::table)
				.values(&review)
				.returning(Review::as_returning())
				.get_result(conn)
				.map_err(|e| RepoError::unique_as_conflict(e, "Booking already reviewed"))?;
			let (average, reviews) = service_reviews::table
				.filter(service_reviews::provider_id.eq(review.provider_id))
				.filter(service_reviews::is_published.eq(true))
				.select((avg(service_reviews::rating), count(service_reviews::id)))
				.first::<(Option<BigDecimal>, i64)>(conn)?;
			diesel::update(service_provider_profiles::table.find(review.provider_id))
				.set((
					service_provider_profiles::average_rating.eq(average.and_then(|a| a.to_f64())),
					service_provider_profiles::review_count.eq(reviews as i32),
					service_provider_profiles::updated_at.eq(Utc::now()),
				))
				.execute(conn)?;
			refresh_badge(conn, review.provider_id, "Review received")?;
			Ok(saved)
		})
	}
}
