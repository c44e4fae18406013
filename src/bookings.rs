use crate::models::{AvailabilitySlot, Booking, BookingStatusChange};
use bigdecimal::{BigDecimal, RoundingMode, Zero};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::{fmt, str::FromStr};

pub const STANDARD_HOLD_DAYS: i64 = 14;
pub const TRUSTED_HOLD_DAYS: i64 = 7;
pub const TRUSTED_PROVIDER_BOOKINGS: i32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingStatus {
	Pending,
	ConfirmedAwaitingPayment,
	Paid,
	Completed,
	Cancelled,
	Disputed,
}

impl BookingStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			BookingStatus::Pending => "pending",
			BookingStatus::ConfirmedAwaitingPayment => "confirmed_awaiting_payment",
			BookingStatus::Paid => "paid",
			BookingStatus::Completed => "completed",
			BookingStatus::Cancelled => "cancelled",
			BookingStatus::Disputed => "disputed",
		}
	}

	pub fn is_final(&self) -> bool {
		matches!(self, BookingStatus::Completed | BookingStatus::Cancelled | BookingStatus::Disputed)
	}

	/// Statuses that occupy the provider's calendar.
	pub fn is_active(&self) -> bool {
		matches!(
			self,
			BookingStatus::Pending
				| BookingStatus::ConfirmedAwaitingPayment
				| BookingStatus::Paid
				| BookingStatus::Completed
		)
	}

	pub fn allowed_next(&self) -> &'static [BookingStatus] {
		use BookingStatus::*;
		match self {
			Pending => &[Pending, ConfirmedAwaitingPayment, Cancelled],
			ConfirmedAwaitingPayment => &[ConfirmedAwaitingPayment, Paid, Cancelled],
			Paid => &[Paid, Completed, Disputed],
			Completed | Cancelled | Disputed => &[],
		}
	}

	pub fn can_transition_to(&self, next: BookingStatus) -> bool {
		self.allowed_next().contains(&next)
	}
}

pub const ACTIVE_STATUSES: &[&str] = &["pending", "confirmed_awaiting_payment", "paid", "completed"];

impl FromStr for BookingStatus {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim() {
			"pending" => Ok(BookingStatus::Pending),
			"confirmed_awaiting_payment" => Ok(BookingStatus::ConfirmedAwaitingPayment),
			"paid" => Ok(BookingStatus::Paid),
			"completed" => Ok(BookingStatus::Completed),
			"cancelled" => Ok(BookingStatus::Cancelled),
			"disputed" => Ok(BookingStatus::Disputed),
			other => Err(format!("Invalid booking status: {other}")),
		}
	}
}

impl fmt::Display for BookingStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BookingType {
	Service,
	Venue,
}

impl BookingType {
	pub fn as_str(&self) -> &'static str {
		match self {
			BookingType::Service => "service",
			BookingType::Venue => "venue",
		}
	}

	/// Platform fee in percent.
	pub fn fee_percent(&self) -> i64 {
		match self {
			BookingType::Service => 12,
			BookingType::Venue => 10,
		}
	}
}

impl FromStr for BookingType {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim() {
			"service" => Ok(BookingType::Service),
			"venue" => Ok(BookingType::Venue),
			other => Err(format!("Invalid booking type: {other}")),
		}
	}
}

/// Rounds a money amount to cents, half-up.
pub fn to_cents(amount: &BigDecimal) -> BigDecimal {
	amount.with_scale_round(2, RoundingMode::HalfUp)
}

fn percent_of(amount: &BigDecimal, percent: &BigDecimal) -> BigDecimal {
	to_cents(&(amount * percent / BigDecimal::from(100)))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingAmounts {
	pub total_amount: BigDecimal,
	pub discount_amount: BigDecimal,
	pub platform_fee: BigDecimal,
	pub provider_payout: BigDecimal,
}

/// Splits the amount charged into platform fee and provider payout.
///
/// `discount_percent` is the provider's first-booking discount, already known to apply. It
/// comes off the requested amount before the fee is taken.
pub fn calculate_amounts(
	requested: &BigDecimal,
	booking_type: BookingType,
	discount_percent: Option<&BigDecimal>,
) -> BookingAmounts {
	let requested = to_cents(requested);
	let discount_amount = match discount_percent {
		Some(p) if *p > BigDecimal::zero() => percent_of(&requested, p),
		_ => BigDecimal::zero().with_scale(2),
	};
	let total_amount = &requested - &discount_amount;
	let platform_fee = percent_of(&total_amount, &BigDecimal::from(booking_type.fee_percent()));
	let provider_payout = &total_amount - &platform_fee;
	BookingAmounts { total_amount, discount_amount, platform_fee, provider_payout }
}

pub fn hold_days(provider_completed_bookings: i32) -> i64 {
	if provider_completed_bookings >= TRUSTED_PROVIDER_BOOKINGS {
		TRUSTED_HOLD_DAYS
	} else {
		STANDARD_HOLD_DAYS
	}
}

pub fn auto_release_at(scheduled_end: DateTime<Utc>, provider_completed_bookings: i32) -> DateTime<Utc> {
	scheduled_end + Duration::days(hold_days(provider_completed_bookings))
}

pub fn overlaps(
	start: DateTime<Utc>,
	end: DateTime<Utc>,
	other_start: DateTime<Utc>,
	other_end: DateTime<Utc>,
) -> bool {
	other_start < end && other_end > start
}

pub fn has_conflict(start: DateTime<Utc>, end: DateTime<Utc>, existing: &[Booking]) -> bool {
	existing.iter().any(|b| {
		b.status.parse::<BookingStatus>().map(|s| s.is_active()).unwrap_or(false)
			&& overlaps(start, end, b.scheduled_start, b.scheduled_end)
	})
}

pub fn slot_covers(start: DateTime<Utc>, end: DateTime<Utc>, slots: &[AvailabilitySlot]) -> bool {
	slots.iter().any(|s| s.is_bookable && s.start_time <= start && s.end_time >= end)
}

/// Column updates for moving a booking into `next`.
///
/// Cancelling or disputing stores the notes as the reason, falling back to the reason already
/// on the booking and then to a generic one.
pub fn status_change(
	booking: &Booking,
	next: BookingStatus,
	notes: Option<String>,
	provider_completed_bookings: i32,
	now: DateTime<Utc>,
) -> BookingStatusChange {
	let mut change = BookingStatusChange {
		status: Some(next.as_str().to_string()),
		status_notes: notes,
		updated_at: Some(now),
		..Default::default()
	};
	match next {
		BookingStatus::ConfirmedAwaitingPayment => change.confirmed_at = Some(now),
		BookingStatus::Paid => {
			change.paid_at = Some(now);
			change.auto_release_at =
				Some(auto_release_at(booking.scheduled_end, provider_completed_bookings));
		},
		BookingStatus::Completed => change.completed_at = Some(now),
		BookingStatus::Cancelled => {
			change.cancelled_at = Some(now);
			change.cancellation_reason = change
				.status_notes
				.clone()
				.or_else(|| booking.cancellation_reason.clone())
				.or_else(|| Some("Booking cancelled".to_string()));
		},
		BookingStatus::Disputed => {
			change.disputed_at = Some(now);
			change.dispute_reason = change
				.status_notes
				.clone()
				.or_else(|| booking.dispute_reason.clone())
				.or_else(|| Some("Booking disputed".to_string()));
		},
		BookingStatus::Pending => {},
	}
	change
}

/// Activity metadata for a status change, including the hold and reason it recorded.
pub fn transition_metadata(
	from: BookingStatus,
	change: &BookingStatusChange,
	actor_role: &str,
	notes: Option<&str>,
	provider_completed_bookings: i32,
) -> Value {
	let mut metadata = json!({
		"from": from.as_str(),
		"to": change.status,
		"actorRole": actor_role,
		"notes": notes,
	});
	if let Some(release) = change.auto_release_at {
		metadata["autoReleaseAt"] = json!(release);
		metadata["holdDays"] = json!(hold_days(provider_completed_bookings));
	}
	if let Some(reason) = &change.cancellation_reason {
		metadata["cancellationReason"] = json!(reason);
	}
	if let Some(reason) = &change.dispute_reason {
		metadata["disputeReason"] = json!(reason);
	}
	metadata
}

/// Parses `?status=a,b` into known statuses, ignoring blanks.
pub fn parse_status_filter(raw: Option<&str>) -> Result<Vec<String>, String> {
	let Some(raw) = raw else {
		return Ok(Vec::new());
	};
	raw.split(',')
		.map(str::trim)
		.filter(|s| !s.is_empty())
		.map(|s| s.parse::<BookingStatus>().map(|st| st.as_str().to_string()))
		.collect()
}
