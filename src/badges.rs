//! Provider badge tiers.
//!
//! Tiers are ordered. A tier is met when the completed-booking count and, where the tier asks
//! for one, the average rating reach its thresholds. Providers without reviews count as a
//! 0.0 rating.

use crate::models::{BadgeHistoryEntry, ProviderProfile, TrustSettingsChanges, TrustSettingsRequest};
use bigdecimal::{BigDecimal, RoundingMode, ToPrimitive, Zero};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeTier {
	NewProvider,
	RisingStar,
	Established,
	TopRated,
}

pub const BADGE_SEQUENCE: [BadgeTier; 4] =
	[BadgeTier::NewProvider, BadgeTier::RisingStar, BadgeTier::Established, BadgeTier::TopRated];

pub const MAX_FIRST_BOOKING_DISCOUNT: i32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeRequirement {
	pub min_bookings: i32,
	pub min_rating: Option<f64>,
	pub description: &'static str,
}

impl BadgeTier {
	pub fn as_str(&self) -> &'static str {
		match self {
			BadgeTier::NewProvider => "new_provider",
			BadgeTier::RisingStar => "rising_star",
			BadgeTier::Established => "established",
			BadgeTier::TopRated => "top_rated",
		}
	}

	pub fn label(&self) -> &'static str {
		match self {
			BadgeTier::NewProvider => "New Provider",
			BadgeTier::RisingStar => "Rising Star",
			BadgeTier::Established => "Established",
			BadgeTier::TopRated => "Top Rated",
		}
	}

	pub fn headline(&self) -> &'static str {
		match self {
			BadgeTier::NewProvider => "Welcome aboard, your first booking unlocks momentum.",
			BadgeTier::RisingStar => "Deliver great work to quickly build trust.",
			BadgeTier::Established => "A consistent booking record puts you ahead in discovery.",
			BadgeTier::TopRated => "Elite providers with stellar reviews surface first.",
		}
	}

	pub fn requirements(&self) -> BadgeRequirement {
		match self {
			BadgeTier::NewProvider => BadgeRequirement {
				min_bookings: 0,
				min_rating: None,
				description: "Create your profile and publish at least one offering.",
			},
			BadgeTier::RisingStar => BadgeRequirement {
				min_bookings: 3,
				min_rating: Some(4.5),
				description: "Complete 3 bookings with a 4.5+ rating.",
			},
			BadgeTier::Established => BadgeRequirement {
				min_bookings: 10,
				min_rating: None,
				description: "Complete 10 bookings with satisfied clients.",
			},
			BadgeTier::TopRated => BadgeRequirement {
				min_bookings: 25,
				min_rating: Some(4.8),
				description: "Complete 25 bookings with a 4.8+ rating.",
			},
		}
	}

	pub fn is_met(&self, completed: i32, rating: f64) -> bool {
		let req = self.requirements();
		completed >= req.min_bookings && req.min_rating.map_or(true, |min| rating >= min)
	}
}

impl FromStr for BadgeTier {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		BADGE_SEQUENCE
			.iter()
			.copied()
			.find(|t| t.as_str() == s)
			.ok_or_else(|| format!("Unknown badge tier: {s}"))
	}
}

pub fn percentage(current: f64, required: f64) -> f64 {
	if required <= 0.0 {
		return 1.0;
	}
	(current / required).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Progress {
	pub current: f64,
	pub required: f64,
	pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BadgeProgress {
	pub bookings: Progress,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub rating: Option<Progress>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeState {
	pub tier: BadgeTier,
	pub label: &'static str,
	pub headline: &'static str,
	pub met: bool,
	pub is_current: bool,
	pub description: &'static str,
	pub progress: BadgeProgress,
	pub requirements: BadgeRequirement,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NextBadge {
	pub tier: BadgeTier,
	pub label: &'static str,
	pub description: &'static str,
	pub remaining_bookings: i32,
	pub rating_shortfall: f64,
	pub progress: BadgeProgress,
}

pub fn build_badge_states(
	current: BadgeTier,
	completed: i32,
	rating: f64,
) -> (Vec<BadgeState>, Option<NextBadge>) {
	let states: Vec<BadgeState> = BADGE_SEQUENCE
		.iter()
		.map(|tier| {
			let req = tier.requirements();
			BadgeState {
				tier: *tier,
				label: tier.label(),
				headline: tier.headline(),
				met: tier.is_met(completed, rating),
				is_current: *tier == current,
				description: req.description,
				progress: BadgeProgress {
					bookings: Progress {
						current: completed as f64,
						required: req.min_bookings as f64,
						percentage: percentage(completed as f64, req.min_bookings as f64),
					},
					rating: req.min_rating.map(|min| Progress {
						current: rating,
						required: min,
						percentage: percentage(rating, min),
					}),
				},
				requirements: req,
			}
		})
		.collect();

	let next = states.iter().find(|s| s.tier != current && !s.met).map(|s| NextBadge {
		tier: s.tier,
		label: s.label,
		description: s.description,
		remaining_bookings: (s.requirements.min_bookings - completed).max(0),
		rating_shortfall: s.requirements.min_rating.map_or(0.0, |min| (min - rating).max(0.0)),
		progress: s.progress.clone(),
	});

	(states, next)
}

/// Highest tier whose requirements are all met.
pub fn earned_tier(completed: i32, rating: Option<f64>) -> BadgeTier {
	let rating = rating.unwrap_or(0.0);
	BADGE_SEQUENCE
		.iter()
		.rev()
		.copied()
		.find(|t| t.is_met(completed, rating))
		.unwrap_or(BadgeTier::NewProvider)
}

/// Returns the new tier and the history reason when the profile's tier should change.
pub fn reevaluate(profile: &ProviderProfile, trigger: &str) -> Option<(BadgeTier, String)> {
	let earned = earned_tier(profile.completed_booking_count, profile.average_rating);
	if earned.as_str() == profile.current_badge {
		return None;
	}
	let reason = format!(
		"{} ({} completed bookings, rating {:.2})",
		trigger,
		profile.completed_booking_count,
		profile.average_rating.unwrap_or(0.0)
	);
	Some((earned, reason))
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeHistoryView {
	pub id: uuid::Uuid,
	pub previous_tier: Option<String>,
	pub new_tier: String,
	pub reason: String,
	pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeInsights {
	pub badge_tier: BadgeTier,
	pub badge_label: &'static str,
	pub badge_headline: &'static str,
	pub badge_updated_at: Option<DateTime<Utc>>,
	pub completed_bookings: i32,
	pub average_rating: f64,
	pub review_count: i32,
	pub is_verified: bool,
	pub id_verified: bool,
	pub show_payment_protection: bool,
	pub first_booking_discount_enabled: bool,
	pub first_booking_discount_percent: f64,
	pub first_booking_discount_eligible: bool,
	pub badges: Vec<BadgeState>,
	pub next_badge: Option<NextBadge>,
	pub history: Vec<BadgeHistoryView>,
}

pub fn insights(profile: &ProviderProfile, history: Vec<BadgeHistoryEntry>) -> BadgeInsights {
	let tier = profile.current_badge.parse().unwrap_or(BadgeTier::NewProvider);
	let completed = profile.completed_booking_count;
	let rating = profile.average_rating.unwrap_or(0.0);
	let (badges, next_badge) = build_badge_states(tier, completed, rating);
	BadgeInsights {
		badge_tier: tier,
		badge_label: tier.label(),
		badge_headline: tier.headline(),
		badge_updated_at: profile.badge_updated_at,
		completed_bookings: completed,
		average_rating: rating,
		review_count: profile.review_count,
		is_verified: profile.is_verified,
		id_verified: profile.id_verified,
		show_payment_protection: profile.show_payment_protection,
		first_booking_discount_enabled: profile.first_booking_discount_enabled,
		first_booking_discount_percent: profile
			.first_booking_discount_percent
			.to_f64()
			.unwrap_or(0.0),
		first_booking_discount_eligible: completed == 0,
		badges,
		next_badge,
		history: history
			.into_iter()
			.take(5)
			.map(|h| BadgeHistoryView {
				id: h.id,
				previous_tier: h.previous_badge,
				new_tier: h.new_badge,
				reason: h.reason,
				created_at: h.created_at,
			})
			.collect(),
	}
}

pub fn trust_settings_changes(
	req: &TrustSettingsRequest,
	completed: i32,
) -> Result<TrustSettingsChanges, String> {
	if req.show_payment_protection.is_none()
		&& req.first_booking_discount_enabled.is_none()
		&& req.first_booking_discount_percent.is_none()
	{
		return Err("No fields provided for update".to_string());
	}
	if req.first_booking_discount_enabled == Some(true) && completed > 0 {
		return Err(
			"First booking discount can only be enabled before your first completed booking."
				.to_string(),
		);
	}
	let percent = req
		.first_booking_discount_percent
		.as_ref()
		.map(|p| p.with_scale_round(2, RoundingMode::HalfUp));
	if let Some(percent) = &percent {
		let max = BigDecimal::from(MAX_FIRST_BOOKING_DISCOUNT);
		if *percent < BigDecimal::zero() || *percent > max {
			return Err(format!(
				"firstBookingDiscountPercent must be between 0 and {MAX_FIRST_BOOKING_DISCOUNT}"
			));
		}
	}
	Ok(TrustSettingsChanges {
		show_payment_protection: req.show_payment_protection,
		first_booking_discount_enabled: req.first_booking_discount_enabled,
		first_booking_discount_percent: percent,
		updated_at: Some(Utc::now()),
	})
}
