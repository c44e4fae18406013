//! Rules for provider profiles, offerings, portfolio items and availability slots.

use crate::{
	banking,
	models::{
		AvailabilityRequest, CreateProviderRequest, NewAvailabilitySlot, NewOffering,
		NewPortfolioItem, NewProviderProfile, OfferingChanges, OfferingRequest, OfferingUpdate,
		PortfolioRequest, ProviderProfileChanges, UpdateProviderRequest,
	},
};
use bigdecimal::{BigDecimal, Zero};
use chrono::Utc;
use std::collections::BTreeSet;
use uuid::Uuid;

pub const SERVICE_CATEGORIES: &[&str] = &[
	"mixing",
	"mastering",
	"production",
	"songwriting",
	"vocals",
	"session_musician",
	"recording_studio",
	"rehearsal_space",
	"sound_engineering",
	"dj",
	"music_video",
	"photography",
	"graphic_design",
	"marketing",
	"management",
	"lessons",
	"other",
];

/// Statuses a provider may set on their own profile. `suspended` is administrative.
pub const SELF_SERVICE_STATUSES: &[&str] = &["draft", "pending_review", "active"];
pub const RATE_UNITS: &[&str] = &["hour", "session", "project", "day", "track"];
pub const MEDIA_TYPES: &[&str] = &["audio", "video", "image", "link"];
pub const INCLUDE_KEYS: &[&str] = &["offerings", "portfolio", "availability", "reviews"];

pub fn is_valid_category(category: &str) -> bool {
	SERVICE_CATEGORIES.contains(&category)
}

/// Trims, drops blanks and duplicates, rejects unknown categories.
pub fn normalize_categories(raw: &[String]) -> Result<Vec<String>, String> {
	let mut seen = BTreeSet::new();
	let mut out = Vec::new();
	for category in raw.iter().map(|c| c.trim().to_lowercase()).filter(|c| !c.is_empty()) {
		if !is_valid_category(&category) {
			return Err(format!("Invalid service category: {category}"));
		}
		if seen.insert(category.clone()) {
			out.push(category);
		}
	}
	Ok(out)
}

fn rate_currency(raw: Option<&str>) -> Result<Option<String>, String> {
	match raw.map(str::trim).filter(|c| !c.is_empty()) {
		Some(c) if banking::is_supported_currency(c) => Ok(Some(c.to_uppercase())),
		Some(c) => Err(format!("Unsupported currency {c}")),
		None => Ok(None),
	}
}

fn non_negative(rate: &Option<BigDecimal>, field: &str) -> Result<(), String> {
	match rate {
		Some(r) if *r < BigDecimal::zero() => Err(format!("{field} must be zero or greater")),
		_ => Ok(()),
	}
}

fn blank_to_none(value: &Option<String>) -> Option<String> {
	value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

pub fn new_profile(user_id: Uuid, req: &CreateProviderRequest) -> Result<NewProviderProfile, String> {
	let display_name = req.display_name.trim();
	if display_name.is_empty() {
		return Err("displayName must be a non-empty string".to_string());
	}
	non_negative(&req.default_rate, "defaultRate")?;
	Ok(NewProviderProfile {
		user_id,
		display_name: display_name.to_string(),
		headline: blank_to_none(&req.headline),
		bio: blank_to_none(&req.bio),
		categories: normalize_categories(&req.categories)?,
		location: blank_to_none(&req.location),
		website: blank_to_none(&req.website),
		rate_currency: rate_currency(req.rate_currency.as_deref())?
			.unwrap_or_else(|| "USD".to_string()),
		default_rate: req.default_rate.clone(),
		status: "draft".to_string(),
	})
}

pub fn profile_changes(req: &UpdateProviderRequest) -> Result<ProviderProfileChanges, String> {
	if req.is_verified.is_some() {
		return Err("Verification status can only be changed by an administrator".to_string());
	}
	let mut changes = ProviderProfileChanges::default();
	if let Some(name) = &req.display_name {
		let name = name.trim();
		if name.is_empty() {
			return Err("displayName must be a non-empty string".to_string());
		}
		changes.display_name = Some(name.to_string());
	}
	changes.headline = req.headline.as_ref().map(|h| h.trim().to_string());
	changes.bio = req.bio.as_ref().map(|b| b.trim().to_string());
	changes.location = req.location.as_ref().map(|l| l.trim().to_string());
	changes.website = req.website.as_ref().map(|w| w.trim().to_string());
	if let Some(categories) = &req.categories {
		changes.categories = Some(normalize_categories(categories)?);
	}
	changes.rate_currency = rate_currency(req.rate_currency.as_deref())?;
	non_negative(&req.default_rate, "defaultRate")?;
	changes.default_rate = req.default_rate.clone();
	if let Some(status) = &req.status {
		if !SELF_SERVICE_STATUSES.contains(&status.as_str()) {
			return Err(format!("Invalid status: {status}"));
		}
		changes.status = Some(status.clone());
	}

	if changes.display_name.is_none()
		&& changes.headline.is_none()
		&& changes.bio.is_none()
		&& changes.categories.is_none()
		&& changes.location.is_none()
		&& changes.website.is_none()
		&& changes.rate_currency.is_none()
		&& changes.default_rate.is_none()
		&& changes.status.is_none()
	{
		return Err("No fields provided for update".to_string());
	}
	changes.updated_at = Some(Utc::now());
	Ok(changes)
}

fn rate_unit(raw: Option<&str>) -> Result<String, String> {
	let unit = raw.map(str::trim).filter(|u| !u.is_empty()).unwrap_or("session");
	if RATE_UNITS.contains(&unit) {
		Ok(unit.to_string())
	} else {
		Err(format!("Invalid rate unit: {unit}"))
	}
}

pub fn new_offering(
	provider_id: Uuid,
	default_currency: &str,
	req: &OfferingRequest,
) -> Result<NewOffering, String> {
	let category = req.category.trim().to_lowercase();
	if !is_valid_category(&category) {
		return Err(format!("Invalid service category: {category}"));
	}
	if req.rate_amount < BigDecimal::zero() {
		return Err("rateAmount must be zero or greater".to_string());
	}
	Ok(NewOffering {
		provider_id,
		title: req.title.trim().to_string(),
		description: blank_to_none(&req.description),
		category,
		rate_amount: req.rate_amount.clone(),
		rate_currency: rate_currency(req.rate_currency.as_deref())?
			.unwrap_or_else(|| default_currency.to_string()),
		rate_unit: rate_unit(req.rate_unit.as_deref())?,
		is_active: req.is_active.unwrap_or(true),
	})
}

pub fn offering_changes(req: &OfferingUpdate) -> Result<OfferingChanges, String> {
	let category = match &req.category {
		Some(c) => {
			let c = c.trim().to_lowercase();
			if !is_valid_category(&c) {
				return Err(format!("Invalid service category: {c}"));
			}
			Some(c)
		},
		None => None,
	};
	non_negative(&req.rate_amount, "rateAmount")?;
	let unit = match &req.rate_unit {
		Some(u) => Some(rate_unit(Some(u.as_str()))?),
		None => None,
	};
	let changes = OfferingChanges {
		title: req.title.as_ref().map(|t| t.trim().to_string()),
		description: req.description.as_ref().map(|d| d.trim().to_string()),
		category,
		rate_amount: req.rate_amount.clone(),
		rate_currency: rate_currency(req.rate_currency.as_deref())?,
		rate_unit: unit,
		is_active: req.is_active,
		updated_at: None,
	};
	if changes.title.is_none()
		&& changes.description.is_none()
		&& changes.category.is_none()
		&& changes.rate_amount.is_none()
		&& changes.rate_currency.is_none()
		&& changes.rate_unit.is_none()
		&& changes.is_active.is_none()
	{
		return Err("No fields provided for update".to_string());
	}
	Ok(OfferingChanges { updated_at: Some(Utc::now()), ..changes })
}

pub fn new_portfolio_item(
	provider_id: Uuid,
	req: &PortfolioRequest,
) -> Result<NewPortfolioItem, String> {
	let media_type = req.media_type.trim().to_lowercase();
	if !MEDIA_TYPES.contains(&media_type.as_str()) {
		return Err(format!("Invalid media type: {media_type}"));
	}
	Ok(NewPortfolioItem {
		provider_id,
		title: req.title.trim().to_string(),
		description: blank_to_none(&req.description),
		media_url: req.media_url.trim().to_string(),
		media_type,
	})
}

pub fn new_availability(
	provider_id: Uuid,
	req: &AvailabilityRequest,
) -> Result<NewAvailabilitySlot, String> {
	if req.end_time <= req.start_time {
		return Err("endTime must be after startTime".to_string());
	}
	let recurrence_rule = blank_to_none(&req.recurrence_rule);
	if req.is_recurring && recurrence_rule.is_none() {
		return Err("Recurring availability requires a recurrence rule".to_string());
	}
	Ok(NewAvailabilitySlot {
		provider_id,
		start_time: req.start_time,
		end_time: req.end_time,
		is_recurring: req.is_recurring,
		recurrence_rule: if req.is_recurring { recurrence_rule } else { None },
		is_bookable: req.is_bookable.unwrap_or(true),
	})
}

/// Parses `?include=a,b` keeping only known sections.
pub fn parse_includes(raw: Option<&str>) -> BTreeSet<&'static str> {
	let requested: Vec<&str> = raw.unwrap_or_default().split(',').map(str::trim).collect();
	INCLUDE_KEYS.iter().copied().filter(|k| requested.contains(k)).collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use chrono::Duration;

	fn create_request() -> CreateProviderRequest {
		CreateProviderRequest {
			display_name: "  Studio Nine ".into(),
			headline: Some("Mixing for indie artists".into()),
			bio: Some("   ".into()),
			categories: vec!["Mixing".into(), "mastering".into(), "mixing".into(), " ".into()],
			location: None,
			website: None,
			rate_currency: Some("gbp".into()),
			default_rate: None,
		}
	}

	#[test]
	fn new_profile_normalizes_input() {
		let user = Uuid::new_v4();
		let profile = new_profile(user, &create_request()).unwrap();
		assert_eq!(profile.display_name, "Studio Nine");
		assert_eq!(profile.bio, None);
		assert_eq!(profile.categories, vec!["mixing", "mastering"]);
		assert_eq!(profile.rate_currency, "GBP");
		assert_eq!(profile.status, "draft");
	}

	#[test]
	fn new_profile_rejects_unknown_category_and_currency() {
		let mut req = create_request();
		req.categories = vec!["juggling".into()];
		assert_eq!(
			new_profile(Uuid::new_v4(), &req).unwrap_err(),
			"Invalid service category: juggling"
		);
		let mut req = create_request();
		req.rate_currency = Some("XYZ".into());
		assert!(new_profile(Uuid::new_v4(), &req).is_err());
	}

	#[test]
	fn profile_changes_guard_admin_fields() {
		let req = UpdateProviderRequest { is_verified: Some(true), ..Default::default() };
		assert!(profile_changes(&req).is_err());
		let req = UpdateProviderRequest { status: Some("suspended".into()), ..Default::default() };
		assert_eq!(profile_changes(&req).unwrap_err(), "Invalid status: suspended");
		let req = UpdateProviderRequest { display_name: Some(" ".into()), ..Default::default() };
		assert!(profile_changes(&req).is_err());
		assert_eq!(
			profile_changes(&UpdateProviderRequest::default()).unwrap_err(),
			"No fields provided for update"
		);
	}

	#[test]
	fn profile_changes_apply_given_fields() {
		let req = UpdateProviderRequest {
			status: Some("active".into()),
			default_rate: Some("40".parse().unwrap()),
			..Default::default()
		};
		let changes = profile_changes(&req).unwrap();
		assert_eq!(changes.status.as_deref(), Some("active"));
		assert!(changes.updated_at.is_some());
		let req = UpdateProviderRequest {
			default_rate: Some("-1".parse().unwrap()),
			..Default::default()
		};
		assert!(profile_changes(&req).is_err());
	}

	#[test]
	fn offerings_default_currency_and_unit() {
		let req = OfferingRequest {
			title: "Stem mix".into(),
			description: None,
			category: "mixing".into(),
			rate_amount: "150".parse().unwrap(),
			rate_currency: None,
			rate_unit: None,
			is_active: None,
		};
		let offering = new_offering(Uuid::new_v4(), "EUR", &req).unwrap();
		assert_eq!(offering.rate_currency, "EUR");
		assert_eq!(offering.rate_unit, "session");
		assert!(offering.is_active);
		assert!(offering_changes(&OfferingUpdate::default()).is_err());
	}

	#[test]
	fn availability_needs_ordered_times_and_rule() {
		let start = Utc::now();
		let mut req = AvailabilityRequest {
			start_time: start,
			end_time: start,
			is_recurring: false,
			recurrence_rule: None,
			is_bookable: None,
		};
		assert!(new_availability(Uuid::new_v4(), &req).is_err());
		req.end_time = start + Duration::hours(2);
		req.is_recurring = true;
		assert!(new_availability(Uuid::new_v4(), &req).is_err());
		req.recurrence_rule = Some("FREQ=WEEKLY;BYDAY=MO".into());
		let slot = new_availability(Uuid::new_v4(), &req).unwrap();
		assert!(slot.is_bookable);
	}

	#[test]
	fn includes_keep_known_sections() {
		let includes = parse_includes(Some("offerings, reviews,secrets"));
		assert!(includes.contains("offerings"));
		assert!(includes.contains("reviews"));
		assert_eq!(includes.len(), 2);
		assert!(parse_includes(None).is_empty());
	}
}
