use super::{PgRepo, ProviderRepo, RepoError};
use crate::{
	badges,
	models::*,
	schema::{
		creator_bank_accounts, provider_badge_history, service_offerings, service_portfolio_items,
		service_provider_availability, service_provider_profiles, service_reviews,
	},
	verification::ProviderStats,
};
use chrono::{DateTime, Utc};
use diesel::{dsl::exists, pg::PgConnection, prelude::*};
use uuid::Uuid;

/// Moves the provider to the tier they have earned and records why. Returns the stored profile.
pub(super) fn refresh_badge(
	conn: &mut PgConnection,
	provider_id: Uuid,
	trigger: &str,
) -> Result<ProviderProfile, RepoError> {
	let profile = service_provider_profiles::table
		.find(provider_id)
		.select(ProviderProfile::as_select())
		.first(conn)
		.optional()?
		.ok_or(RepoError::NotFound("Service provider"))?;
	let Some((tier, reason)) = badges::reevaluate(&profile, trigger) else {
		return Ok(profile);
	};
	let now = Utc::now();
	let updated = diesel::update(service_provider_profiles::table.find(provider_id))
		.set((
			service_provider_profiles::current_badge.eq(tier.as_str()),
			service_provider_profiles::badge_updated_at.eq(Some(now)),
			service_provider_profiles::updated_at.eq(now),
		))
		.returning(ProviderProfile::as_returning())
		.get_result(conn)?;
	diesel::insert_into(provider_badge_history::table)
		.values(&NewBadgeHistoryEntry {
			provider_id,
			previous_badge: Some(profile.current_badge.clone()),
			new_badge: tier.as_str().to_string(),
			reason,
		})
		.execute(conn)?;
	log::info!(
		"Provider {} moved from {} to {}",
		provider_id,
		profile.current_badge,
		tier.as_str()
	);
	Ok(updated)
}

impl ProviderRepo for PgRepo {
	fn find_provider(&self, user_id: Uuid) -> Result<Option<ProviderProfile>, RepoError> {
		let mut conn = self.conn()?;
		let profile = service_provider_profiles::table
			.find(user_id)
			.select(ProviderProfile::as_select())
			.first(&mut conn)
			.optional()?;
		Ok(profile)
	}

	fn create_provider(&self, profile: NewProviderProfile) -> Result<ProviderProfile, RepoError> {
		let mut conn = self.conn()?;
		diesel::insert_into(service_provider_profiles::table)
			.values(&profile)
			.returning(ProviderProfile::as_returning())
			.get_result(&mut conn)
			.map_err(|e| RepoError::unique_as_conflict(e, "Service provider profile already exists"))
	}

	fn update_provider(
		&self,
		user_id: Uuid,
		changes: ProviderProfileChanges,
	) -> Result<ProviderProfile, RepoError> {
		let mut conn = self.conn()?;
		diesel::update(service_provider_profiles::table.find(user_id))
			.set(&changes)
			.returning(ProviderProfile::as_returning())
			.get_result(&mut conn)
			.optional()?
			.ok_or(RepoError::NotFound("Service provider"))
	}

	fn update_trust_settings(
		&self,
		user_id: Uuid,
		changes: TrustSettingsChanges,
	) -> Result<ProviderProfile, RepoError> {
		let mut conn = self.conn()?;
		diesel::update(service_provider_profiles::table.find(user_id))
			.set(&changes)
			.returning(ProviderProfile::as_returning())
			.get_result(&mut conn)
			.optional()?
			.ok_or(RepoError::NotFound("Service provider"))
	}

	fn list_offerings(&self, provider_id: Uuid, active_only: bool) -> Result<Vec<Offering>, RepoError> {
		let mut conn = self.conn()?;
		let mut query = service_offerings::table
			.filter(service_offerings::provider_id.eq(provider_id))
			.select(Offering::as_select())
			.into_boxed();
		if active_only {
			query = query.filter(service_offerings::is_active.eq(true));
		}
		let rows = query.order(service_offerings::created_at.desc()).load(&mut conn)?;
		Ok(rows)
	}

	fn find_offering(&self, provider_id: Uuid, offering_id: Uuid) -> Result<Option<Offering>, RepoError> {
		let mut conn = self.conn()?;
		let offering = service_offerings::table
			.filter(service_offerings::id.eq(offering_id))
			.filter(service_offerings::provider_id.eq(provider_id))
			.select(Offering::as_select())
			.first(&mut conn)
			.optional()?;
		Ok(offering)
	}

	fn create_offering(&self, offering: NewOffering) -> Result<Offering, RepoError> {
		let mut conn = self.conn()?;
		let saved = diesel::insert_into(service_offerings::table)
			.values(&offering)
			.returning(Offering::as_returning())
			.get_result(&mut conn)?;
		Ok(saved)
	}

	fn update_offering(
		&self,
		provider_id: Uuid,
		offering_id: Uuid,
		changes: OfferingChanges,
	) -> Result<Offering, RepoError> {
		let mut conn = self.conn()?;
		diesel::update(
			service_offerings::table
				.filter(service_offerings::id.eq(offering_id))
				.filter(service_offerings::provider_id.eq(provider_id)),
		)
		.set(&changes)
		.returning(Offering::as_returning())
		.get_result(&mut conn)
		.optional()?
		.ok_or(RepoError::NotFound("Offering"))
	}

	fn list_portfolio(&self, provider_id: Uuid) -> Result<Vec<PortfolioItem>, RepoError> {
		let mut conn = self.conn()?;
		let rows = service_portfolio_items::table
			.filter(service_portfolio_items::provider_id.eq(provider_id))
			.order(service_portfolio_items::created_at.desc())
			.select(PortfolioItem::as_select())
			.load(&mut conn)?;
		Ok(rows)
	}

	fn create_portfolio_item(&self, item: NewPortfolioItem) -> Result<PortfolioItem, RepoError> {
		let mut conn = self.conn()?;
		let saved = diesel::insert_into(service_portfolio_items::table)
			.values(&item)
			.returning(PortfolioItem::as_returning())
			.get_result(&mut conn)?;
		Ok(saved)
	}

	fn delete_portfolio_item(&self, provider_id: Uuid, item_id: Uuid) -> Result<(), RepoError> {
		let mut conn = self.conn()?;
		let deleted = diesel::delete(
			service_portfolio_items::table
				.filter(service_portfolio_items::id.eq(item_id))
				.filter(service_portfolio_items::provider_id.eq(provider_id)),
		)
		.execute(&mut conn)?;
		if deleted == 0 {
			return Err(RepoError::NotFound("Portfolio item"));
		}
		Ok(())
	}

	fn list_availability(
		&self,
		provider_id: Uuid,
		ending_after: Option<DateTime<Utc>>,
		bookable_only: bool,
	) -> Result<Vec<AvailabilitySlot>, RepoError> {
		let mut conn = self.conn()?;
		let mut query = service_provider_availability::table
			.filter(service_provider_availability::provider_id.eq(provider_id))
			.select(AvailabilitySlot::as_select())
			.into_boxed();
		if let Some(after) = ending_after {
			query = query.filter(service_provider_availability::end_time.gt(after));
		}
		if bookable_only {
			query = query.filter(service_provider_availability::is_bookable.eq(true));
		}
		let rows = query.order(service_provider_availability::start_time.asc()).load(&mut conn)?;
		Ok(rows)
	}

	fn create_availability(&self, slot: NewAvailabilitySlot) -> Result<AvailabilitySlot, RepoError> {
		let mut conn = self.conn()?;
		let saved = diesel::insert_into(service_provider_availability::table)
			.values(&slot)
			.returning(AvailabilitySlot::as_returning())
			.get_result(&mut conn)?;
		Ok(saved)
	}

	fn delete_availability(&self, provider_id: Uuid, slot_id: Uuid) -> Result<(), RepoError> {
		let mut conn = self.conn()?;
		let deleted = diesel::delete(
			service_provider_availability::table
				.filter(service_provider_availability::id.eq(slot_id))
				.filter(service_provider_availability::provider_id.eq(provider_id)),
		)
		.execute(&mut conn)?;
		if deleted == 0 {
			return Err(RepoError::NotFound("Availability slot"));
		}
		Ok(())
	}

	fn list_reviews(&self, provider_id: Uuid, published_only: bool) -> Result<Vec<Review>, RepoError> {
		let mut conn = self.conn()?;
		let mut query = service_reviews::table
			.filter(service_reviews::provider_id.eq(provider_id))
			.select(Review::as_select())
			.into_boxed();
		if published_only {
			query = query.filter(service_reviews::is_published.eq(true));
		}
		let rows = query.order(service_reviews::created_at.desc()).load(&mut conn)?;
		Ok(rows)
	}

	fn badge_history(&self, provider_id: Uuid, limit: i64) -> Result<Vec<BadgeHistoryEntry>, RepoError> {
		let mut conn = self.conn()?;
		let rows = provider_badge_history::table
			.filter(provider_badge_history::provider_id.eq(provider_id))
			.order(provider_badge_history::created_at.desc())
			.limit(limit)
			.select(BadgeHistoryEntry::as_select())
			.load(&mut conn)?;
		Ok(rows)
	}

	fn provider_stats(&self, provider_id: Uuid) -> Result<ProviderStats, RepoError> {
		let mut conn = self.conn()?;
		let active_offerings = service_offerings::table
			.filter(service_offerings::provider_id.eq(provider_id))
			.filter(service_offerings::is_active.eq(true))
			.count()
			.get_result::<i64>(&mut conn)?;
		let portfolio_items = service_portfolio_items::table
			.filter(service_portfolio_items::provider_id.eq(provider_id))
			.count()
			.get_result::<i64>(&mut conn)?;
		let has_connect_account = diesel::select(exists(
			creator_bank_accounts::table
				.filter(creator_bank_accounts::user_id.eq(provider_id))
				.filter(creator_bank_accounts::stripe_account_id.is_not_null()),
		))
		.get_result::<bool>(&mut conn)?;
		Ok(ProviderStats { active_offerings, portfolio_items, has_connect_account })
	}
}
