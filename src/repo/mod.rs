//! Persistence seams. Handlers depend on these traits, `PgRepo` implements them over diesel.

mod bank_accounts;
pub(crate) mod bookings;
mod payouts;
mod providers;
mod verification;
mod wallets;

use crate::{
	db::DbPool,
	models::*,
	verification::{Decision, ProviderStats},
};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::{
	pg::PgConnection,
	r2d2::{ConnectionManager, PooledConnection},
	result::{DatabaseErrorKind, Error as DieselError},
};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum RepoError {
	#[error("{0} not found")]
	NotFound(&'static str),
	#[error("{0}")]
	Conflict(String),
	#[error("Insufficient balance")]
	InsufficientBalance,
	#[error("database error: {0}")]
	Database(#[from] DieselError),
	#[error("connection pool error: {0}")]
	Pool(#[from] diesel::r2d2::PoolError),
}

impl RepoError {
	/// Turns a unique-constraint violation into a conflict with the given message.
	pub(crate) fn unique_as_conflict(err: DieselError, message: &str) -> Self {
		match err {
			DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
				RepoError::Conflict(message.to_string())
			},
			other => RepoError::Database(other),
		}
	}
}

/// A booking moving from `from_status` to the status carried by `change`.
#[derive(Debug, Clone)]
pub struct BookingTransition {
	pub booking_id: Uuid,
	pub actor_id: Uuid,
	pub from_status: String,
	pub change: BookingStatusChange,
	pub metadata: Value,
}

#[cfg_attr(test, mockall::automock)]
pub trait BankAccountRepo: Send + Sync {
	fn find_bank_account(&self, user_id: Uuid) -> Result<Option<BankAccount>, RepoError>;
	fn upsert_bank_account(&self, account: NewBankAccount) -> Result<BankAccount, RepoError>;
	fn set_stripe_account(
		&self,
		user_id: Uuid,
		stripe_account_id: String,
	) -> Result<BankAccount, RepoError>;
	fn set_bank_verification(&self, user_id: Uuid, verified: bool) -> Result<BankAccount, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait WalletRepo: Send + Sync {
	fn list_wallets(&self, user_id: Uuid) -> Result<Vec<Wallet>, RepoError>;
	/// Zero when the user has no wallet in that currency.
	fn wallet_balance(&self, user_id: Uuid, currency: String) -> Result<BigDecimal, RepoError>;
	fn list_transactions(
		&self,
		user_id: Uuid,
		currency: Option<String>,
		limit: i64,
		offset: i64,
	) -> Result<Vec<WalletTransaction>, RepoError>;
	fn transaction_totals(&self, user_id: Uuid) -> Result<Vec<TransactionTotal>, RepoError>;
	fn list_withdrawal_methods(&self, user_id: Uuid) -> Result<Vec<WithdrawalMethod>, RepoError>;
	/// The first method a user adds becomes the default.
	fn add_withdrawal_method(
		&self,
		method: NewWithdrawalMethod,
	) -> Result<WithdrawalMethod, RepoError>;
	fn set_default_withdrawal_method(
		&self,
		user_id: Uuid,
		method_id: Uuid,
	) -> Result<WithdrawalMethod, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait PayoutRepo: Send + Sync {
	/// Sum of pending, approved and processing requests.
	fn open_payout_total(&self, user_id: Uuid, currency: String) -> Result<BigDecimal, RepoError>;
	fn open_payout_totals(&self, user_id: Uuid) -> Result<Vec<(String, BigDecimal)>, RepoError>;
	fn create_payout(&self, request: NewPayoutRequest) -> Result<PayoutRequest, RepoError>;
	fn list_payouts(
		&self,
		user_id: Uuid,
		limit: i64,
		offset: i64,
	) -> Result<Vec<PayoutRequest>, RepoError>;
	fn list_payouts_by_status(
		&self,
		status: Option<String>,
		limit: i64,
		offset: i64,
	) -> Result<Vec<PayoutRequest>, RepoError>;
	fn find_payout(&self, id: Uuid) -> Result<Option<PayoutRequest>, RepoError>;
	/// Applies `change` only while the request is still in `from_status`.
	fn update_payout(
		&self,
		id: Uuid,
		from_status: String,
		change: PayoutStatusChange,
	) -> Result<PayoutRequest, RepoError>;
	/// Marks the request completed and debits the wallet in one transaction.
	fn complete_payout(
		&self,
		id: Uuid,
		from_status: String,
		change: PayoutStatusChange,
	) -> Result<PayoutRequest, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait ProviderRepo: Send + Sync {
	fn find_provider(&self, user_id: Uuid) -> Result<Option<ProviderProfile>, RepoError>;
	fn create_provider(&self, profile: NewProviderProfile) -> Result<ProviderProfile, RepoError>;
	fn update_provider(
		&self,
		user_id: Uuid,
		changes: ProviderProfileChanges,
	) -> Result<ProviderProfile, RepoError>;
	fn update_trust_settings(
		&self,
		user_id: Uuid,
		changes: TrustSettingsChanges,
	) -> Result<ProviderProfile, RepoError>;
	fn list_offerings(&self, provider_id: Uuid, active_only: bool) -> Result<Vec<Offering>, RepoError>;
	fn find_offering(&self, provider_id: Uuid, offering_id: Uuid) -> Result<Option<Offering>, RepoError>;
	fn create_offering(&self, offering: NewOffering) -> Result<Offering, RepoError>;
	fn update_offering(
		&self,
		provider_id: Uuid,
		offering_id: Uuid,
		changes: OfferingChanges,
	) -> Result<Offering, RepoError>;
	fn list_portfolio(&self, provider_id: Uuid) -> Result<Vec<PortfolioItem>, RepoError>;
	fn create_portfolio_item(&self, item: NewPortfolioItem) -> Result<PortfolioItem, RepoError>;
	fn delete_portfolio_item(&self, provider_id: Uuid, item_id: Uuid) -> Result<(), RepoError>;
	/// Slots ending after `ending_after` (all slots when `None`).
	fn list_availability(
		&self,
		provider_id: Uuid,
		ending_after: Option<DateTime<Utc>>,
		bookable_only: bool,
	) -> Result<Vec<AvailabilitySlot>, RepoError>;
	fn create_availability(&self, slot: NewAvailabilitySlot) -> Result<AvailabilitySlot, RepoError>;
	fn delete_availability(&self, provider_id: Uuid, slot_id: Uuid) -> Result<(), RepoError>;
	fn list_reviews(&self, provider_id: Uuid, published_only: bool) -> Result<Vec<Review>, RepoError>;
	fn badge_history(&self, provider_id: Uuid, limit: i64) -> Result<Vec<BadgeHistoryEntry>, RepoError>;
	fn provider_stats(&self, provider_id: Uuid) -> Result<ProviderStats, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait BookingRepo: Send + Sync {
	/// Inserts the booking and its `booking_requested` activity, attributed to `actor_id`.
	fn create_booking(
		&self,
		booking: NewBooking,
		actor_id: Uuid,
		metadata: Value,
	) -> Result<Booking, RepoError>;
	fn find_booking(&self, id: Uuid) -> Result<Option<Booking>, RepoError>;
	fn bookings_for_provider(
		&self,
		provider_id: Uuid,
		statuses: Vec<String>,
	) -> Result<Vec<Booking>, RepoError>;
	fn bookings_for_booker(
		&self,
		booker_id: Uuid,
		statuses: Vec<String>,
	) -> Result<Vec<Booking>, RepoError>;
	fn update_booking_status(&self, transition: BookingTransition) -> Result<Booking, RepoError>;
	/// Completes the booking, credits the provider wallet and re-tiers the provider.
	fn complete_booking(&self, transition: BookingTransition) -> Result<Booking, RepoError>;
	/// Stores the review and refreshes the provider's rating and tier.
	fn create_review(&self, review: NewReview) -> Result<Review, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
pub trait VerificationRepo: Send + Sync {
	fn latest_verification_request(
		&self,
		provider_id: Uuid,
	) -> Result<Option<VerificationRequestWithDocuments>, RepoError>;
	/// Stores request and documents and flags the profile as pending.
	fn submit_verification(
		&self,
		request: NewVerificationRequest,
		documents: Vec<DocumentUpload>,
	) -> Result<VerificationRequestWithDocuments, RepoError>;
	fn find_verification_request(&self, id: Uuid) -> Result<Option<VerificationRequest>, RepoError>;
	fn decide_verification(
		&self,
		id: Uuid,
		reviewer_id: Uuid,
		decision: Decision,
		notes: Option<String>,
	) -> Result<VerificationRequest, RepoError>;
}

pub struct PgRepo {
	pool: DbPool,
}

impl PgRepo {
	pub fn new(pool: DbPool) -> Self {
		Self { pool }
	}

	fn conn(&self) -> Result<PooledConnection<ConnectionManager<PgConnection>>, RepoError> {
		Ok(self.pool.get()?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn db_error(kind: DatabaseErrorKind) -> DieselError {
		DieselError::DatabaseError(kind, Box::new("duplicate key value".to_string()))
	}

	#[test]
	fn unique_violation_becomes_conflict() {
		let err = RepoError::unique_as_conflict(
			db_error(DatabaseErrorKind::UniqueViolation),
			"A verification request is already pending",
		);
		assert!(
			matches!(err, RepoError::Conflict(ref m) if m == "A verification request is already pending")
		);
	}

	#[test]
	fn other_database_errors_pass_through() {
		let err = RepoError::unique_as_conflict(
			db_error(DatabaseErrorKind::ForeignKeyViolation),
			"unused",
		);
		assert!(matches!(err, RepoError::Database(_)));
		let err = RepoError::unique_as_conflict(DieselError::NotFound, "unused");
		assert!(matches!(err, RepoError::Database(DieselError::NotFound)));
	}
}
