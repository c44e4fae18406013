use crate::{banking::BankDetailsForm, schema::*};
use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use diesel::{pg::Pg, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

#[derive(Serialize, Deserialize, Debug)]
pub struct ApiResponse<T> {
	pub status: String,
	pub data: Option<T>,
	pub error: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub details: Option<serde_json::Value>,
}

impl<T> ApiResponse<T> {
	pub fn success(data: T) -> Self {
		Self { status: "success".to_string(), data: Some(data), error: None, details: None }
	}

	pub fn failure(error: String, details: Option<serde_json::Value>) -> Self {
		Self { status: "error".to_string(), data: None, error: Some(error), details }
	}
}

// ---- bank accounts ----

#[derive(Queryable, Selectable, Debug, Clone)]
#[diesel(table_name = creator_bank_accounts)]
#[diesel(check_for_backend(Pg))]
pub struct BankAccount {
	pub id: Uuid,
	pub user_id: Uuid,
	pub country: String,
	pub currency: String,
	pub banking_system: String,
	pub account_holder_name: String,
	pub bank_name: String,
	pub account_type: String,
	pub account_number_encrypted: String,
	pub account_number_last4: String,
	pub routing_number_encrypted: Option<String>,
	pub stripe_account_id: Option<String>,
	pub verification_status: String,
	pub is_verified: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, AsChangeset, Debug, Clone)]
#[diesel(table_name = creator_bank_accounts)]
#[diesel(treat_none_as_null = true)]
pub struct NewBankAccount {
	pub user_id: Uuid,
	pub country: String,
	pub currency: String,
	pub banking_system: String,
	pub account_holder_name: String,
	pub bank_name: String,
	pub account_type: String,
	pub account_number_encrypted: String,
	pub account_number_last4: String,
	pub routing_number_encrypted: Option<String>,
	pub verification_status: String,
	pub is_verified: bool,
	pub updated_at: DateTime<Utc>,
}

/// What clients see of a bank account: never the stored ciphertext.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BankAccountView {
	pub id: Uuid,
	pub country: String,
	pub currency: String,
	pub banking_system: String,
	pub account_holder_name: String,
	pub bank_name: String,
	pub account_type: String,
	pub account_number_masked: String,
	pub routing_number_masked: Option<String>,
	pub stripe_account_id: Option<String>,
	pub verification_status: String,
	pub is_verified: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Debug)]
pub struct BankVerificationUpdate {
	pub verified: bool,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ConnectAccountResp {
	pub account_id: String,
	pub onboarding_url: String,
}

// ---- wallet ----

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = user_wallets)]
#[diesel(check_for_backend(Pg))]
pub struct Wallet {
	pub user_id: Uuid,
	pub currency: String,
	pub balance: BigDecimal,
	pub updated_at: DateTime<Utc>,
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = wallet_transactions)]
#[diesel(check_for_backend(Pg))]
pub struct WalletTransaction {
	pub id: Uuid,
	pub user_id: Uuid,
	pub currency: String,
	pub amount: BigDecimal,
	pub transaction_type: String,
	pub reference_id: Option<Uuid>,
	pub description: Option<String>,
	pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = wallet_transactions)]
pub struct NewWalletTransaction {
	pub user_id: Uuid,
	pub currency: String,
	pub amount: BigDecimal,
	pub transaction_type: String,
	pub reference_id: Option<Uuid>,
	pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionTotal {
	pub currency: String,
	pub transaction_type: String,
	pub total: BigDecimal,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct TransactionQuery {
	pub limit: Option<i64>,
	pub offset: Option<i64>,
	pub currency: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct PageQuery {
	pub limit: Option<i64>,
	pub offset: Option<i64>,
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = wallet_withdrawal_methods)]
#[diesel(check_for_backend(Pg))]
pub struct WithdrawalMethod {
	pub id: Uuid,
	pub user_id: Uuid,
	pub method_type: String,
	pub method_name: String,
	pub country: Option<String>,
	pub currency: Option<String>,
	pub banking_system: Option<String>,
	#[serde(skip_serializing, default)]
	pub encrypted_details: String,
	pub masked_details: String,
	pub is_default: bool,
	pub is_verified: bool,
	pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = wallet_withdrawal_methods)]
pub struct NewWithdrawalMethod {
	pub user_id: Uuid,
	pub method_type: String,
	pub method_name: String,
	pub country: Option<String>,
	pub currency: Option<String>,
	pub banking_system: Option<String>,
	pub encrypted_details: String,
	pub masked_details: String,
	pub is_default: bool,
	pub is_verified: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
pub struct CryptoAddress {
	#[validate(length(min = 10, max = 128))]
	pub address: String,
	#[validate(length(min = 2, max = 10))]
	pub currency: String,
	#[validate(length(min = 2, max = 32))]
	pub network: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
pub struct CardDetails {
	pub card_number: String,
	#[validate(length(min = 2, max = 120))]
	pub card_holder_name: String,
	pub expiry_date: String,
	/// Accepted for client compatibility, never persisted.
	#[serde(default, skip_serializing)]
	pub cvv: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
pub struct WithdrawalMethodRequest {
	pub method_type: String,
	#[validate(length(min = 1, max = 80))]
	pub method_name: String,
	/// ISO 3166-1 alpha-2.
	#[validate(length(equal = 2))]
	pub country: Option<String>,
	#[validate(length(min = 3, max = 10))]
	pub currency: Option<String>,
	pub bank_details: Option<BankDetailsForm>,
	#[validate(email)]
	pub paypal_email: Option<String>,
	#[validate(nested)]
	pub crypto_address: Option<CryptoAddress>,
	#[validate(nested)]
	pub card_details: Option<CardDetails>,
}

// ---- payouts ----

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = payout_requests)]
#[diesel(check_for_backend(Pg))]
pub struct PayoutRequest {
	pub id: Uuid,
	pub user_id: Uuid,
	pub bank_account_id: Uuid,
	pub amount: BigDecimal,
	pub currency: String,
	pub status: String,
	pub stripe_transfer_id: Option<String>,
	pub admin_notes: Option<String>,
	pub requested_at: DateTime<Utc>,
	pub processed_at: Option<DateTime<Utc>>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = payout_requests)]
pub struct NewPayoutRequest {
	pub user_id: Uuid,
	pub bank_account_id: Uuid,
	pub amount: BigDecimal,
	pub currency: String,
	pub status: String,
}

#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = payout_requests)]
pub struct PayoutStatusChange {
	pub status: String,
	pub admin_notes: Option<String>,
	pub stripe_transfer_id: Option<String>,
	pub processed_at: Option<DateTime<Utc>>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PayoutRequestBody {
	pub amount: BigDecimal,
	pub currency: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct PayoutCurrencyQuery {
	pub currency: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct AdminPayoutQuery {
	pub status: Option<String>,
	pub limit: Option<i64>,
	pub offset: Option<i64>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
pub struct PayoutStatusUpdate {
	pub status: String,
	#[validate(length(max = 1000))]
	pub notes: Option<String>,
}

// ---- service providers ----

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = service_provider_profiles)]
#[diesel(check_for_backend(Pg))]
pub struct ProviderProfile {
	pub user_id: Uuid,
	pub display_name: String,
	pub headline: Option<String>,
	pub bio: Option<String>,
	pub categories: Vec<String>,
	pub location: Option<String>,
	pub website: Option<String>,
	pub rate_currency: String,
	pub default_rate: Option<BigDecimal>,
	pub status: String,
	pub is_verified: bool,
	pub id_verified: bool,
	pub verification_status: String,
	pub verification_submitted_at: Option<DateTime<Utc>>,
	pub verified_at: Option<DateTime<Utc>>,
	pub current_badge: String,
	pub badge_updated_at: Option<DateTime<Utc>>,
	pub show_payment_protection: bool,
	pub first_booking_discount_enabled: bool,
	pub first_booking_discount_percent: BigDecimal,
	pub completed_booking_count: i32,
	pub average_rating: Option<f64>,
	pub review_count: i32,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = service_provider_profiles)]
pub struct NewProviderProfile {
	pub user_id: Uuid,
	pub display_name: String,
	pub headline: Option<String>,
	pub bio: Option<String>,
	pub categories: Vec<String>,
	pub location: Option<String>,
	pub website: Option<String>,
	pub rate_currency: String,
	pub default_rate: Option<BigDecimal>,
	pub status: String,
}

#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = service_provider_profiles)]
pub struct ProviderProfileChanges {
	pub display_name: Option<String>,
	pub headline: Option<String>,
	pub bio: Option<String>,
	pub categories: Option<Vec<String>>,
	pub location: Option<String>,
	pub website: Option<String>,
	pub rate_currency: Option<String>,
	pub default_rate: Option<BigDecimal>,
	pub status: Option<String>,
	pub updated_at: Option<DateTime<Utc>>,
}

#[derive(AsChangeset, Debug, Clone, Default, PartialEq)]
#[diesel(table_name = service_provider_profiles)]
pub struct TrustSettingsChanges {
	pub show_payment_protection: Option<bool>,
	pub first_booking_discount_enabled: Option<bool>,
	pub first_booking_discount_percent: Option<BigDecimal>,
	pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProviderRequest {
	#[validate(length(min = 1, max = 120))]
	pub display_name: String,
	#[validate(length(max = 160))]
	pub headline: Option<String>,
	#[validate(length(max = 4000))]
	pub bio: Option<String>,
	#[serde(default)]
	pub categories: Vec<String>,
	#[validate(length(max = 120))]
	pub location: Option<String>,
	#[validate(url)]
	pub website: Option<String>,
	pub rate_currency: Option<String>,
	pub default_rate: Option<BigDecimal>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProviderRequest {
	#[validate(length(max = 120))]
	pub display_name: Option<String>,
	#[validate(length(max = 160))]
	pub headline: Option<String>,
	#[validate(length(max = 4000))]
	pub bio: Option<String>,
	pub categories: Option<Vec<String>>,
	#[validate(length(max = 120))]
	pub location: Option<String>,
	#[validate(url)]
	pub website: Option<String>,
	pub rate_currency: Option<String>,
	pub default_rate: Option<BigDecimal>,
	pub status: Option<String>,
	/// Verification is granted by administrators only.
	pub is_verified: Option<bool>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct IncludeQuery {
	pub include: Option<String>,
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = service_offerings)]
#[diesel(check_for_backend(Pg))]
pub struct Offering {
	pub id: Uuid,
	pub provider_id: Uuid,
	pub title: String,
	pub description: Option<String>,
	pub category: String,
	pub rate_amount: BigDecimal,
	pub rate_currency: String,
	pub rate_unit: String,
	pub is_active: bool,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = service_offerings)]
pub struct NewOffering {
	pub provider_id: Uuid,
	pub title: String,
	pub description: Option<String>,
	pub category: String,
	pub rate_amount: BigDecimal,
	pub rate_currency: String,
	pub rate_unit: String,
	pub is_active: bool,
}

#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = service_offerings)]
pub struct OfferingChanges {
	pub title: Option<String>,
	pub description: Option<String>,
	pub category: Option<String>,
	pub rate_amount: Option<BigDecimal>,
	pub rate_currency: Option<String>,
	pub rate_unit: Option<String>,
	pub is_active: Option<bool>,
	pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OfferingRequest {
	#[validate(length(min = 1, max = 120))]
	pub title: String,
	#[validate(length(max = 2000))]
	pub description: Option<String>,
	pub category: String,
	pub rate_amount: BigDecimal,
	pub rate_currency: Option<String>,
	pub rate_unit: Option<String>,
	pub is_active: Option<bool>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OfferingUpdate {
	#[validate(length(min = 1, max = 120))]
	pub title: Option<String>,
	#[validate(length(max = 2000))]
	pub description: Option<String>,
	pub category: Option<String>,
	pub rate_amount: Option<BigDecimal>,
	pub rate_currency: Option<String>,
	pub rate_unit: Option<String>,
	pub is_active: Option<bool>,
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = service_portfolio_items)]
#[diesel(check_for_backend(Pg))]
pub struct PortfolioItem {
	pub id: Uuid,
	pub provider_id: Uuid,
	pub title: String,
	pub description: Option<String>,
	pub media_url: String,
	pub media_type: String,
	pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = service_portfolio_items)]
pub struct NewPortfolioItem {
	pub provider_id: Uuid,
	pub title: String,
	pub description: Option<String>,
	pub media_url: String,
	pub media_type: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioRequest {
	#[validate(length(min = 1, max = 120))]
	pub title: String,
	#[validate(length(max = 2000))]
	pub description: Option<String>,
	#[validate(url)]
	pub media_url: String,
	pub media_type: String,
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = service_provider_availability)]
#[diesel(check_for_backend(Pg))]
pub struct AvailabilitySlot {
	pub id: Uuid,
	pub provider_id: Uuid,
	pub start_time: DateTime<Utc>,
	pub end_time: DateTime<Utc>,
	pub is_recurring: bool,
	pub recurrence_rule: Option<String>,
	pub is_bookable: bool,
	pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = service_provider_availability)]
pub struct NewAvailabilitySlot {
	pub provider_id: Uuid,
	pub start_time: DateTime<Utc>,
	pub end_time: DateTime<Utc>,
	pub is_recurring: bool,
	pub recurrence_rule: Option<String>,
	pub is_bookable: bool,
}

#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
	pub start_time: DateTime<Utc>,
	pub end_time: DateTime<Utc>,
	#[serde(default)]
	pub is_recurring: bool,
	#[validate(length(min = 1, max = 500))]
	pub recurrence_rule: Option<String>,
	pub is_bookable: Option<bool>,
}

// ---- bookings ----

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = service_bookings)]
#[diesel(check_for_backend(Pg))]
pub struct Booking {
	pub id: Uuid,
	pub provider_id: Uuid,
	pub booker_id: Uuid,
	pub offering_id: Option<Uuid>,
	pub booking_type: String,
	pub status: String,
	pub scheduled_start: DateTime<Utc>,
	pub scheduled_end: DateTime<Utc>,
	pub currency: String,
	pub total_amount: BigDecimal,
	pub discount_amount: BigDecimal,
	pub platform_fee: BigDecimal,
	pub provider_payout: BigDecimal,
	pub booking_notes: Option<String>,
	pub status_notes: Option<String>,
	pub confirmed_at: Option<DateTime<Utc>>,
	pub paid_at: Option<DateTime<Utc>>,
	pub completed_at: Option<DateTime<Utc>>,
	pub cancelled_at: Option<DateTime<Utc>>,
	pub cancellation_reason: Option<String>,
	pub disputed_at: Option<DateTime<Utc>>,
	pub dispute_reason: Option<String>,
	pub auto_release_at: Option<DateTime<Utc>>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = service_bookings)]
pub struct NewBooking {
	pub provider_id: Uuid,
	pub booker_id: Uuid,
	pub offering_id: Option<Uuid>,
	pub booking_type: String,
	pub status: String,
	pub scheduled_start: DateTime<Utc>,
	pub scheduled_end: DateTime<Utc>,
	pub currency: String,
	pub total_amount: BigDecimal,
	pub discount_amount: BigDecimal,
	pub platform_fee: BigDecimal,
	pub provider_payout: BigDecimal,
	pub booking_notes: Option<String>,
}

#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = service_bookings)]
pub struct BookingStatusChange {
	pub status: Option<String>,
	pub status_notes: Option<String>,
	pub confirmed_at: Option<DateTime<Utc>>,
	pub paid_at: Option<DateTime<Utc>>,
	pub completed_at: Option<DateTime<Utc>>,
	pub cancelled_at: Option<DateTime<Utc>>,
	pub cancellation_reason: Option<String>,
	pub disputed_at: Option<DateTime<Utc>>,
	pub dispute_reason: Option<String>,
	pub auto_release_at: Option<DateTime<Utc>>,
	pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
	pub provider_id: Uuid,
	/// Only read when a provider books on a client's behalf.
	pub booker_id: Option<Uuid>,
	pub booking_type: String,
	pub service_offering_id: Option<Uuid>,
	pub scheduled_start: DateTime<Utc>,
	pub scheduled_end: DateTime<Utc>,
	pub total_amount: BigDecimal,
	pub currency: Option<String>,
	#[validate(length(max = 2000))]
	pub booking_notes: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
pub struct BookingStatusUpdate {
	pub status: String,
	#[validate(length(max = 2000))]
	pub notes: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct BookingListQuery {
	pub status: Option<String>,
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = service_reviews)]
#[diesel(check_for_backend(Pg))]
pub struct Review {
	pub id: Uuid,
	pub booking_id: Uuid,
	pub provider_id: Uuid,
	pub reviewer_id: Uuid,
	pub rating: i16,
	pub comment: Option<String>,
	pub is_published: bool,
	pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = service_reviews)]
pub struct NewReview {
	pub booking_id: Uuid,
	pub provider_id: Uuid,
	pub reviewer_id: Uuid,
	pub rating: i16,
	pub comment: Option<String>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
pub struct ReviewRequest {
	#[validate(range(min = 1, max = 5))]
	pub rating: i16,
	#[validate(length(max = 2000))]
	pub comment: Option<String>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = booking_activity)]
pub struct NewBookingActivity {
	pub booking_id: Uuid,
	pub actor_id: Uuid,
	pub action: String,
	pub metadata: serde_json::Value,
}

// ---- badges ----

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = provider_badge_history)]
#[diesel(check_for_backend(Pg))]
pub struct BadgeHistoryEntry {
	pub id: Uuid,
	pub provider_id: Uuid,
	pub previous_badge: Option<String>,
	pub new_badge: String,
	pub reason: String,
	pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = provider_badge_history)]
pub struct NewBadgeHistoryEntry {
	pub provider_id: Uuid,
	pub previous_badge: Option<String>,
	pub new_badge: String,
	pub reason: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TrustSettingsRequest {
	pub show_payment_protection: Option<bool>,
	pub first_booking_discount_enabled: Option<bool>,
	pub first_booking_discount_percent: Option<BigDecimal>,
}

// ---- verification ----

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = service_provider_verification_requests)]
#[diesel(check_for_backend(Pg))]
pub struct VerificationRequest {
	pub id: Uuid,
	pub provider_id: Uuid,
	pub status: String,
	pub notes: Option<String>,
	pub reviewer_id: Option<Uuid>,
	pub reviewer_notes: Option<String>,
	pub automated_checks: serde_json::Value,
	pub submitted_at: DateTime<Utc>,
	pub reviewed_at: Option<DateTime<Utc>>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = service_provider_verification_requests)]
pub struct NewVerificationRequest {
	pub provider_id: Uuid,
	pub status: String,
	pub notes: Option<String>,
	pub automated_checks: serde_json::Value,
}

#[derive(Queryable, Selectable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = service_provider_verification_documents)]
#[diesel(check_for_backend(Pg))]
pub struct VerificationDocument {
	pub id: Uuid,
	pub request_id: Uuid,
	pub doc_type: String,
	pub storage_path: String,
	pub created_at: DateTime<Utc>,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = service_provider_verification_documents)]
pub struct NewVerificationDocument {
	pub request_id: Uuid,
	pub doc_type: String,
	pub storage_path: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DocumentUpload {
	pub doc_type: String,
	#[validate(length(min = 1, max = 500))]
	pub storage_path: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
pub struct VerificationSubmission {
	#[validate(length(max = 2000))]
	pub notes: Option<String>,
	#[serde(default)]
	#[validate(nested)]
	pub documents: Vec<DocumentUpload>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Validate)]
pub struct VerificationDecisionRequest {
	pub decision: String,
	#[validate(length(max = 2000))]
	pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct VerificationRequestWithDocuments {
	#[serde(flatten)]
	pub request: VerificationRequest,
	pub documents: Vec<VerificationDocument>,
}
