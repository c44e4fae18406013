use crate::{
	crypto::FieldEncryptor,
	gateway::MockPaymentGateway,
	midware::jwt::{AuthConfig, JWT},
	repo::{
		MockBankAccountRepo, MockBookingRepo, MockPayoutRepo, MockProviderRepo,
		MockVerificationRepo, MockWalletRepo,
	},
	state::AppState,
};
use std::sync::Arc;
use uuid::Uuid;

pub const TEST_SECRET: &str = "test_secret";

pub fn generate_test_token(user_id: Uuid) -> String {
	JWT::new(TEST_SECRET).create_jwt(user_id, 1).unwrap()
}

pub fn bearer(user_id: Uuid) -> (&'static str, String) {
	("Authorization", format!("Bearer {}", generate_test_token(user_id)))
}

/// Mocks for every seam; set expectations on the fields, then build the state.
#[derive(Default)]
pub struct MockState {
	pub bank_accounts: MockBankAccountRepo,
	pub wallets: MockWalletRepo,
	pub payouts: MockPayoutRepo,
	pub providers: MockProviderRepo,
	pub bookings: MockBookingRepo,
	pub verification: MockVerificationRepo,
	pub gateway: MockPaymentGateway,
	pub admin_ids: Vec<Uuid>,
}

impl MockState {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn into_state(self) -> AppState {
		AppState {
			bank_accounts: Arc::new(self.bank_accounts),
			wallets: Arc::new(self.wallets),
			payouts: Arc::new(self.payouts),
			providers: Arc::new(self.providers),
			bookings: Arc::new(self.bookings),
			verification: Arc::new(self.verification),
			gateway: Arc::new(self.gateway),
			encryptor: FieldEncryptor::passthrough(),
			auth: AuthConfig { jwt_secret: TEST_SECRET.to_string(), admin_ids: self.admin_ids },
		}
	}
}

/// Initializes the full route table over a `MockState`.
macro_rules! test_app {
	($mocks:expr) => {{
		let state = $mocks.into_state();
		actix_web::test::init_service(
			actix_web::App::new()
				.configure(|cfg| state.install(cfg))
				.configure(crate::banking_routes::init)
				.configure(crate::wallet_routes::init)
				.configure(crate::payout_routes::init)
				.configure(crate::provider_routes::init)
				.configure(crate::booking_routes::init)
				.configure(crate::admin_routes::init),
		)
		.await
	}};
}

pub(crate) use test_app;
