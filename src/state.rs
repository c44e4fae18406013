use crate::{
	crypto::FieldEncryptor,
	error::ApiError,
	gateway::PaymentGateway,
	midware::jwt::AuthConfig,
	repo::{BankAccountRepo, BookingRepo, PayoutRepo, ProviderRepo, VerificationRepo, WalletRepo},
};
use actix_web::web;
use std::sync::Arc;

/// Everything handlers pull out of app data.
#[derive(Clone)]
pub struct AppState {
	pub bank_accounts: Arc<dyn BankAccountRepo>,
	pub wallets: Arc<dyn WalletRepo>,
	pub payouts: Arc<dyn PayoutRepo>,
	pub providers: Arc<dyn ProviderRepo>,
	pub bookings: Arc<dyn BookingRepo>,
	pub verification: Arc<dyn VerificationRepo>,
	pub gateway: Arc<dyn PaymentGateway>,
	pub encryptor: FieldEncryptor,
	pub auth: AuthConfig,
}

impl AppState {
	pub fn install(&self, cfg: &mut web::ServiceConfig) {
		cfg.app_data(web::Data::from(self.bank_accounts.clone()))
			.app_data(web::Data::from(self.wallets.clone()))
			.app_data(web::Data::from(self.payouts.clone()))
			.app_data(web::Data::from(self.providers.clone()))
			.app_data(web::Data::from(self.bookings.clone()))
			.app_data(web::Data::from(self.verification.clone()))
			.app_data(web::Data::from(self.gateway.clone()))
			.app_data(web::Data::new(self.encryptor.clone()))
			.app_data(web::Data::new(self.auth.clone()))
			.app_data(web::JsonConfig::default().error_handler(|err, _| {
				log::error!("Rejected request body: {}", err);
				ApiError::bad_request(format!("Invalid request body: {err}")).into()
			}))
			.app_data(web::QueryConfig::default().error_handler(|err, _| {
				ApiError::bad_request(format!("Invalid query string: {err}")).into()
			}))
			.app_data(web::PathConfig::default().error_handler(|err, _| {
				ApiError::bad_request(format!("Invalid path parameter: {err}")).into()
			}));
	}
}
