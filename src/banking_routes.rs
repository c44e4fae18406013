use crate::handler::bank_account::BankAccountHandler;
use actix_web::web;

pub fn init(cfg: &mut web::ServiceConfig) {
	cfg
		// country banking table
		.route("/api/banking/countries", web::get().to(BankAccountHandler::list_countries))
		.route("/api/banking/countries/{code}", web::get().to(BankAccountHandler::get_country))
		.route("/api/banking/validate", web::post().to(BankAccountHandler::validate_details))
		// creator bank account
		.route("/api/bank-account", web::get().to(BankAccountHandler::get_bank_account))
		.route("/api/bank-account", web::post().to(BankAccountHandler::save_bank_account))
		.route(
			"/api/stripe/connect/create-account",
			web::post().to(BankAccountHandler::create_connect_account),
		);
}
