use crate::handler::admin::AdminHandler;
use actix_web::web;

pub fn init(cfg: &mut web::ServiceConfig) {
	cfg.service(
		web::scope("/api/admin")
			.route(
				"/bank-accounts/{user_id}/verification",
				web::patch().to(AdminHandler::verify_bank_account),
			)
			.route("/payouts", web::get().to(AdminHandler::list_payouts))
			.route("/payouts/{id}", web::patch().to(AdminHandler::update_payout))
			.route("/verification/{id}", web::get().to(AdminHandler::get_verification))
			.route("/verification/{id}", web::patch().to(AdminHandler::decide_verification)),
	);
}
