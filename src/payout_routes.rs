use crate::handler::payout::PayoutHandler;
use actix_web::web;

pub fn init(cfg: &mut web::ServiceConfig) {
	cfg.route("/api/payouts/eligibility", web::get().to(PayoutHandler::eligibility))
		.route("/api/payouts/history", web::get().to(PayoutHandler::history))
		.route("/api/payouts/request", web::post().to(PayoutHandler::request_payout));
}
