use crate::handler::wallet::WalletHandler;
use actix_web::web;

pub fn init(cfg: &mut web::ServiceConfig) {
	cfg.route("/api/wallet", web::get().to(WalletHandler::get_wallets))
		.route("/api/wallet/transactions", web::get().to(WalletHandler::list_transactions))
		.route(
			"/api/wallet/withdrawal-methods",
			web::get().to(WalletHandler::list_withdrawal_methods),
		)
		.route(
			"/api/wallet/withdrawal-methods",
			web::post().to(WalletHandler::add_withdrawal_method),
		)
		.route(
			"/api/wallet/withdrawal-methods/{id}/default",
			web::post().to(WalletHandler::set_default_method),
		)
		.route("/api/creator/revenue/summary", web::get().to(WalletHandler::revenue_summary));
}
