use crate::handler::{
	badge::BadgeHandler, booking::BookingHandler, provider::ProviderHandler,
	verification::VerificationHandler,
};
use actix_web::web;

pub fn init(cfg: &mut web::ServiceConfig) {
	cfg.service(
		web::scope("/api/service-providers")
			.route("", web::post().to(ProviderHandler::create_profile))
			.route("/{user_id}", web::get().to(ProviderHandler::get_profile))
			.route("/{user_id}", web::patch().to(ProviderHandler::update_profile))
			// offerings
			.route("/{user_id}/offerings", web::get().to(ProviderHandler::list_offerings))
			.route("/{user_id}/offerings", web::post().to(ProviderHandler::create_offering))
			.route(
				"/{user_id}/offerings/{offering_id}",
				web::patch().to(ProviderHandler::update_offering),
			)
			// portfolio
			.route("/{user_id}/portfolio", web::get().to(ProviderHandler::list_portfolio))
			.route("/{user_id}/portfolio", web::post().to(ProviderHandler::create_portfolio_item))
			.route(
				"/{user_id}/portfolio/{item_id}",
				web::delete().to(ProviderHandler::delete_portfolio_item),
			)
			// availability
			.route("/{user_id}/availability", web::get().to(ProviderHandler::list_availability))
			.route("/{user_id}/availability", web::post().to(ProviderHandler::create_availability))
			.route(
				"/{user_id}/availability/{slot_id}",
				web::delete().to(ProviderHandler::delete_availability),
			)
			.route("/{user_id}/bookings", web::get().to(BookingHandler::provider_bookings))
			.route("/{user_id}/bookings", web::post().to(BookingHandler::create_provider_booking))
			// badges & trust settings
			.route("/{user_id}/badges", web::get().to(BadgeHandler::get_insights))
			.route("/{user_id}/badges", web::patch().to(BadgeHandler::update_trust_settings))
			// verification
			.route("/{user_id}/verification", web::get().to(VerificationHandler::get_status))
			.route(
				"/{user_id}/verification/request",
				web::post().to(VerificationHandler::submit_request),
			),
	);
}
