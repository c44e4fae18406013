use crate::handler::booking::BookingHandler;
use actix_web::web;

pub fn init(cfg: &mut web::ServiceConfig) {
	cfg.route("/api/bookings", web::post().to(BookingHandler::create_booking))
		.route("/api/bookings", web::get().to(BookingHandler::list_my_bookings))
		.route("/api/bookings/{id}", web::patch().to(BookingHandler::update_status))
		.route("/api/bookings/{id}/review", web::post().to(BookingHandler::create_review));
}
