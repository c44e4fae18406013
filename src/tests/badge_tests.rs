use crate::{
	models::{BadgeHistoryEntry, ProviderProfile},
	tests::{
		fixtures::{dec, TestFixtures},
		test_utils::{bearer, test_app, MockState},
	},
};
use actix_web::{http::StatusCode, test};
use chrono::Utc;
use mockall::predicate::eq;
use serde_json::{json, Value};
use uuid::Uuid;

#[actix_web::test]
async fn test_insights_show_progress_and_history() {
	let provider_id = Uuid::new_v4();
	let mut mocks = MockState::new();
	mocks.providers.expect_find_provider().returning(|id| {
		Ok(Some(ProviderProfile {
			current_badge: "rising_star".to_string(),
			completed_booking_count: 4,
			average_rating: Some(4.7),
			review_count: 4,
			..TestFixtures::provider_profile(id)
		}))
	});
	mocks.providers.expect_badge_history().with(eq(provider_id), eq(5)).returning(|id, _| {
		Ok(vec![BadgeHistoryEntry {
			id: Uuid::new_v4(),
			provider_id: id,
			previous_badge: Some("new_provider".to_string()),
			new_badge: "rising_star".to_string(),
			reason: "Booking completed (3 completed bookings, rating 4.70)".to_string(),
			created_at: Utc::now(),
		}])
	});
	let app = test_app!(mocks);

	let resp = test::TestRequest::get()
		.uri(&format!("/api/service-providers/{provider_id}/badges"))
		.insert_header(bearer(provider_id))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::OK);
	let body: Value = test::read_body_json(resp).await;
	let data = &body["data"];
	assert_eq!(data["badgeTier"], "rising_star");
	assert_eq!(data["nextBadge"]["tier"], "established");
	assert_eq!(data["nextBadge"]["remainingBookings"], 6);
	assert_eq!(data["firstBookingDiscountEligible"], false);
	assert_eq!(data["history"][0]["newTier"], "rising_star");
}

#[actix_web::test]
async fn test_insights_are_owner_only() {
	let app = test_app!(MockState::new());
	let resp = test::TestRequest::get()
		.uri(&format!("/api/service-providers/{}/badges", Uuid::new_v4()))
		.insert_header(bearer(Uuid::new_v4()))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_discount_locked_after_first_completed_booking() {
	let provider_id = Uuid::new_v4();
	let mut mocks = MockState::new();
	mocks.providers.expect_find_provider().returning(|id| {
		Ok(Some(ProviderProfile { completed_booking_count: 1, ..TestFixtures::provider_profile(id) }))
	});
	let app = test_app!(mocks);

	let resp = test::TestRequest::patch()
		.uri(&format!("/api/service-providers/{provider_id}/badges"))
		.insert_header(bearer(provider_id))
		.set_json(json!({ "firstBookingDiscountEnabled": true }))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	let body: Value = test::read_body_json(resp).await;
	assert_eq!(
		body["error"],
		"First booking discount can only be enabled before your first completed booking."
	);
}

#[actix_web::test]
async fn test_trust_settings_update_returns_insights() {
	let provider_id = Uuid::new_v4();
	let mut mocks = MockState::new();
	mocks
		.providers
		.expect_find_provider()
		.returning(|id| Ok(Some(TestFixtures::provider_profile(id))));
	mocks
		.providers
		.expect_update_trust_settings()
		.withf(move |id, c| {
			*id == provider_id
				&& c.first_booking_discount_enabled == Some(true)
				&& c.first_booking_discount_percent == Some(dec("12.5"))
				&& c.show_payment_protection.is_none()
		})
		.times(1)
		.returning(|id, c| {
			Ok(ProviderProfile {
				first_booking_discount_enabled: true,
				first_booking_discount_percent: c.first_booking_discount_percent.unwrap_or_default(),
				..TestFixtures::provider_profile(id)
			})
		});
	mocks.providers.expect_badge_history().returning(|_, _| Ok(vec![]));
	let app = test_app!(mocks);

	let resp = test::TestRequest::patch()
		.uri(&format!("/api/service-providers/{provider_id}/badges"))
		.insert_header(bearer(provider_id))
		.set_json(json!({
			"firstBookingDiscountEnabled": true,
			"firstBookingDiscountPercent": 12.5
		}))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::OK);
	let body: Value = test::read_body_json(resp).await;
	assert_eq!(body["data"]["firstBookingDiscountPercent"], 12.5);
	assert_eq!(body["data"]["firstBookingDiscountEligible"], true);
}
