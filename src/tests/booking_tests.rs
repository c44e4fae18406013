use crate::{
	models::{Booking, ProviderProfile},
	tests::{
		fixtures::{dec, TestFixtures},
		test_utils::{bearer, test_app, MockState},
	},
};
use actix_web::{http::StatusCode, test};
use chrono::{Duration, DurationRound, Utc};
use mockall::predicate::eq;
use serde_json::{json, Value};
use uuid::Uuid;

fn booking_body(provider_id: Uuid, start: chrono::DateTime<Utc>, hours: i64) -> Value {
	json!({
		"providerId": provider_id,
		"bookingType": "service",
		"scheduledStart": start,
		"scheduledEnd": start + Duration::hours(hours),
		"totalAmount": "200",
	})
}

/// Provider with one open slot tomorrow from 09:00 to 17:00.
fn bookable(provider_id: Uuid, profile: ProviderProfile) -> (MockState, chrono::DateTime<Utc>) {
	let day = (Utc::now() + Duration::days(1)).duration_trunc(Duration::days(1)).unwrap();
	let open = day + Duration::hours(9);
	let mut mocks = MockState::new();
	mocks
		.providers
		.expect_find_provider()
		.with(eq(provider_id))
		.returning(move |_| Ok(Some(profile.clone())));
	mocks
		.providers
		.expect_list_availability()
		.with(eq(provider_id), eq(None), eq(true))
		.returning(move |id, _, _| Ok(vec![TestFixtures::slot(id, open, open + Duration::hours(8))]));
	(mocks, open)
}

#[actix_web::test]
async fn test_rejects_unknown_booking_type() {
	let app = test_app!(MockState::new());
	let resp = test::TestRequest::post()
		.uri("/api/bookings")
		.insert_header(bearer(Uuid::new_v4()))
		.set_json(json!({
			"providerId": Uuid::new_v4(),
			"bookingType": "concert",
			"scheduledStart": Utc::now(),
			"scheduledEnd": Utc::now() + Duration::hours(1),
			"totalAmount": "50",
		}))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	let body: Value = test::read_body_json(resp).await;
	assert_eq!(body["error"], "bookingType must be either \"service\" or \"venue\"");
}

#[actix_web::test]
async fn test_inactive_provider_is_not_bookable() {
	let provider_id = Uuid::new_v4();
	let profile =
		ProviderProfile { status: "draft".to_string(), ..TestFixtures::provider_profile(provider_id) };
	let (mut mocks, open) = bookable(provider_id, profile);
	mocks.bookings.expect_bookings_for_provider().returning(|_, _| Ok(vec![]));
	let app = test_app!(mocks);

	let resp = test::TestRequest::post()
		.uri("/api/bookings")
		.insert_header(bearer(Uuid::new_v4()))
		.set_json(booking_body(provider_id, open, 2))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::CONFLICT);
	let body: Value = test::read_body_json(resp).await;
	assert_eq!(body["error"], "This provider is not currently accepting bookings.");
}

#[actix_web::test]
async fn test_request_outside_availability_conflicts() {
	let provider_id = Uuid::new_v4();
	let (mut mocks, open) = bookable(provider_id, TestFixtures::provider_profile(provider_id));
	mocks.bookings.expect_bookings_for_provider().returning(|_, _| Ok(vec![]));
	let app = test_app!(mocks);

	let resp = test::TestRequest::post()
		.uri("/api/bookings")
		.insert_header(bearer(Uuid::new_v4()))
		.set_json(booking_body(provider_id, open + Duration::hours(7), 2))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::CONFLICT);
	let body: Value = test::read_body_json(resp).await;
	assert_eq!(
		body["error"],
		"This provider has no availability covering the requested time. Try another slot."
	);
}

#[actix_web::test]
async fn test_overlapping_booking_conflicts() {
	let provider_id = Uuid::new_v4();
	let (mut mocks, open) = bookable(provider_id, TestFixtures::provider_profile(provider_id));
	mocks.bookings.expect_bookings_for_provider().returning(move |id, _| {
		Ok(vec![Booking {
			scheduled_start: open + Duration::hours(1),
			scheduled_end: open + Duration::hours(3),
			..TestFixtures::booking(id, Uuid::new_v4(), "paid")
		}])
	});
	let app = test_app!(mocks);

	let resp = test::TestRequest::post()
		.uri("/api/bookings")
		.insert_header(bearer(Uuid::new_v4()))
		.set_json(booking_body(provider_id, open, 2))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::CONFLICT);
	let body: Value = test::read_body_json(resp).await;
	assert_eq!(
		body["error"],
		"The provider already has a booking that overlaps with this time. Please choose another slot."
	);
}

#[actix_web::test]
async fn test_first_booking_discount_and_fee() {
	let provider_id = Uuid::new_v4();
	let booker_id = Uuid::new_v4();
	let profile = ProviderProfile {
		first_booking_discount_enabled: true,
		first_booking_discount_percent: dec("10"),
		..TestFixtures::provider_profile(provider_id)
	};
	let (mut mocks, open) = bookable(provider_id, profile);
	mocks.bookings.expect_bookings_for_provider().returning(|_, _| Ok(vec![]));
	mocks
		.bookings
		.expect_create_booking()
		.withf(move |b, actor, meta| {
			b.booker_id == booker_id
				&& *actor == booker_id
				&& b.status == "pending"
				&& b.currency == "USD"
				&& b.discount_amount == dec("20.00")
				&& b.total_amount == dec("180.00")
				&& b.platform_fee == dec("21.60")
				&& b.provider_payout == dec("158.40")
				&& meta["bookingType"] == "service"
				&& meta["requestedBy"] == "booker"
		})
		.times(1)
		.returning(|b, _, _| {
			Ok(Booking {
				total_amount: b.total_amount,
				provider_payout: b.provider_payout,
				..TestFixtures::booking(b.provider_id, b.booker_id, "pending")
			})
		});
	let app = test_app!(mocks);

	let resp = test::TestRequest::post()
		.uri("/api/bookings")
		.insert_header(bearer(booker_id))
		.set_json(booking_body(provider_id, open, 2))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::CREATED);
	let body: Value = test::read_body_json(resp).await;
	assert_eq!(body["data"]["status"], "pending");
}

#[actix_web::test]
async fn test_offering_currency_is_used() {
	let provider_id = Uuid::new_v4();
	let offering = TestFixtures::offering(provider_id);
	let offering_id = offering.id;
	let (mut mocks, open) = bookable(provider_id, TestFixtures::provider_profile(provider_id));
	mocks
		.providers
		.expect_find_offering()
		.with(eq(provider_id), eq(offering_id))
		.returning(move |_, _| Ok(Some(offering.clone())));
	mocks.bookings.expect_bookings_for_provider().returning(|_, _| Ok(vec![]));
	mocks
		.bookings
		.expect_create_booking()
		.withf(move |b, _, _| b.currency == "EUR" && b.offering_id == Some(offering_id))
		.times(1)
		.returning(|b, _, _| Ok(TestFixtures::booking(b.provider_id, b.booker_id, "pending")));
	let app = test_app!(mocks);

	let mut body = booking_body(provider_id, open, 1);
	body["serviceOfferingId"] = json!(offering_id);
	let resp = test::TestRequest::post()
		.uri("/api/bookings")
		.insert_header(bearer(Uuid::new_v4()))
		.set_json(body)
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::CREATED);
}

#[actix_web::test]
async fn test_amount_that_rounds_to_zero_is_rejected() {
	let app = test_app!(MockState::new());
	let mut body = booking_body(Uuid::new_v4(), Utc::now() + Duration::days(1), 1);
	body["totalAmount"] = json!(0.004);
	let resp = test::TestRequest::post()
		.uri("/api/bookings")
		.insert_header(bearer(Uuid::new_v4()))
		.set_json(body)
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	let body: Value = test::read_body_json(resp).await;
	assert_eq!(body["error"], "totalAmount must be greater than zero");
}

#[actix_web::test]
async fn test_numeric_total_is_kept_to_cents() {
	let provider_id = Uuid::new_v4();
	let (mut mocks, open) = bookable(provider_id, TestFixtures::provider_profile(provider_id));
	mocks.bookings.expect_bookings_for_provider().returning(|_, _| Ok(vec![]));
	mocks
		.bookings
		.expect_create_booking()
		.withf(|b, _, meta| {
			b.total_amount == dec("200.10")
				&& b.platform_fee == dec("24.01")
				&& b.provider_payout == dec("176.09")
				&& meta["requestedAmount"] == "200.10"
		})
		.times(1)
		.returning(|b, _, _| Ok(TestFixtures::booking(b.provider_id, b.booker_id, "pending")));
	let app = test_app!(mocks);

	let mut body = booking_body(provider_id, open, 1);
	body["totalAmount"] = json!(200.1);
	let resp = test::TestRequest::post()
		.uri("/api/bookings")
		.insert_header(bearer(Uuid::new_v4()))
		.set_json(body)
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::CREATED);
}

#[actix_web::test]
async fn test_provider_books_for_client() {
	let provider_id = Uuid::new_v4();
	let client_id = Uuid::new_v4();
	let (mut mocks, open) = bookable(provider_id, TestFixtures::provider_profile(provider_id));
	mocks.bookings.expect_bookings_for_provider().returning(|_, _| Ok(vec![]));
	mocks
		.bookings
		.expect_create_booking()
		.withf(move |b, actor, meta| {
			b.booker_id == client_id
				&& b.provider_id == provider_id
				&& *actor == provider_id
				&& meta["requestedBy"] == "provider"
		})
		.times(1)
		.returning(|b, _, _| Ok(TestFixtures::booking(b.provider_id, b.booker_id, "pending")));
	let app = test_app!(mocks);

	let mut body = booking_body(provider_id, open, 2);
	body["bookerId"] = json!(client_id);
	let resp = test::TestRequest::post()
		.uri(&format!("/api/service-providers/{provider_id}/bookings"))
		.insert_header(bearer(provider_id))
		.set_json(body)
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::CREATED);
	let body: Value = test::read_body_json(resp).await;
	assert_eq!(body["data"]["booker_id"], json!(client_id));
}

#[actix_web::test]
async fn test_provider_booking_checks_path_and_owner() {
	let provider_id = Uuid::new_v4();
	let app = test_app!(MockState::new());
	let mut body = booking_body(Uuid::new_v4(), Utc::now() + Duration::days(1), 1);
	body["bookerId"] = json!(Uuid::new_v4());

	let resp = test::TestRequest::post()
		.uri(&format!("/api/service-providers/{provider_id}/bookings"))
		.insert_header(bearer(provider_id))
		.set_json(body.clone())
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	let json: Value = test::read_body_json(resp).await;
	assert_eq!(json["error"], "Provider ID mismatch with URL parameter");

	let resp = test::TestRequest::post()
		.uri(&format!("/api/service-providers/{provider_id}/bookings"))
		.insert_header(bearer(Uuid::new_v4()))
		.set_json(body)
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_dispute_stores_reason() {
	let provider_id = Uuid::new_v4();
	let booker_id = Uuid::new_v4();
	let booking = TestFixtures::booking(provider_id, booker_id, "paid");
	let booking_id = booking.id;
	let mut mocks = MockState::new();
	let found = booking.clone();
	mocks.bookings.expect_find_booking().returning(move |_| Ok(Some(found.clone())));
	mocks
		.providers
		.expect_find_provider()
		.returning(|id| Ok(Some(TestFixtures::provider_profile(id))));
	mocks
		.bookings
		.expect_update_booking_status()
		.withf(|t| {
			t.change.status.as_deref() == Some("disputed")
				&& t.change.disputed_at.is_some()
				&& t.change.dispute_reason.as_deref() == Some("Session never happened")
				&& t.metadata["disputeReason"] == "Session never happened"
		})
		.times(1)
		.returning(move |t| {
			Ok(Booking {
				status: "disputed".to_string(),
				disputed_at: t.change.disputed_at,
				dispute_reason: t.change.dispute_reason.clone(),
				..booking.clone()
			})
		});
	let app = test_app!(mocks);

	let resp = test::TestRequest::patch()
		.uri(&format!("/api/bookings/{booking_id}"))
		.insert_header(bearer(booker_id))
		.set_json(json!({ "status": "disputed", "notes": "Session never happened" }))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::OK);
	let body: Value = test::read_body_json(resp).await;
	assert_eq!(body["data"]["dispute_reason"], "Session never happened");
}

#[actix_web::test]
async fn test_cancellation_stores_reason() {
	let provider_id = Uuid::new_v4();
	let booker_id = Uuid::new_v4();
	let booking = TestFixtures::booking(provider_id, booker_id, "pending");
	let booking_id = booking.id;
	let mut mocks = MockState::new();
	let found = booking.clone();
	mocks.bookings.expect_find_booking().returning(move |_| Ok(Some(found.clone())));
	mocks
		.providers
		.expect_find_provider()
		.returning(|id| Ok(Some(TestFixtures::provider_profile(id))));
	mocks
		.bookings
		.expect_update_booking_status()
		.withf(move |t| {
			t.actor_id == provider_id
				&& t.change.cancelled_at.is_some()
				&& t.change.cancellation_reason.as_deref() == Some("Provider is ill")
				&& t.metadata["cancellationReason"] == "Provider is ill"
				&& t.metadata["actorRole"] == "provider"
		})
		.times(1)
		.returning(move |t| {
			Ok(Booking {
				status: "cancelled".to_string(),
				cancellation_reason: t.change.cancellation_reason.clone(),
				..booking.clone()
			})
		});
	let app = test_app!(mocks);

	let resp = test::TestRequest::patch()
		.uri(&format!("/api/bookings/{booking_id}"))
		.insert_header(bearer(provider_id))
		.set_json(json!({ "status": "cancelled", "notes": "Provider is ill" }))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::OK);
	let body: Value = test::read_body_json(resp).await;
	assert_eq!(body["data"]["cancellation_reason"], "Provider is ill");
}

#[actix_web::test]
async fn test_status_update_by_stranger_is_forbidden() {
	let booking = TestFixtures::booking(Uuid::new_v4(), Uuid::new_v4(), "pending");
	let booking_id = booking.id;
	let mut mocks = MockState::new();
	mocks.bookings.expect_find_booking().returning(move |_| Ok(Some(booking.clone())));
	let app = test_app!(mocks);

	let resp = test::TestRequest::patch()
		.uri(&format!("/api/bookings/{booking_id}"))
		.insert_header(bearer(Uuid::new_v4()))
		.set_json(json!({ "status": "cancelled" }))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_final_booking_cannot_change() {
	let provider_id = Uuid::new_v4();
	let booking = TestFixtures::booking(provider_id, Uuid::new_v4(), "cancelled");
	let booking_id = booking.id;
	let mut mocks = MockState::new();
	mocks.bookings.expect_find_booking().returning(move |_| Ok(Some(booking.clone())));
	let app = test_app!(mocks);

	let resp = test::TestRequest::patch()
		.uri(&format!("/api/bookings/{booking_id}"))
		.insert_header(bearer(provider_id))
		.set_json(json!({ "status": "pending" }))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_paid_booking_gets_release_date() {
	let provider_id = Uuid::new_v4();
	let booker_id = Uuid::new_v4();
	let booking = TestFixtures::booking(provider_id, booker_id, "confirmed_awaiting_payment");
	let booking_id = booking.id;
	let expected_release = booking.scheduled_end + Duration::days(7);
	let mut mocks = MockState::new();
	let found = booking.clone();
	mocks.bookings.expect_find_booking().returning(move |_| Ok(Some(found.clone())));
	mocks.providers.expect_find_provider().returning(|id| {
		Ok(Some(ProviderProfile {
			completed_booking_count: 3,
			..TestFixtures::provider_profile(id)
		}))
	});
	mocks
		.bookings
		.expect_update_booking_status()
		.withf(move |t| {
			t.actor_id == booker_id
				&& t.from_status == "confirmed_awaiting_payment"
				&& t.change.status.as_deref() == Some("paid")
				&& t.change.auto_release_at == Some(expected_release)
				&& t.metadata["actorRole"] == "booker"
				&& t.metadata["holdDays"] == 7
		})
		.times(1)
		.returning(move |t| {
			Ok(Booking {
				status: "paid".to_string(),
				auto_release_at: t.change.auto_release_at,
				..booking.clone()
			})
		});
	let app = test_app!(mocks);

	let resp = test::TestRequest::patch()
		.uri(&format!("/api/bookings/{booking_id}"))
		.insert_header(bearer(booker_id))
		.set_json(json!({ "status": "paid" }))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::OK);
	let body: Value = test::read_body_json(resp).await;
	assert_eq!(body["data"]["status"], "paid");
}

#[actix_web::test]
async fn test_completion_credits_provider() {
	let provider_id = Uuid::new_v4();
	let booking = TestFixtures::booking(provider_id, Uuid::new_v4(), "paid");
	let booking_id = booking.id;
	let mut mocks = MockState::new();
	let found = booking.clone();
	mocks.bookings.expect_find_booking().returning(move |_| Ok(Some(found.clone())));
	mocks
		.providers
		.expect_find_provider()
		.returning(|id| Ok(Some(TestFixtures::provider_profile(id))));
	mocks
		.bookings
		.expect_complete_booking()
		.withf(|t| t.change.status.as_deref() == Some("completed") && t.change.completed_at.is_some())
		.times(1)
		.returning(move |_| Ok(Booking { status: "completed".to_string(), ..booking.clone() }));
	let app = test_app!(mocks);

	let resp = test::TestRequest::patch()
		.uri(&format!("/api/bookings/{booking_id}"))
		.insert_header(bearer(provider_id))
		.set_json(json!({ "status": "completed", "notes": "Delivered stems" }))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_only_completed_bookings_can_be_reviewed() {
	let booker_id = Uuid::new_v4();
	let booking = TestFixtures::booking(Uuid::new_v4(), booker_id, "paid");
	let booking_id = booking.id;
	let mut mocks = MockState::new();
	mocks.bookings.expect_find_booking().returning(move |_| Ok(Some(booking.clone())));
	let app = test_app!(mocks);

	let resp = test::TestRequest::post()
		.uri(&format!("/api/bookings/{booking_id}/review"))
		.insert_header(bearer(booker_id))
		.set_json(json!({ "rating": 5 }))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	let body: Value = test::read_body_json(resp).await;
	assert_eq!(body["error"], "Only completed bookings can be reviewed");
}

#[actix_web::test]
async fn test_review_rating_range_is_validated() {
	let app = test_app!(MockState::new());
	let resp = test::TestRequest::post()
		.uri(&format!("/api/bookings/{}/review", Uuid::new_v4()))
		.insert_header(bearer(Uuid::new_v4()))
		.set_json(json!({ "rating": 6 }))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	let body: Value = test::read_body_json(resp).await;
	assert_eq!(body["error"], "Validation failed");
}
