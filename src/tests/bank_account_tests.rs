use crate::{
	gateway::GatewayError,
	models::BankAccount,
	tests::{
		fixtures::TestFixtures,
		test_utils::{bearer, test_app, MockState},
	},
};
use actix_web::{http::StatusCode, test};
use chrono::Utc;
use mockall::predicate::eq;
use serde_json::{json, Value};
use uuid::Uuid;

#[actix_web::test]
async fn test_bank_account_requires_token() {
	let app = test_app!(MockState::new());
	let resp = test::TestRequest::get().uri("/api/bank-account").send_request(&app).await;
	assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
	let body: Value = test::read_body_json(resp).await;
	assert_eq!(body["status"], "error");
	assert_eq!(body["error"], "Missing or invalid token");
}

#[actix_web::test]
async fn test_get_bank_account_masks_numbers() {
	let user_id = Uuid::new_v4();
	let mut mocks = MockState::new();
	mocks
		.bank_accounts
		.expect_find_bank_account()
		.with(eq(user_id))
		.returning(move |id| Ok(Some(TestFixtures::bank_account(id))));
	let app = test_app!(mocks);

	let resp = test::TestRequest::get()
		.uri("/api/bank-account")
		.insert_header(bearer(user_id))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::OK);
	let body: Value = test::read_body_json(resp).await;
	assert_eq!(body["data"]["account_number_masked"], "••••6789");
	assert_eq!(body["data"]["routing_number_masked"], "••••0021");
	assert!(body["data"].get("account_number_encrypted").is_none());
}

#[actix_web::test]
async fn test_get_bank_account_returns_null_when_missing() {
	let user_id = Uuid::new_v4();
	let mut mocks = MockState::new();
	mocks.bank_accounts.expect_find_bank_account().returning(|_| Ok(None));
	let app = test_app!(mocks);

	let resp = test::TestRequest::get()
		.uri("/api/bank-account")
		.insert_header(bearer(user_id))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::OK);
	let body: Value = test::read_body_json(resp).await;
	assert_eq!(body["status"], "success");
	assert_eq!(body["data"], Value::Null);
}

#[actix_web::test]
async fn test_save_bank_account_rejects_bad_sort_code() {
	let user_id = Uuid::new_v4();
	let app = test_app!(MockState::new());

	let resp = test::TestRequest::post()
		.uri("/api/bank-account")
		.insert_header(bearer(user_id))
		.set_json(json!({
			"country": "GB",
			"account_holder_name": "Nia Okafor",
			"bank_name": "Barclays",
			"account_type": "checking",
			"account_number": "31926819",
			"sort_code": "601613",
		}))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	let body: Value = test::read_body_json(resp).await;
	assert_eq!(body["error"], "Invalid bank details");
	assert_eq!(body["details"]["sort_code"], "Invalid Sort Code");
}

#[actix_web::test]
async fn test_save_bank_account_stores_pending_account() {
	let user_id = Uuid::new_v4();
	let mut mocks = MockState::new();
	mocks
		.bank_accounts
		.expect_upsert_bank_account()
		.withf(move |a| {
			a.user_id == user_id
				&& a.country == "US"
				&& a.banking_system == "ACH"
				&& a.account_number_last4 == "5678"
				&& a.verification_status == "pending"
				&& !a.is_verified
		})
		.times(1)
		.returning(|a| {
			Ok(BankAccount {
				id: Uuid::new_v4(),
				user_id: a.user_id,
				country: a.country,
				currency: a.currency,
				banking_system: a.banking_system,
				account_holder_name: a.account_holder_name,
				bank_name: a.bank_name,
				account_type: a.account_type,
				account_number_encrypted: a.account_number_encrypted,
				account_number_last4: a.account_number_last4,
				routing_number_encrypted: a.routing_number_encrypted,
				stripe_account_id: None,
				verification_status: a.verification_status,
				is_verified: a.is_verified,
				created_at: Utc::now(),
				updated_at: a.updated_at,
			})
		});
	let app = test_app!(mocks);

	let resp = test::TestRequest::post()
		.uri("/api/bank-account")
		.insert_header(bearer(user_id))
		.set_json(json!({
			"country": "US",
			"account_holder_name": "Nia Okafor",
			"bank_name": "Chase",
			"account_type": "checking",
			"account_number": "12345678",
			"routing_number": "021000021",
		}))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::OK);
	let body: Value = test::read_body_json(resp).await;
	assert_eq!(body["data"]["account_number_masked"], "••••5678");
	assert_eq!(body["data"]["currency"], "USD");
	assert_eq!(body["data"]["verification_status"], "pending");
}

#[actix_web::test]
async fn test_connect_account_requires_bank_account() {
	let user_id = Uuid::new_v4();
	let mut mocks = MockState::new();
	mocks.bank_accounts.expect_find_bank_account().returning(|_| Ok(None));
	let app = test_app!(mocks);

	let resp = test::TestRequest::post()
		.uri("/api/stripe/connect/create-account")
		.insert_header(bearer(user_id))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	let body: Value = test::read_body_json(resp).await;
	assert_eq!(body["error"], "Add a bank account before connecting Stripe");
}

#[actix_web::test]
async fn test_connect_account_creates_and_links_stripe_account() {
	let user_id = Uuid::new_v4();
	let mut mocks = MockState::new();
	mocks.bank_accounts.expect_find_bank_account().returning(|id| {
		Ok(Some(BankAccount { stripe_account_id: None, ..TestFixtures::bank_account(id) }))
	});
	mocks
		.gateway
		.expect_create_connect_account()
		.withf(move |r| r.user_id == user_id && r.country == "US")
		.times(1)
		.returning(|_| Ok("acct_new".to_string()));
	mocks
		.bank_accounts
		.expect_set_stripe_account()
		.with(eq(user_id), eq("acct_new".to_string()))
		.times(1)
		.returning(|id, acct| {
			Ok(BankAccount { stripe_account_id: Some(acct), ..TestFixtures::bank_account(id) })
		});
	mocks
		.gateway
		.expect_create_onboarding_link()
		.with(eq("acct_new".to_string()))
		.returning(|_| Ok("https://connect.stripe.com/setup/e/acct_new".to_string()));
	let app = test_app!(mocks);

	let resp = test::TestRequest::post()
		.uri("/api/stripe/connect/create-account")
		.insert_header(bearer(user_id))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::OK);
	let body: Value = test::read_body_json(resp).await;
	assert_eq!(body["data"]["account_id"], "acct_new");
	assert_eq!(body["data"]["onboarding_url"], "https://connect.stripe.com/setup/e/acct_new");
}

#[actix_web::test]
async fn test_connect_account_without_stripe_key_is_unavailable() {
	let user_id = Uuid::new_v4();
	let mut mocks = MockState::new();
	mocks.bank_accounts.expect_find_bank_account().returning(|id| {
		Ok(Some(BankAccount { stripe_account_id: None, ..TestFixtures::bank_account(id) }))
	});
	mocks
		.gateway
		.expect_create_connect_account()
		.returning(|_| Err(GatewayError::NotConfigured));
	let app = test_app!(mocks);

	let resp = test::TestRequest::post()
		.uri("/api/stripe/connect/create-account")
		.insert_header(bearer(user_id))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[actix_web::test]
async fn test_unknown_country_lookup() {
	let app = test_app!(MockState::new());
	let resp = test::TestRequest::get().uri("/api/banking/countries/ZZ").send_request(&app).await;
	assert_eq!(resp.status(), StatusCode::NOT_FOUND);

	let resp = test::TestRequest::get().uri("/api/banking/countries/ng").send_request(&app).await;
	assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_admin_verification_returns_masked_account() {
	let admin_id = Uuid::new_v4();
	let user_id = Uuid::new_v4();
	let mut mocks = MockState::new();
	mocks.admin_ids = vec![admin_id];
	mocks
		.bank_accounts
		.expect_set_bank_verification()
		.with(eq(user_id), eq(true))
		.times(1)
		.returning(|id, _| {
			Ok(BankAccount {
				is_verified: true,
				verification_status: "verified".to_string(),
				..TestFixtures::bank_account(id)
			})
		});
	let app = test_app!(mocks);

	let resp = test::TestRequest::patch()
		.uri(&format!("/api/admin/bank-accounts/{user_id}/verification"))
		.insert_header(bearer(admin_id))
		.set_json(json!({ "verified": true }))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::OK);
	let body: Value = test::read_body_json(resp).await;
	assert_eq!(body["data"]["is_verified"], true);
	assert_eq!(body["data"]["account_number_masked"], "••••6789");
	assert_eq!(body["data"]["routing_number_masked"], "••••0021");
	assert!(body["data"].get("account_number_encrypted").is_none());
	assert!(body["data"].get("routing_number_encrypted").is_none());
}
