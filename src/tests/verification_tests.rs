use crate::{
	models::{VerificationRequest, VerificationRequestWithDocuments},
	repo::RepoError,
	tests::{
		fixtures::TestFixtures,
		test_utils::{bearer, test_app, MockState},
	},
	verification::{Decision, ProviderStats},
};
use actix_web::{http::StatusCode, test};
use chrono::Utc;
use mockall::predicate::eq;
use serde_json::{json, Value};
use uuid::Uuid;

fn documents() -> Value {
	json!([
		{ "docType": "government_id", "storagePath": "verification/id.png" },
		{ "docType": "selfie", "storagePath": "verification/selfie.png" },
	])
}

fn pending_request(provider_id: Uuid) -> VerificationRequest {
	VerificationRequest {
		id: Uuid::new_v4(),
		provider_id,
		status: "pending".to_string(),
		notes: None,
		reviewer_id: None,
		reviewer_notes: None,
		automated_checks: json!({}),
		submitted_at: Utc::now(),
		reviewed_at: None,
	}
}

fn ready_stats() -> ProviderStats {
	ProviderStats { active_offerings: 2, portfolio_items: 1, has_connect_account: true }
}

#[actix_web::test]
async fn test_status_lists_prerequisites() {
	let provider_id = Uuid::new_v4();
	let mut mocks = MockState::new();
	mocks
		.providers
		.expect_find_provider()
		.returning(|id| Ok(Some(TestFixtures::provider_profile(id))));
	mocks.providers.expect_provider_stats().returning(|_| {
		Ok(ProviderStats { active_offerings: 0, portfolio_items: 3, has_connect_account: false })
	});
	mocks.verification.expect_latest_verification_request().returning(|_| Ok(None));
	let app = test_app!(mocks);

	let resp = test::TestRequest::get()
		.uri(&format!("/api/service-providers/{provider_id}/verification"))
		.insert_header(bearer(provider_id))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::OK);
	let body: Value = test::read_body_json(resp).await;
	let prereqs = &body["data"]["prerequisites"];
	assert_eq!(prereqs["profileComplete"]["met"], true);
	assert_eq!(prereqs["offeringsPublished"]["met"], false);
	assert_eq!(prereqs["connectAccount"]["blocking"], true);
	assert_eq!(prereqs["completedBookings"]["blocking"], false);
	assert_eq!(body["data"]["latestRequest"], Value::Null);
}

#[actix_web::test]
async fn test_request_needs_identity_documents() {
	let provider_id = Uuid::new_v4();
	let app = test_app!(MockState::new());

	let resp = test::TestRequest::post()
		.uri(&format!("/api/service-providers/{provider_id}/verification/request"))
		.insert_header(bearer(provider_id))
		.set_json(json!({ "documents": [{ "docType": "selfie", "storagePath": "s.png" }] }))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
	let body: Value = test::read_body_json(resp).await;
	assert_eq!(body["error"], "Missing required document: government_id");
}

#[actix_web::test]
async fn test_unmet_prerequisites_block_request() {
	let provider_id = Uuid::new_v4();
	let mut mocks = MockState::new();
	mocks
		.providers
		.expect_find_provider()
		.returning(|id| Ok(Some(TestFixtures::provider_profile(id))));
	mocks.providers.expect_provider_stats().returning(|_| {
		Ok(ProviderStats { has_connect_account: false, ..ready_stats() })
	});
	let app = test_app!(mocks);

	let resp = test::TestRequest::post()
		.uri(&format!("/api/service-providers/{provider_id}/verification/request"))
		.insert_header(bearer(provider_id))
		.set_json(json!({ "documents": documents() }))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::CONFLICT);
	let body: Value = test::read_body_json(resp).await;
	let unmet = body["details"]["unmet"].as_array().unwrap();
	assert_eq!(unmet.len(), 1);
	assert_eq!(unmet[0]["key"], "connectAccount");
}

#[actix_web::test]
async fn test_request_is_stored_with_snapshot() {
	let provider_id = Uuid::new_v4();
	let mut mocks = MockState::new();
	mocks
		.providers
		.expect_find_provider()
		.returning(|id| Ok(Some(TestFixtures::provider_profile(id))));
	mocks.providers.expect_provider_stats().returning(|_| Ok(ready_stats()));
	mocks
		.verification
		.expect_submit_verification()
		.withf(move |req, docs| {
			req.provider_id == provider_id
				&& req.status == "pending"
				&& req.notes.as_deref() == Some("Please review")
				&& req.automated_checks["connectAccount"]["met"] == true
				&& docs.len() == 2
		})
		.times(1)
		.returning(|req, _| {
			Ok(VerificationRequestWithDocuments {
				request: pending_request(req.provider_id),
				documents: vec![],
			})
		});
	let app = test_app!(mocks);

	let resp = test::TestRequest::post()
		.uri(&format!("/api/service-providers/{provider_id}/verification/request"))
		.insert_header(bearer(provider_id))
		.set_json(json!({ "notes": " Please review ", "documents": documents() }))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::CREATED);
	let body: Value = test::read_body_json(resp).await;
	assert_eq!(body["data"]["status"], "pending");
}

#[actix_web::test]
async fn test_duplicate_pending_request_conflicts() {
	let provider_id = Uuid::new_v4();
	let mut mocks = MockState::new();
	mocks
		.providers
		.expect_find_provider()
		.returning(|id| Ok(Some(TestFixtures::provider_profile(id))));
	mocks.providers.expect_provider_stats().returning(|_| Ok(ready_stats()));
	mocks.verification.expect_submit_verification().returning(|_, _| {
		Err(RepoError::Conflict("A verification request is already pending".to_string()))
	});
	let app = test_app!(mocks);

	let resp = test::TestRequest::post()
		.uri(&format!("/api/service-providers/{provider_id}/verification/request"))
		.insert_header(bearer(provider_id))
		.set_json(json!({ "documents": documents() }))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn test_admin_approves_request() {
	let admin_id = Uuid::new_v4();
	let request_id = Uuid::new_v4();
	let mut mocks = MockState::new();
	mocks.admin_ids = vec![admin_id];
	mocks
		.verification
		.expect_decide_verification()
		.with(eq(request_id), eq(admin_id), eq(Decision::Approve), eq(Some("Looks good".to_string())))
		.times(1)
		.returning(|id, reviewer, _, notes| {
			Ok(VerificationRequest {
				id,
				status: "approved".to_string(),
				reviewer_id: Some(reviewer),
				reviewer_notes: notes,
				reviewed_at: Some(Utc::now()),
				..pending_request(Uuid::new_v4())
			})
		});
	let app = test_app!(mocks);

	let resp = test::TestRequest::patch()
		.uri(&format!("/api/admin/verification/{request_id}"))
		.insert_header(bearer(admin_id))
		.set_json(json!({ "decision": "approve", "notes": "Looks good" }))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::OK);
	let body: Value = test::read_body_json(resp).await;
	assert_eq!(body["data"]["status"], "approved");
}

#[actix_web::test]
async fn test_admin_reads_single_request() {
	let admin_id = Uuid::new_v4();
	let request = pending_request(Uuid::new_v4());
	let request_id = request.id;
	let mut mocks = MockState::new();
	mocks.admin_ids = vec![admin_id];
	mocks
		.verification
		.expect_find_verification_request()
		.with(eq(request_id))
		.returning(move |_| Ok(Some(request.clone())));
	mocks.verification.expect_find_verification_request().returning(|_| Ok(None));
	let app = test_app!(mocks);

	let resp = test::TestRequest::get()
		.uri(&format!("/api/admin/verification/{request_id}"))
		.insert_header(bearer(admin_id))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::OK);
	let body: Value = test::read_body_json(resp).await;
	assert_eq!(body["data"]["status"], "pending");

	let resp = test::TestRequest::get()
		.uri(&format!("/api/admin/verification/{}", Uuid::new_v4()))
		.insert_header(bearer(admin_id))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::NOT_FOUND);

	let resp = test::TestRequest::get()
		.uri(&format!("/api/admin/verification/{request_id}"))
		.insert_header(bearer(Uuid::new_v4()))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
async fn test_admin_rejects_unknown_decision() {
	let admin_id = Uuid::new_v4();
	let mut mocks = MockState::new();
	mocks.admin_ids = vec![admin_id];
	let app = test_app!(mocks);

	let resp = test::TestRequest::patch()
		.uri(&format!("/api/admin/verification/{}", Uuid::new_v4()))
		.insert_header(bearer(admin_id))
		.set_json(json!({ "decision": "maybe" }))
		.send_request(&app)
		.await;
	assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}
