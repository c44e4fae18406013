use super::{PgRepo, RepoError, VerificationRepo};
use crate::{
	models::*,
	schema::{
		service_provider_profiles, service_provider_verification_documents as documents,
		service_provider_verification_requests as requests,
	},
	verification::Decision,
};
use chrono::Utc;
use diesel::{dsl::exists, pg::PgConnection, prelude::*};
use uuid::Uuid;

fn documents_for(
	conn: &mut PgConnection,
	request_id: Uuid,
) -> Result<Vec<VerificationDocument>, RepoError> {
	let docs = documents::table
		.filter(documents::request_id.eq(request_id))
		.order(documents::created_at.asc())
		.select(VerificationDocument::as_select())
		.load(conn)?;
	Ok(docs)
}

const PENDING_MESSAGE: &str = "A verification request is already pending";

impl VerificationRepo for PgRepo {
	fn latest_verification_request(
		&self,
		provider_id: Uuid,
	) -> Result<Option<VerificationRequestWithDocuments>, RepoError> {
		let mut conn = self.conn()?;
		let latest = requests::table
			.filter(requests::provider_id.eq(provider_id))
			.order(requests::submitted_at.desc())
			.select(VerificationRequest::as_select())
			.first(&mut conn)
			.optional()?;
		match latest {
			Some(request) => {
				let documents = documents_for(&mut conn, request.id)?;
				Ok(Some(VerificationRequestWithDocuments { request, documents }))
			},
			None => Ok(None),
		}
	}

	fn submit_verification(
		&self,
		request: NewVerificationRequest,
		uploads: Vec<DocumentUpload>,
	) -> Result<VerificationRequestWithDocuments, RepoError> {
		let mut conn = self.conn()?;
		conn.transaction(|conn| {
			let pending = diesel::select(exists(
				requests::table
					.filter(requests::provider_id.eq(request.provider_id))
					.filter(requests::status.eq("pending")),
			))
			.get_result::<bool>(conn)?;
			if pending {
				return Err(RepoError::Conflict(PENDING_MESSAGE.to_string()));
			}
			// The partial unique index settles two submissions racing past the check above.
			let saved = diesel::insert_into(requests::table)
				.values(&request)
				.returning(VerificationRequest::as_returning())
				.get_result(conn)
				.map_err(|e| RepoError::unique_as_conflict(e, PENDING_MESSAGE))?;
			let rows: Vec<NewVerificationDocument> = uploads
				.into_iter()
				.map(|d| NewVerificationDocument {
					request_id: saved.id,
					doc_type: d.doc_type,
					storage_path: d.storage_path.trim().to_string(),
				})
				.collect();
			let documents = diesel::insert_into(documents::table)
				.values(&rows)
				.returning(VerificationDocument::as_returning())
				.get_results(conn)?;
			let now = Utc::now();
			diesel::update(service_provider_profiles::table.find(request.provider_id))
				.set((
					service_provider_profiles::verification_status.eq("pending"),
					service_provider_profiles::verification_submitted_at.eq(Some(now)),
					service_provider_profiles::updated_at.eq(now),
				))
				.execute(conn)?;
			Ok(VerificationRequestWithDocuments { request: saved, documents })
		})
	}

	fn find_verification_request(&self, id: Uuid) -> Result<Option<VerificationRequest>, RepoError> {
		let mut conn = self.conn()?;
		let request = requests::table
			.find(id)
			.select(VerificationRequest::as_select())
			.first(&mut conn)
			.optional()?;
		Ok(request)
	}

	fn decide_verification(
		&self,
		id: Uuid,
		reviewer_id: Uuid,
		decision: Decision,
		notes: Option<String>,
	) -> Result<VerificationRequest, RepoError> {
		let mut conn = self.conn()?;
		conn.transaction(|conn| {
			let now = Utc::now();
			let decided = diesel::update(
				requests::table.filter(requests::id.eq(id)).filter(requests::status.eq("pending")),
			)
			.set((
				requests::status.eq(decision.request_status()),
				requests::reviewer_id.eq(Some(reviewer_id)),
				requests::reviewer_notes.eq(notes),
				requests::reviewed_at.eq(Some(now)),
			))
			.returning(VerificationRequest::as_returning())
			.get_result(conn)
			.optional()?;
			let Some(request) = decided else {
				let known = requests::table
					.find(id)
					.select(requests::id)
					.first::<Uuid>(conn)
					.optional()?;
				return Err(match known {
					Some(_) => RepoError::Conflict(
						"Verification request has already been reviewed".to_string(),
					),
					None => RepoError::NotFound("Verification request"),
				});
			};
			let profile = service_provider_profiles::table.find(request.provider_id);
			match decision {
				Decision::Approve => {
					diesel::update(profile)
						.set((
							service_provider_profiles::is_verified.eq(true),
							service_provider_profiles::id_verified.eq(true),
							service_provider_profiles::verification_status.eq("approved"),
							service_provider_profiles::verified_at.eq(Some(now)),
							service_provider_profiles::updated_at.eq(now),
						))
						.execute(conn)?;
				},
				Decision::Reject => {
					diesel::update(profile)
						.set((
							service_provider_profiles::verification_status.eq("rejected"),
							service_provider_profiles::updated_at.eq(now),
						))
						.execute(conn)?;
				},
			}
			Ok(request)
		})
	}
}
