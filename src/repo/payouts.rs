use super::{PayoutRepo, PgRepo, RepoError};
use crate::{
	models::{NewPayoutRequest, NewWalletTransaction, PayoutRequest, PayoutStatusChange},
	payouts::OPEN_STATUSES,
	schema::{payout_requests, user_wallets, wallet_transactions},
};
use bigdecimal::{BigDecimal, Zero};
use chrono::Utc;
use diesel::{dsl::sum, pg::PgConnection, prelude::*};
use uuid::Uuid;

/// Tells a vanished request apart from one that moved on under us.
fn missed_update(conn: &mut PgConnection, id: Uuid) -> RepoError {
	let exists = payout_requests::table
		.find(id)
		.select(payout_requests::id)
		.first::<Uuid>(conn)
		.optional();
	match exists {
		Ok(Some(_)) => RepoError::Conflict("Payout request status has changed".to_string()),
		Ok(None) => RepoError::NotFound("Payout request"),
		Err(e) => RepoError::Database(e),
	}
}

fn apply_change(
	conn: &mut PgConnection,
	id: Uuid,
	from_status: &str,
	change: &PayoutStatusChange,
) -> Result<PayoutRequest, RepoError> {
	let updated = diesel::update(
		payout_requests::table
			.filter(payout_requests::id.eq(id))
			.filter(payout_requests::status.eq(from_status)),
	)
	.set(change)
	.returning(PayoutRequest::as_returning())
	.get_result(conn)
	.optional()?;
	match updated {
		Some(request) => Ok(request),
		None => Err(missed_update(conn, id)),
	}
}

impl PayoutRepo for PgRepo {
	fn open_payout_total(&self, user_id: Uuid, currency: String) -> Result<BigDecimal, RepoError> {
		let mut conn = self.conn()?;
		let total = payout_requests::table
			.filter(payout_requests::user_id.eq(user_id))
			.filter(payout_requests::currency.eq(currency))
			.filter(payout_requests::status.eq_any(OPEN_STATUSES.to_vec()))
			.select(sum(payout_requests::amount))
			.first::<Option<BigDecimal>>(&mut conn)?;
		Ok(total.unwrap_or_else(BigDecimal::zero))
	}

	fn open_payout_totals(&self, user_id: Uuid) -> Result<Vec<(String, BigDecimal)>, RepoError> {
		let mut conn = self.conn()?;
		let rows = payout_requests::table
			.filter(payout_requests::user_id.eq(user_id))
			.filter(payout_requests::status.eq_any(OPEN_STATUSES.to_vec()))
			.group_by(payout_requests::currency)
			.select((payout_requests::currency, sum(payout_requests::amount)))
			.load::<(String, Option<BigDecimal>)>(&mut conn)?;
		Ok(rows
			.into_iter()
			.map(|(currency, total)| (currency, total.unwrap_or_else(BigDecimal::zero)))
			.collect())
	}

	fn create_payout(&self, request: NewPayoutRequest) -> Result<PayoutRequest, RepoError> {
		let mut conn = self.conn()?;
		let saved = diesel::insert_into(payout_requests::table)
			.values(&request)
			.returning(PayoutRequest::as_returning())
			.get_result(&mut conn)?;
		Ok(saved)
	}

	fn list_payouts(
		&self,
		user_id: Uuid,
		limit: i64,
		offset: i64,
	) -> Result<Vec<PayoutRequest>, RepoError> {
		let mut conn = self.conn()?;
		let rows = payout_requests::table
			.filter(payout_requests::user_id.eq(user_id))
			.order(payout_requests::requested_at.desc())
			.limit(limit)
			.offset(offset)
			.select(PayoutRequest::as_select())
			.load(&mut conn)?;
		Ok(rows)
	}

	fn list_payouts_by_status(
		&self,
		status: Option<String>,
		limit: i64,
		offset: i64,
	) -> Result<Vec<PayoutRequest>, RepoError> {
		let mut conn = self.conn()?;
		let mut query = payout_requests::table.select(PayoutRequest::as_select()).into_boxed();
		if let Some(status) = status {
			query = query.filter(payout_requests::status.eq(status));
		}
		let rows = query
			.order(payout_requests::requested_at.asc())
			.limit(limit)
			.offset(offset)
			.load(&mut conn)?;
		Ok(rows)
	}

	fn find_payout(&self, id: Uuid) -> Result<Option<PayoutRequest>, RepoError> {
		let mut conn = self.conn()?;
		let request = payout_requests::table
			.find(id)
			.select(PayoutRequest::as_select())
			.first(&mut conn)
			.optional()?;
		Ok(request)
	}

	fn update_payout(
		&self,
		id: Uuid,
		from_status: String,
		change: PayoutStatusChange,
	) -> Result<PayoutRequest, RepoError> {
		let mut conn = self.conn()?;
		apply_change(&mut conn, id, &from_status, &change)
	}

	fn complete_payout(
		&self,
		id: Uuid,
		from_status: String,
		change: PayoutStatusChange,
	) -> Result<PayoutRequest, RepoError> {
		let mut conn = self.conn()?;
		conn.transaction(|conn| {
			let request = apply_change(conn, id, &from_status, &change)?;
			let debited = diesel::update(
				user_wallets::table
					.filter(user_wallets::user_id.eq(request.user_id))
					.filter(user_wallets::currency.eq(&request.currency))
					.filter(user_wallets::balance.ge(request.amount.clone())),
			)
			.set((
				user_wallets::balance.eq(user_wallets::balance - request.amount.clone()),
				user_wallets::updated_at.eq(Utc::now()),
			))
			.execute(conn)?;
			if debited == 0 {
				return Err(RepoError::InsufficientBalance);
			}
			diesel::insert_into(wallet_transactions::table)
				.values(&NewWalletTransaction {
					user_id: request.user_id,
					currency: request.currency.clone(),
					amount: -request.amount.clone(),
					transaction_type: "payout".to_string(),
					reference_id: Some(request.id),
					description: Some("Payout to bank account".to_string()),
				})
				.execute(conn)?;
			Ok(request)
		})
	}
}
