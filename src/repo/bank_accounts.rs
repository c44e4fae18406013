use super::{BankAccountRepo, PgRepo, RepoError};
use crate::{
	models::{BankAccount, NewBankAccount},
	schema::creator_bank_accounts::dsl,
};
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

impl BankAccountRepo for PgRepo {
	fn find_bank_account(&self, user_id: Uuid) -> Result<Option<BankAccount>, RepoError> {
		let mut conn = self.conn()?;
		let account = dsl::creator_bank_accounts
			.filter(dsl::user_id.eq(user_id))
			.select(BankAccount::as_select())
			.first(&mut conn)
			.optional()?;
		Ok(account)
	}

	fn upsert_bank_account(&self, account: NewBankAccount) -> Result<BankAccount, RepoError> {
		let mut conn = self.conn()?;
		let saved = diesel::insert_into(dsl::creator_bank_accounts)
			.values(&account)
			.on_conflict(dsl::user_id)
			.do_update()
			.set(&account)
			.returning(BankAccount::as_returning())
			.get_result(&mut conn)?;
		Ok(saved)
	}

	fn set_stripe_account(
		&self,
		user_id: Uuid,
		stripe_account_id: String,
	) -> Result<BankAccount, RepoError> {
		let mut conn = self.conn()?;
		diesel::update(dsl::creator_bank_accounts.filter(dsl::user_id.eq(user_id)))
			.set((dsl::stripe_account_id.eq(stripe_account_id), dsl::updated_at.eq(Utc::now())))
			.returning(BankAccount::as_returning())
			.get_result(&mut conn)
			.optional()?
			.ok_or(RepoError::NotFound("Bank account"))
	}

	fn set_bank_verification(&self, user_id: Uuid, verified: bool) -> Result<BankAccount, RepoError> {
		let status = if verified { "verified" } else { "rejected" };
		let mut conn = self.conn()?;
		diesel::update(dsl::creator_bank_accounts.filter(dsl::user_id.eq(user_id)))
			.set((
				dsl::is_verified.eq(verified),
				dsl::verification_status.eq(status),
				dsl::updated_at.eq(Utc::now()),
			))
			.returning(BankAccount::as_returning())
			.get_result(&mut conn)
			.optional()?
			.ok_or(RepoError::NotFound("Bank account"))
	}
}
