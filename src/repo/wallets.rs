use super::{PgRepo, RepoError, WalletRepo};
use crate::{
	models::{NewWithdrawalMethod, TransactionTotal, Wallet, WalletTransaction, WithdrawalMethod},
	schema::{user_wallets, wallet_transactions, wallet_withdrawal_methods},
};
use bigdecimal::{BigDecimal, Zero};
use diesel::{dsl::sum, prelude::*};
use uuid::Uuid;

impl WalletRepo for PgRepo {
	fn list_wallets(&self, user_id: Uuid) -> Result<Vec<Wallet>, RepoError> {
		let mut conn = self.conn()?;
		let wallets = user_wallets::table
			.filter(user_wallets::user_id.eq(user_id))
			.order(user_wallets::currency.asc())
			.select(Wallet::as_select())
			.load(&mut conn)?;
		Ok(wallets)
	}

	fn wallet_balance(&self, user_id: Uuid, currency: String) -> Result<BigDecimal, RepoError> {
		let mut conn = self.conn()?;
		let balance = user_wallets::table
			.filter(user_wallets::user_id.eq(user_id))
			.filter(user_wallets::currency.eq(currency))
			.select(user_wallets::balance)
			.first::<BigDecimal>(&mut conn)
			.optional()?;
		Ok(balance.unwrap_or_else(BigDecimal::zero))
	}

	fn list_transactions(
		&self,
		user_id: Uuid,
		currency: Option<String>,
		limit: i64,
		offset: i64,
	) -> Result<Vec<WalletTransaction>, RepoError> {
		let mut conn = self.conn()?;
		let mut query = wallet_transactions::table
			.filter(wallet_transactions::user_id.eq(user_id))
			.select(WalletTransaction::as_select())
			.into_boxed();
		if let Some(currency) = currency {
			query = query.filter(wallet_transactions::currency.eq(currency));
		}
		let rows = query
			.order(wallet_transactions::created_at.desc())
			.limit(limit)
			.offset(offset)
			.load(&mut conn)?;
		Ok(rows)
	}

	fn transaction_totals(&self, user_id: Uuid) -> Result<Vec<TransactionTotal>, RepoError> {
		let mut conn = self.conn()?;
		let rows = wallet_transactions::table
			.filter(wallet_transactions::user_id.eq(user_id))
			.group_by((wallet_transactions::currency, wallet_transactions::transaction_type))
			.select((
				wallet_transactions::currency,
				wallet_transactions::transaction_type,
				sum(wallet_transactions::amount),
			))
			.load::<(String, String, Option<BigDecimal>)>(&mut conn)?;
		Ok(rows
			.into_iter()
			.map(|(currency, transaction_type, total)| TransactionTotal {
				currency,
				transaction_type,
				total: total.unwrap_or_else(BigDecimal::zero),
			})
			.collect())
	}

	fn list_withdrawal_methods(&self, user_id: Uuid) -> Result<Vec<WithdrawalMethod>, RepoError> {
		let mut conn = self.conn()?;
		let methods = wallet_withdrawal_methods::table
			.filter(wallet_withdrawal_methods::user_id.eq(user_id))
			.order((
				wallet_withdrawal_methods::is_default.desc(),
				wallet_withdrawal_methods::created_at.desc(),
			))
			.select(WithdrawalMethod::as_select())
			.load(&mut conn)?;
		Ok(methods)
	}

	fn add_withdrawal_method(
		&self,
		mut method: NewWithdrawalMethod,
	) -> Result<WithdrawalMethod, RepoError> {
		let mut conn = self.conn()?;
		conn.transaction(|conn| {
			let existing: i64 = wallet_withdrawal_methods::table
				.filter(wallet_withdrawal_methods::user_id.eq(method.user_id))
				.count()
				.get_result(conn)?;
			method.is_default = existing == 0;
			let saved = diesel::insert_into(wallet_withdrawal_methods::table)
				.values(&method)
				.returning(WithdrawalMethod::as_returning())
				.get_result(conn)?;
			Ok(saved)
		})
	}

	fn set_default_withdrawal_method(
		&self,
		user_id: Uuid,
		method_id: Uuid,
	) -> Result<WithdrawalMethod, RepoError> {
		let mut conn = self.conn()?;
		conn.transaction(|conn| {
			let owned = wallet_withdrawal_methods::table
				.filter(wallet_withdrawal_methods::id.eq(method_id))
				.filter(wallet_withdrawal_methods::user_id.eq(user_id))
				.select(wallet_withdrawal_methods::id)
				.first::<Uuid>(conn)
				.optional()?;
			if owned.is_none() {
				return Err(RepoError::NotFound("Withdrawal method"));
			}
			diesel::update(
				wallet_withdrawal_methods::table
					.filter(wallet_withdrawal_methods::user_id.eq(user_id))
					.filter(wallet_withdrawal_methods::id.ne(method_id)),
			)
			.set(wallet_withdrawal_methods::is_default.eq(false))
			.execute(conn)?;
			let method = diesel::update(wallet_withdrawal_methods::table.find(method_id))
				.set(wallet_withdrawal_methods::is_default.eq(true))
				.returning(WithdrawalMethod::as_returning())
				.get_result(conn)?;
			Ok(method)
		})
	}
}
