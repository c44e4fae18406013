use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

const MINIMUM_PAYOUTS: &[(&str, i64)] = &[
	("USD", 25),
	("GBP", 20),
	("EUR", 25),
	("CAD", 30),
	("AUD", 35),
	("NGN", 10_000),
	("GHS", 300),
	("KES", 3_000),
	("ZAR", 400),
	("INR", 2_000),
];

const FALLBACK_MINIMUM: i64 = 25;

pub fn minimum_payout(currency: &str) -> BigDecimal {
	let currency = currency.trim().to_uppercase();
	let min = MINIMUM_PAYOUTS
		.iter()
		.find(|(c, _)| *c == currency)
		.map(|(_, m)| *m)
		.unwrap_or(FALLBACK_MINIMUM);
	BigDecimal::from(min)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayoutEligibility {
	pub currency: String,
	pub available_balance: BigDecimal,
	pub pending_requests: BigDecimal,
	pub min_payout: BigDecimal,
	pub withdrawable_amount: BigDecimal,
	pub can_request_payout: bool,
}

pub fn eligibility(currency: &str, balance: BigDecimal, pending: BigDecimal) -> PayoutEligibility {
	let min_payout = minimum_payout(currency);
	let remaining = &balance - &pending;
	let withdrawable_amount = if remaining > BigDecimal::zero() { remaining } else { BigDecimal::zero() };
	let can_request_payout = withdrawable_amount >= min_payout;
	PayoutEligibility {
		currency: currency.to_uppercase(),
		available_balance: balance,
		pending_requests: pending,
		min_payout,
		withdrawable_amount,
		can_request_payout,
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
	Pending,
	Approved,
	Processing,
	Completed,
	Rejected,
	Failed,
}

/// Statuses whose amount is still reserved against the wallet.
pub const OPEN_STATUSES: &[&str] = &["pending", "approved", "processing"];

impl PayoutStatus {
	pub fn as_str(&self) -> &'static str {
		match self {
			PayoutStatus::Pending => "pending",
			PayoutStatus::Approved => "approved",
			PayoutStatus::Processing => "processing",
			PayoutStatus::Completed => "completed",
			PayoutStatus::Rejected => "rejected",
			PayoutStatus::Failed => "failed",
		}
	}

	pub fn can_transition_to(&self, next: PayoutStatus) -> bool {
		use PayoutStatus::*;
		matches!(
			(self, next),
			(Pending, Approved)
				| (Pending, Rejected)
				| (Approved, Processing)
				| (Approved, Rejected)
				| (Processing, Completed)
				| (Processing, Failed)
		)
	}
}

impl FromStr for PayoutStatus {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim() {
			"pending" => Ok(PayoutStatus::Pending),
			"approved" => Ok(PayoutStatus::Approved),
			"processing" => Ok(PayoutStatus::Processing),
			"completed" => Ok(PayoutStatus::Completed),
			"rejected" => Ok(PayoutStatus::Rejected),
			"failed" => Ok(PayoutStatus::Failed),
			other => Err(format!("Invalid payout status: {other}")),
		}
	}
}

impl fmt::Display for PayoutStatus {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn dec(s: &str) -> BigDecimal {
		BigDecimal::from_str(s).unwrap()
	}

	#[test]
	fn minimums_per_currency() {
		assert_eq!(minimum_payout("usd"), dec("25"));
		assert_eq!(minimum_payout("GBP"), dec("20"));
		assert_eq!(minimum_payout("NGN"), dec("10000"));
		assert_eq!(minimum_payout("JPY"), dec("25"));
	}

	#[test]
	fn withdrawable_subtracts_open_requests() {
		let e = eligibility("USD", dec("100"), dec("60"));
		assert_eq!(e.withdrawable_amount, dec("40"));
		assert!(e.can_request_payout);

		let e = eligibility("USD", dec("100"), dec("80"));
		assert_eq!(e.withdrawable_amount, dec("20"));
		assert!(!e.can_request_payout);
	}

	#[test]
	fn withdrawable_never_negative() {
		let e = eligibility("GBP", dec("10"), dec("30"));
		assert_eq!(e.withdrawable_amount, BigDecimal::zero());
		assert!(!e.can_request_payout);
	}

	#[test]
	fn exactly_minimum_is_enough() {
		assert!(eligibility("EUR", dec("25.00"), BigDecimal::zero()).can_request_payout);
	}

	#[test]
	fn status_machine() {
		use PayoutStatus::*;
		assert!(Pending.can_transition_to(Approved));
		assert!(Pending.can_transition_to(Rejected));
		assert!(Approved.can_transition_to(Processing));
		assert!(Processing.can_transition_to(Completed));
		assert!(Processing.can_transition_to(Failed));
		assert!(!Pending.can_transition_to(Completed));
		assert!(!Completed.can_transition_to(Failed));
		assert!(!Rejected.can_transition_to(Approved));
		assert_eq!("processing".parse::<PayoutStatus>().unwrap(), Processing);
		assert!("paid".parse::<PayoutStatus>().is_err());
	}
}
