use crate::{
	banking::{self, BankDetailsForm},
	models::{TransactionTotal, Wallet, WithdrawalMethodRequest},
};
use bigdecimal::{BigDecimal, Zero};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::BTreeMap;

pub const MAX_TRANSACTION_PAGE: i64 = 100;
pub const DEFAULT_TRANSACTION_PAGE: i64 = 20;

static EXPIRY_RE: Lazy<Regex> =
	Lazy::new(|| {
		Regex::new(r"^(0[1-9]|1[0-2])/\d{2}$")
			.unwrap_or_else(|e| panic!("invalid expiry pattern: {e}"))
	});

/// A withdrawal method that passed validation, ready to be sealed.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedMethod {
	pub method_type: String,
	pub country: Option<String>,
	pub currency: Option<String>,
	pub banking_system: Option<String>,
	pub details: Value,
	pub masked: String,
}

pub fn luhn_valid(number: &str) -> bool {
	let digits: Vec<u32> = number.chars().filter_map(|c| c.to_digit(10)).collect();
	if digits.len() < 12 || digits.len() > 19 || digits.len() != number.chars().count() {
		return false;
	}
	let sum: u32 = digits
		.iter()
		.rev()
		.enumerate()
		.map(|(i, d)| {
			if i % 2 == 1 {
				let doubled = d * 2;
				if doubled > 9 {
					doubled - 9
				} else {
					doubled
				}
			} else {
				*d
			}
		})
		.sum();
	sum % 10 == 0
}

fn bank_transfer(req: &WithdrawalMethodRequest) -> Result<ValidatedMethod, Value> {
	let Some(form) = &req.bank_details else {
		return Err(json!("Bank details are required for bank transfer"));
	};
	let mut form: BankDetailsForm = form.clone();
	if form.country.trim().is_empty() {
		form.country = req.country.clone().unwrap_or_default();
	}
	let details = banking::validate(&form).map_err(|e| json!(e.0))?;
	let masked = banking::mask(&details.account_number);
	Ok(ValidatedMethod {
		method_type: "bank_transfer".into(),
		country: Some(details.country.to_string()),
		currency: Some(
			req.currency.clone().map(|c| c.to_uppercase()).unwrap_or_else(|| details.currency.to_string()),
		),
		banking_system: Some(details.banking_system.to_string()),
		details: json!({
			"account_holder_name": details.account_holder_name,
			"bank_name": details.bank_name,
			"account_type": details.account_type,
			"account_number": details.account_number,
			"routing_identifier": details.routing_identifier,
			"fields": details.values,
		}),
		masked,
	})
}

/// Checks a withdrawal method request. Errors are either a message or a field map.
pub fn validate_method(req: &WithdrawalMethodRequest) -> Result<ValidatedMethod, Value> {
	let currency = req.currency.as_ref().map(|c| c.trim().to_uppercase());
	let country = req.country.as_ref().map(|c| c.trim().to_uppercase());
	match req.method_type.as_str() {
		"bank_transfer" => bank_transfer(req),
		"paypal" => {
			let email = req
				.paypal_email
				.as_deref()
				.map(str::trim)
				.filter(|e| !e.is_empty())
				.ok_or_else(|| json!("PayPal email is required"))?;
			Ok(ValidatedMethod {
				method_type: "paypal".into(),
				country,
				currency,
				banking_system: None,
				details: json!({ "email": email }),
				masked: mask_email(email),
			})
		},
		"crypto" => {
			let addr = req.crypto_address.as_ref().ok_or_else(|| json!("Crypto address is required"))?;
			Ok(ValidatedMethod {
				method_type: "crypto".into(),
				country,
				currency: Some(addr.currency.trim().to_uppercase()),
				banking_system: None,
				details: json!({
					"address": addr.address.trim(),
					"currency": addr.currency.trim().to_uppercase(),
					"network": addr.network.trim(),
				}),
				masked: banking::mask(addr.address.trim()),
			})
		},
		"prepaid_card" => {
			let card = req.card_details.as_ref().ok_or_else(|| json!("Card details are required"))?;
			let number: String = card.card_number.chars().filter(|c| !c.is_whitespace()).collect();
			let mut errors = BTreeMap::new();
			if !luhn_valid(&number) {
				errors.insert("card_number", "Invalid card number");
			}
			if !EXPIRY_RE.is_match(card.expiry_date.trim()) {
				errors.insert("expiry_date", "Expiry date must be MM/YY");
			}
			if !errors.is_empty() {
				return Err(json!(errors));
			}
			Ok(ValidatedMethod {
				method_type: "prepaid_card".into(),
				country,
				currency,
				banking_system: None,
				details: json!({
					"card_number": number,
					"card_holder_name": card.card_holder_name.trim(),
					"expiry_date": card.expiry_date.trim(),
				}),
				masked: banking::mask(&number),
			})
		},
		_ => Err(json!("Invalid method type")),
	}
}

fn mask_email(email: &str) -> String {
	match email.split_once('@') {
		Some((local, domain)) => {
			let first: String = local.chars().take(1).collect();
			format!("{first}•••@{domain}")
		},
		None => banking::mask(email),
	}
}

pub fn page_bounds(limit: Option<i64>, offset: Option<i64>) -> (i64, i64) {
	let limit = limit.unwrap_or(DEFAULT_TRANSACTION_PAGE).clamp(1, MAX_TRANSACTION_PAGE);
	(limit, offset.unwrap_or(0).max(0))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueSummary {
	pub currency: String,
	pub balance: BigDecimal,
	pub totals_by_type: BTreeMap<String, BigDecimal>,
	pub total_earned: BigDecimal,
	pub total_paid_out: BigDecimal,
	pub pending_payouts: BigDecimal,
}

fn summary_for<'a>(
	map: &'a mut BTreeMap<String, RevenueSummary>,
	currency: &str,
) -> &'a mut RevenueSummary {
	map.entry(currency.to_string()).or_insert_with(|| RevenueSummary {
		currency: currency.to_string(),
		balance: BigDecimal::zero(),
		totals_by_type: BTreeMap::new(),
		total_earned: BigDecimal::zero(),
		total_paid_out: BigDecimal::zero(),
		pending_payouts: BigDecimal::zero(),
	})
}

/// Folds wallet balances, per-type transaction sums and open payout amounts per currency.
pub fn revenue_summary(
	wallets: &[Wallet],
	totals: &[TransactionTotal],
	pending: &[(String, BigDecimal)],
) -> Vec<RevenueSummary> {
	let mut by_currency = BTreeMap::new();
	for w in wallets {
		summary_for(&mut by_currency, &w.currency).balance = w.balance.clone();
	}
	for t in totals {
		let s = summary_for(&mut by_currency, &t.currency);
		s.totals_by_type.insert(t.transaction_type.clone(), t.total.clone());
		if t.transaction_type == "payout" {
			s.total_paid_out += t.total.abs();
		} else if t.total > BigDecimal::zero() {
			s.total_earned += t.total.clone();
		}
	}
	for (currency, amount) in pending {
		summary_for(&mut by_currency, currency).pending_payouts += amount.clone();
	}
	by_currency.into_values().collect()
}
