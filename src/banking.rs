//! Country-aware bank account rules.
//!
//! Every supported country lists the fields a creator must provide, the pattern each field
//! must match and where the country's routing identifier comes from. Whatever the local name
//! of that identifier (sort code, BSB, IFSC, bank code, ...) it ends up in the single
//! `routing_number_encrypted` column of `creator_bank_accounts`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;

pub const ACCOUNT_TYPES: &[&str] = &["checking", "savings", "business"];

#[derive(Debug)]
pub struct FieldSpec {
	pub name: &'static str,
	pub label: &'static str,
	pub placeholder: Option<&'static str>,
	pub required: bool,
	pub pattern: Option<Regex>,
	pub options: Option<&'static [&'static str]>,
}

impl Serialize for FieldSpec {
	fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
		use serde::ser::SerializeStruct;
		let mut s = serializer.serialize_struct("FieldSpec", 6)?;
		s.serialize_field("name", self.name)?;
		s.serialize_field("label", self.label)?;
		s.serialize_field("placeholder", &self.placeholder)?;
		s.serialize_field("required", &self.required)?;
		s.serialize_field("pattern", &self.pattern.as_ref().map(|r| r.as_str()))?;
		s.serialize_field("options", &self.options)?;
		s.end()
	}
}

/// Where the normalized routing identifier is taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "fields", rename_all = "snake_case")]
pub enum RoutingSource {
	Field(&'static str),
	Joined(&'static [&'static str]),
	/// `0` + institution number + transit number.
	CanadianElectronic,
	None,
}

#[derive(Debug, Serialize)]
pub struct CountryBanking {
	pub code: &'static str,
	pub name: &'static str,
	pub currency: &'static str,
	pub banking_system: &'static str,
	/// Field holding the value stored as the account number (`account_number` or `iban`).
	pub account_field: &'static str,
	pub routing: RoutingSource,
	pub fields: Vec<FieldSpec>,
}

fn compile(pattern: &'static str) -> Regex {
	Regex::new(pattern).unwrap_or_else(|e| panic!("invalid banking pattern {pattern}: {e}"))
}

fn required(
	name: &'static str,
	label: &'static str,
	placeholder: &'static str,
	pattern: &'static str,
) -> FieldSpec {
	FieldSpec {
		name,
		label,
		placeholder: Some(placeholder),
		required: true,
		pattern: Some(compile(pattern)),
		options: None,
	}
}

fn optional(
	name: &'static str,
	label: &'static str,
	placeholder: &'static str,
	pattern: &'static str,
) -> FieldSpec {
	FieldSpec { required: false, ..required(name, label, placeholder, pattern) }
}

fn swift_code() -> FieldSpec {
	optional("swift_code", "SWIFT/BIC Code", "DEUTDEFF", r"^[A-Z]{4}[A-Z]{2}[A-Z0-9]{2}([A-Z0-9]{3})?$")
}

fn country(
	code: &'static str,
	name: &'static str,
	currency: &'static str,
	banking_system: &'static str,
	routing: RoutingSource,
	specific: Vec<FieldSpec>,
) -> CountryBanking {
	let mut fields = vec![
		FieldSpec {
			name: "account_holder_name",
			label: "Account Holder Name",
			placeholder: None,
			required: true,
			pattern: None,
			options: None,
		},
		FieldSpec {
			name: "bank_name",
			label: "Bank Name",
			placeholder: None,
			required: true,
			pattern: None,
			options: None,
		},
	];
	let account_field = if specific.iter().any(|f| f.name == "iban") { "iban" } else { "account_number" };
	fields.extend(specific);
	fields.push(FieldSpec {
		name: "account_type",
		label: "Account Type",
		placeholder: None,
		required: true,
		pattern: Some(compile(r"^(checking|savings|business)$")),
		options: Some(ACCOUNT_TYPES),
	});
	CountryBanking { code, name, currency, banking_system, account_field, routing, fields }
}

fn iban_country(
	code: &'static str,
	name: &'static str,
	currency: &'static str,
	banking_system: &'static str,
	placeholder: &'static str,
	pattern: &'static str,
) -> CountryBanking {
	country(
		code,
		name,
		currency,
		banking_system,
		RoutingSource::Field("swift_code"),
		vec![required("iban", "IBAN", placeholder, pattern), swift_code()],
	)
}

static COUNTRIES: Lazy<Vec<CountryBanking>> = Lazy::new(|| {
	use RoutingSource::*;
	vec![
		country(
			"US",
			"United States",
			"USD",
			"ACH",
			Field("routing_number"),
			vec![
				required("account_number", "Account Number", "123456789", r"^\d{8,17}$"),
				required("routing_number", "Routing Number", "123456789", r"^\d{9}$"),
			],
		),
		country(
			"GB",
			"United Kingdom",
			"GBP",
			"FPS",
			Field("sort_code"),
			vec![
				required("account_number", "Account Number", "12345678", r"^\d{8}$"),
				required("sort_code", "Sort Code", "12-34-56", r"^\d{2}-\d{2}-\d{2}$"),
			],
		),
		country(
			"CA",
			"Canada",
			"CAD",
			"EFT",
			CanadianElectronic,
			vec![
				required("account_number", "Account Number", "123456789", r"^\d{7,12}$"),
				required("transit_number", "Transit Number", "12345", r"^\d{5}$"),
				required("institution_number", "Institution Number", "123", r"^\d{3}$"),
			],
		),
		country(
			"AU",
			"Australia",
			"AUD",
			"BECS",
			Field("bsb_code"),
			vec![
				required("account_number", "Account Number", "12345678", r"^\d{6,9}$"),
				required("bsb_code", "BSB Code", "123-456", r"^\d{3}-\d{3}$"),
			],
		),
		country(
			"NZ",
			"New Zealand",
			"NZD",
			"BECS",
			None,
			vec![required(
				"account_number",
				"Account Number",
				"12-3456-1234567-00",
				r"^\d{2}-\d{4}-\d{7}-\d{2,3}$",
			)],
		),
		iban_country(
			"IE",
			"Ireland",
			"EUR",
			"SEPA",
			"IE29AIBK93115212345678",
			r"^IE\d{2}[A-Z]{4}\d{14}$",
		),
		iban_country("DE", "Germany", "EUR", "SEPA", "DE89370400440532013000", r"^DE\d{20}$"),
		iban_country(
			"FR",
			"France",
			"EUR",
			"SEPA",
			"FR1420041010050500013M02606",
			r"^FR\d{12}[A-Z0-9]{11}\d{2}$",
		),
		iban_country("ES", "Spain", "EUR", "SEPA", "ES9121000418450200051332", r"^ES\d{22}$"),
		iban_country(
			"IT",
			"Italy",
			"EUR",
			"SEPA",
			"IT60X0542811101000000123456",
			r"^IT\d{2}[A-Z]\d{10}[A-Z0-9]{12}$",
		),
		iban_country("NL", "Netherlands", "EUR", "SEPA", "NL91ABNA0417164300", r"^NL\d{2}[A-Z]{4}\d{10}$"),
		iban_country("SE", "Sweden", "SEK", "Bankgirot", "SE4550000000058398257466", r"^SE\d{22}$"),
		iban_country(
			"CH",
			"Switzerland",
			"CHF",
			"SIC",
			"CH9300762011623852957",
			r"^CH\d{7}[A-Z0-9]{12}$",
		),
		iban_country(
			"AE",
			"United Arab Emirates",
			"AED",
			"UAEFTS",
			"AE070331234567890123456",
			r"^AE\d{21}$",
		),
		country(
			"IN",
			"India",
			"INR",
			"IMPS",
			Field("ifsc_code"),
			vec![
				required("account_number", "Account Number", "123456789012", r"^\d{9,18}$"),
				required("ifsc_code", "IFSC Code", "SBIN0001234", r"^[A-Z]{4}0[A-Z0-9]{6}$"),
			],
		),
		country(
			"NG",
			"Nigeria",
			"NGN",
			"NIP",
			Field("bank_code"),
			vec![
				required("account_number", "NUBAN Account Number", "0123456789", r"^\d{10}$"),
				required("bank_code", "Bank Code", "058", r"^\d{3}$"),
			],
		),
		country(
			"GH",
			"Ghana",
			"GHS",
			"GhIPSS",
			Field("bank_code"),
			vec![
				required("account_number", "Account Number", "1234567890123", r"^\d{10,16}$"),
				required("bank_code", "Bank Sort Code", "030100", r"^\d{6}$"),
			],
		),
		country(
			"KE",
			"Kenya",
			"KES",
			"PesaLink",
			Field("bank_code"),
			vec![
				required("account_number", "Account Number", "1234567890", r"^\d{10,14}$"),
				required("bank_code", "Bank Code", "01", r"^\d{2}$"),
			],
		),
		country(
			"ZA",
			"South Africa",
			"ZAR",
			"EFT",
			Field("branch_code"),
			vec![
				required("account_number", "Account Number", "1234567890", r"^\d{9,11}$"),
				required("branch_code", "Branch Code", "250655", r"^\d{6}$"),
			],
		),
		country(
			"JP",
			"Japan",
			"JPY",
			"Zengin",
			Joined(&["bank_code", "branch_code"]),
			vec![
				required("account_number", "Account Number", "1234567", r"^\d{7}$"),
				required("bank_code", "Bank Code", "0001", r"^\d{4}$"),
				required("branch_code", "Branch Code", "001", r"^\d{3}$"),
			],
		),
		country(
			"SG",
			"Singapore",
			"SGD",
			"FAST",
			Joined(&["bank_code", "branch_code"]),
			vec![
				required("account_number", "Account Number", "123456789", r"^\d{9,12}$"),
				required("bank_code", "Bank Code", "7171", r"^\d{4}$"),
				required("branch_code", "Branch Code", "001", r"^\d{3}$"),
			],
		),
		country(
			"BR",
			"Brazil",
			"BRL",
			"TED",
			Joined(&["bank_code", "branch_code"]),
			vec![
				required("account_number", "Account Number", "12345678", r"^\d{5,12}$"),
				required("bank_code", "Bank Code", "001", r"^\d{3}$"),
				required("branch_code", "Agency Number", "1234", r"^\d{4}$"),
			],
		),
		country(
			"MX",
			"Mexico",
			"MXN",
			"SPEI",
			None,
			vec![required("account_number", "CLABE", "032180000118359719", r"^\d{18}$")],
		),
		country(
			"HK",
			"Hong Kong",
			"HKD",
			"FPS",
			Joined(&["bank_code", "branch_code"]),
			vec![
				required("account_number", "Account Number", "123456789", r"^\d{6,9}$"),
				required("bank_code", "Bank Code", "004", r"^\d{3}$"),
				required("branch_code", "Branch Code", "123", r"^\d{3}$"),
			],
		),
	]
});

pub fn countries() -> &'static [CountryBanking] {
	&COUNTRIES
}

pub fn lookup(code: &str) -> Option<&'static CountryBanking> {
	let code = code.trim();
	COUNTRIES.iter().find(|c| c.code.eq_ignore_ascii_case(code))
}

pub fn is_supported_currency(currency: &str) -> bool {
	COUNTRIES.iter().any(|c| c.currency.eq_ignore_ascii_case(currency.trim()))
}

/// Raw bank form as posted by clients: a country plus whatever fields that country needs.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BankDetailsForm {
	#[serde(default)]
	pub country: String,
	#[serde(flatten)]
	pub fields: BTreeMap<String, serde_json::Value>,
}

impl BankDetailsForm {
	pub fn value(&self, name: &str) -> Option<String> {
		match self.fields.get(name)? {
			serde_json::Value::String(s) => Some(s.clone()),
			serde_json::Value::Number(n) => Some(n.to_string()),
			_ => None,
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FieldErrors(pub BTreeMap<String, String>);

impl FieldErrors {
	pub fn insert(&mut self, field: &str, message: String) {
		self.0.insert(field.to_string(), message);
	}

	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	pub fn get(&self, field: &str) -> Option<&str> {
		self.0.get(field).map(String::as_str)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedBankDetails {
	pub country: &'static str,
	pub currency: &'static str,
	pub banking_system: &'static str,
	pub account_holder_name: String,
	pub bank_name: String,
	pub account_type: String,
	pub account_number: String,
	pub routing_identifier: Option<String>,
	pub values: BTreeMap<String, String>,
}

fn normalize(field: &str, raw: &str) -> String {
	let trimmed = raw.trim();
	match field {
		"iban" => trimmed.chars().filter(|c| !c.is_whitespace()).collect::<String>().to_uppercase(),
		"ifsc_code" | "swift_code" => trimmed.to_uppercase(),
		"account_type" => trimmed.to_lowercase(),
		_ => trimmed.to_string(),
	}
}

/// ISO 13616 mod-97 check.
pub fn iban_checksum_valid(iban: &str) -> bool {
	if iban.len() < 5 || !iban.chars().all(|c| c.is_ascii_alphanumeric()) {
		return false;
	}
	let (head, tail) = iban.split_at(4);
	let mut remainder: u32 = 0;
	for c in tail.chars().chain(head.chars()) {
		remainder = match c.to_digit(36) {
			Some(v) if v < 10 => (remainder * 10 + v) % 97,
			Some(v) => (remainder * 100 + v) % 97,
			None => return false,
		};
	}
	remainder == 1
}

pub fn validate(form: &BankDetailsForm) -> Result<ValidatedBankDetails, FieldErrors> {
	let mut errors = FieldErrors::default();
	let Some(country) = lookup(&form.country) else {
		errors.insert("country", "Unsupported country".to_string());
		return Err(errors);
	};

	let mut values = BTreeMap::new();
	for spec in &country.fields {
		let value = form.value(spec.name).map(|raw| normalize(spec.name, &raw)).unwrap_or_default();
		if value.is_empty() {
			if spec.required {
				errors.insert(spec.name, format!("{} is required", spec.label));
			}
			continue;
		}
		let pattern_ok = spec.pattern.as_ref().map_or(true, |p| p.is_match(&value));
		let checksum_ok = spec.name != "iban" || iban_checksum_valid(&value);
		if !pattern_ok || !checksum_ok {
			errors.insert(spec.name, format!("Invalid {}", spec.label));
			continue;
		}
		values.insert(spec.name.to_string(), value);
	}

	if !errors.is_empty() {
		return Err(errors);
	}

	let take = |name: &str| values.get(name).cloned().unwrap_or_default();
	Ok(ValidatedBankDetails {
		country: country.code,
		currency: country.currency,
		banking_system: country.banking_system,
		account_holder_name: take("account_holder_name"),
		bank_name: take("bank_name"),
		account_type: take("account_type"),
		account_number: take(country.account_field),
		routing_identifier: resolve_routing_identifier(country, &values),
		values,
	})
}

pub fn resolve_routing_identifier(
	country: &CountryBanking,
	values: &BTreeMap<String, String>,
) -> Option<String> {
	match country.routing {
		RoutingSource::Field(name) => values.get(name).cloned(),
		RoutingSource::Joined(names) => {
			let parts: Option<Vec<&str>> =
				names.iter().map(|n| values.get(*n).map(String::as_str)).collect();
			parts.map(|p| p.join("-"))
		},
		RoutingSource::CanadianElectronic => {
			let institution = values.get("institution_number")?;
			let transit = values.get("transit_number")?;
			Some(format!("0{institution}{transit}"))
		},
		RoutingSource::None => None,
	}
}

pub fn mask(value: &str) -> String {
	let chars: Vec<char> = value.chars().collect();
	if chars.len() <= 4 {
		return "•".repeat(chars.len());
	}
	let tail: String = chars[chars.len() - 4..].iter().collect();
	format!("••••{tail}")
}
