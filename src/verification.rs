use crate::models::{DocumentUpload, ProviderProfile};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::{collections::BTreeMap, str::FromStr};

pub const REQUIRED_DOCUMENT_TYPES: &[&str] = &["government_id", "selfie"];
pub const DOCUMENT_TYPES: &[&str] =
	&["government_id", "selfie", "proof_of_address", "business_license", "certification", "other"];
pub const MIN_VERIFIED_RATING: f64 = 4.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prerequisite {
	pub met: bool,
	pub value: Value,
	pub required: Value,
	pub description: String,
	pub blocking: bool,
}

/// Counts gathered from the provider's rows.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ProviderStats {
	pub active_offerings: i64,
	pub portfolio_items: i64,
	pub has_connect_account: bool,
}

pub type Prerequisites = BTreeMap<&'static str, Prerequisite>;

pub fn profile_complete(profile: &ProviderProfile) -> bool {
	let filled = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.trim().is_empty());
	!profile.display_name.trim().is_empty()
		&& filled(&profile.headline)
		&& filled(&profile.bio)
		&& !profile.categories.is_empty()
}

pub fn prerequisites(profile: &ProviderProfile, stats: ProviderStats) -> Prerequisites {
	let mut out = BTreeMap::new();
	let complete = profile_complete(profile);
	out.insert(
		"profileComplete",
		Prerequisite {
			met: complete,
			value: json!(complete),
			required: json!(true),
			description: "Add a display name, headline, bio and at least one category.".into(),
			blocking: true,
		},
	);
	out.insert(
		"offeringsPublished",
		Prerequisite {
			met: stats.active_offerings >= 1,
			value: json!(stats.active_offerings),
			required: json!(1),
			description: "Publish at least one active service offering.".into(),
			blocking: true,
		},
	);
	out.insert(
		"portfolioItems",
		Prerequisite {
			met: stats.portfolio_items >= 1,
			value: json!(stats.portfolio_items),
			required: json!(1),
			description: "Showcase at least one portfolio item.".into(),
			blocking: true,
		},
	);
	out.insert(
		"connectAccount",
		Prerequisite {
			met: stats.has_connect_account,
			value: json!(stats.has_connect_account),
			required: json!(true),
			description: "Connect a payout account with Stripe.".into(),
			blocking: true,
		},
	);
	out.insert(
		"completedBookings",
		Prerequisite {
			met: profile.completed_booking_count >= 1,
			value: json!(profile.completed_booking_count),
			required: json!(1),
			description: "Complete at least one booking on the platform.".into(),
			blocking: false,
		},
	);
	let rating_ok = profile.review_count == 0
		|| profile.average_rating.is_some_and(|r| r >= MIN_VERIFIED_RATING);
	out.insert(
		"averageRating",
		Prerequisite {
			met: rating_ok,
			value: json!(profile.average_rating),
			required: json!(MIN_VERIFIED_RATING),
			description: "Keep an average rating of 4.0 or higher.".into(),
			blocking: false,
		},
	);
	out
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnmetPrerequisite {
	pub key: String,
	pub description: String,
	pub value: Value,
	pub required: Value,
}

pub fn unmet_blocking(prereqs: &Prerequisites) -> Vec<UnmetPrerequisite> {
	prereqs
		.iter()
		.filter(|(_, p)| p.blocking && !p.met)
		.map(|(k, p)| UnmetPrerequisite {
			key: k.to_string(),
			description: p.description.clone(),
			value: p.value.clone(),
			required: p.required.clone(),
		})
		.collect()
}

pub fn automated_checks(prereqs: &Prerequisites) -> Value {
	serde_json::to_value(prereqs).unwrap_or(Value::Null)
}

pub fn check_documents(documents: &[DocumentUpload]) -> Result<(), String> {
	if documents.is_empty() {
		return Err("Verification documents are required".to_string());
	}
	if let Some(bad) = documents.iter().find(|d| !DOCUMENT_TYPES.contains(&d.doc_type.as_str())) {
		return Err(format!("Unknown document type: {}", bad.doc_type));
	}
	let missing = REQUIRED_DOCUMENT_TYPES.iter().find(|required| {
		!documents.iter().any(|d| d.doc_type == **required && !d.storage_path.trim().is_empty())
	});
	match missing {
		Some(doc) => Err(format!("Missing required document: {doc}")),
		None => Ok(()),
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
	Approve,
	Reject,
}

impl Decision {
	pub fn request_status(&self) -> &'static str {
		match self {
			Decision::Approve => "approved",
			Decision::Reject => "rejected",
		}
	}
}

impl FromStr for Decision {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim() {
			"approve" => Ok(Decision::Approve),
			"reject" => Ok(Decision::Reject),
			other => Err(format!("Invalid decision: {other}")),
		}
	}
}
