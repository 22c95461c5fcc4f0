use thiserror::Error;

/// Fatal defects in a snapshot, detected once at load time.
///
/// Any of these blocks entry to the interactive view; the fix is a
/// corrected re-upload, so every variant names the offending record.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum DataIntegrityError {
	#[error("duplicate account id `{0}` in snapshot")]
	DuplicateNode(String),

	#[error("transaction `{origin}` -> `{target}` references unknown account `{missing}`")]
	UnresolvedEndpoint {
		origin: String,
		target: String,
		missing: String,
	},

	#[error("transaction `{origin}` -> `{target}` has non-positive amount {amount}")]
	NonPositiveAmount {
		origin: String,
		target: String,
		amount: f64,
	},

	#[error("suspicion score {score} for account `{account}` is outside 0..=100")]
	ScoreOutOfRange { account: String, score: i64 },

	#[error("account `{account}` has a negative {direction} total of {amount}")]
	NegativeFlow {
		account: String,
		direction: &'static str,
		amount: f64,
	},

	#[error("ring `{0}` has no member accounts")]
	EmptyRing(String),

	#[error("ring `{ring}` lists member `{account}` which is missing from the snapshot")]
	UnknownMember { ring: String, account: String },

	#[error("ring `{ring}` lists `{account}` as a member, but the account does not carry the ring id")]
	MembershipMismatch { ring: String, account: String },

	#[error("account `{account}` carries ring id `{ring}`, but no such ring lists it as a member")]
	DanglingRingId { ring: String, account: String },
}

/// Everything that can go wrong while loading an analysis from the
/// detection service.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum LoadError {
	#[error("detection service unreachable: {0}")]
	Http(String),

	#[error("detection service returned a malformed response: {0}")]
	Decode(String),

	#[error(transparent)]
	Integrity(#[from] DataIntegrityError),
}
