use std::cmp::Ordering;

/// A caller-supplied ordering token gating member overrides.
///
/// `Unset` is the sentinel a node starts with; it sorts below every real tag
/// so the first real version always wins against an unversioned node. The
/// order is total: numbers sort below texts, numbers compare by
/// `f64::total_cmp`, texts lexicographically.
#[derive(Debug, Clone, Default)]
pub enum VersionTag {
	/// No version recorded yet.
	#[default]
	Unset,
	/// Numeric tag.
	Number(f64),
	/// Textual tag.
	Text(String),
}

impl VersionTag {
	/// Returns true if this is the unset sentinel.
	pub fn is_unset(&self) -> bool {
		matches!(self, VersionTag::Unset)
	}
}

impl Ord for VersionTag {
	fn cmp(&self, other: &Self) -> Ordering {
		use VersionTag::{Number, Text, Unset};
		match (self, other) {
			(Unset, Unset) => Ordering::Equal,
			(Unset, _) => Ordering::Less,
			(_, Unset) => Ordering::Greater,
			(Number(a), Number(b)) => a.total_cmp(b),
			(Number(_), Text(_)) => Ordering::Less,
			(Text(_), Number(_)) => Ordering::Greater,
			(Text(a), Text(b)) => a.cmp(b),
		}
	}
}

impl PartialOrd for VersionTag {
	fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
		Some(self.cmp(other))
	}
}

impl PartialEq for VersionTag {
	fn eq(&self, other: &Self) -> bool {
		self.cmp(other) == Ordering::Equal
	}
}

impl Eq for VersionTag {}

impl From<f64> for VersionTag {
	fn from(v: f64) -> Self {
		VersionTag::Number(v)
	}
}

impl From<i64> for VersionTag {
	fn from(v: i64) -> Self {
		VersionTag::Number(v as f64)
	}
}

impl From<&str> for VersionTag {
	fn from(v: &str) -> Self {
		VersionTag::Text(v.to_string())
	}
}

impl From<String> for VersionTag {
	fn from(v: String) -> Self {
		VersionTag::Text(v)
	}
}

impl std::fmt::Display for VersionTag {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			VersionTag::Unset => f.write_str("unset"),
			VersionTag::Number(n) => write!(f, "{n}"),
			VersionTag::Text(s) => f.write_str(s),
		}
	}
}
