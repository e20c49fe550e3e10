use crate::{Value, ValueKind};

/// A precompiled category pattern over [`ValueKind`]s.
///
/// Parsed from a `|`-delimited, case-insensitive list of category names
/// (`"map|seq"`, `"function"`, ...). Unknown names contribute nothing, so a
/// pattern made only of unknown names matches no value. Parsing and matching
/// never fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TypePattern {
	kinds: u16,
}

impl TypePattern {
	/// Compiles a pattern from a category name list.
	pub fn parse(pattern: &str) -> TypePattern {
		let mut compiled = TypePattern::default();
		for name in pattern.split('|') {
			if let Some(kind) = ValueKind::from_name(name) {
				compiled = compiled.with(kind);
			}
		}
		compiled
	}

	/// Adds a category to the pattern.
	pub fn with(mut self, kind: ValueKind) -> TypePattern {
		self.kinds |= 1 << kind as u16;
		self
	}

	/// Returns true if the value's category is in the pattern.
	pub fn matches(&self, value: &Value) -> bool {
		self.kinds & (1 << value.kind() as u16) != 0
	}

	/// One-shot form: compile `pattern` and match `value` against it.
	pub fn matches_str(value: &Value, pattern: &str) -> bool {
		TypePattern::parse(pattern).matches(value)
	}
}
