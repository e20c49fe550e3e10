use crate::{Callable, MemberTable, NodeId};

/// A dynamic member value.
///
/// Everything a namespace member can hold: primitives, ordered sequences,
/// member tables, callables, and references to declared nodes. Equality is
/// structural for data and identity for callables.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Value {
	/// The absent value.
	#[default]
	Null,
	/// Boolean value (true/false).
	Bool(bool),
	/// Numeric value.
	Number(f64),
	/// Text value.
	Text(String),
	/// Ordered sequence of values.
	Seq(Vec<Value>),
	/// Member table (nested structure).
	Map(MemberTable),
	/// Named callable.
	Callable(Callable),
	/// Reference to a declared namespace node.
	Node(NodeId),
}

impl Value {
	/// Returns the runtime category of this value.
	pub fn kind(&self) -> ValueKind {
		match self {
			Value::Null => ValueKind::Null,
			Value::Bool(_) => ValueKind::Bool,
			Value::Number(_) => ValueKind::Number,
			Value::Text(_) => ValueKind::Text,
			Value::Seq(_) => ValueKind::Seq,
			Value::Map(_) => ValueKind::Map,
			Value::Callable(_) => ValueKind::Callable,
			Value::Node(_) => ValueKind::Node,
		}
	}

	/// Returns the category name of this value.
	pub fn type_name(&self) -> &'static str {
		self.kind().name()
	}

	/// Returns true if this is the `Null` variant.
	pub fn is_null(&self) -> bool {
		matches!(self, Value::Null)
	}

	/// Returns the boolean value if this is a `Bool` variant.
	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Value::Bool(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the numeric value if this is a `Number` variant.
	pub fn as_number(&self) -> Option<f64> {
		match self {
			Value::Number(v) => Some(*v),
			_ => None,
		}
	}

	/// Returns the text value if this is a `Text` variant.
	pub fn as_text(&self) -> Option<&str> {
		match self {
			Value::Text(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the sequence if this is a `Seq` variant.
	pub fn as_seq(&self) -> Option<&[Value]> {
		match self {
			Value::Seq(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the member table if this is a `Map` variant.
	pub fn as_map(&self) -> Option<&MemberTable> {
		match self {
			Value::Map(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the callable if this is a `Callable` variant.
	pub fn as_callable(&self) -> Option<&Callable> {
		match self {
			Value::Callable(v) => Some(v),
			_ => None,
		}
	}

	/// Returns the node id if this is a `Node` variant.
	pub fn as_node(&self) -> Option<NodeId> {
		match self {
			Value::Node(v) => Some(*v),
			_ => None,
		}
	}
}

impl From<bool> for Value {
	fn from(v: bool) -> Self {
		Value::Bool(v)
	}
}

impl From<f64> for Value {
	fn from(v: f64) -> Self {
		Value::Number(v)
	}
}

impl From<i64> for Value {
	fn from(v: i64) -> Self {
		Value::Number(v as f64)
	}
}

impl From<&str> for Value {
	fn from(v: &str) -> Self {
		Value::Text(v.to_string())
	}
}

impl From<String> for Value {
	fn from(v: String) -> Self {
		Value::Text(v)
	}
}

impl From<Vec<Value>> for Value {
	fn from(v: Vec<Value>) -> Self {
		Value::Seq(v)
	}
}

impl From<MemberTable> for Value {
	fn from(v: MemberTable) -> Self {
		Value::Map(v)
	}
}

impl From<Callable> for Value {
	fn from(v: Callable) -> Self {
		Value::Callable(v)
	}
}

impl From<NodeId> for Value {
	fn from(v: NodeId) -> Self {
		Value::Node(v)
	}
}

/// The runtime category of a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
	/// The absent value.
	Null,
	/// Boolean.
	Bool,
	/// Numeric.
	Number,
	/// Text.
	Text,
	/// Ordered sequence.
	Seq,
	/// Member table.
	Map,
	/// Named callable.
	Callable,
	/// Namespace node reference.
	Node,
}

impl ValueKind {
	/// Returns the canonical name of this category.
	pub fn name(self) -> &'static str {
		match self {
			ValueKind::Null => "null",
			ValueKind::Bool => "bool",
			ValueKind::Number => "number",
			ValueKind::Text => "string",
			ValueKind::Seq => "seq",
			ValueKind::Map => "map",
			ValueKind::Callable => "callable",
			ValueKind::Node => "node",
		}
	}

	/// Looks up a category by name, case-insensitively.
	///
	/// Accepts the canonical names plus host-runtime-flavored aliases
	/// ("object" for map, "array" for seq, "function" for callable).
	pub fn from_name(name: &str) -> Option<ValueKind> {
		const NAMES: &[(&str, ValueKind)] = &[
			("null", ValueKind::Null),
			("bool", ValueKind::Bool),
			("boolean", ValueKind::Bool),
			("number", ValueKind::Number),
			("string", ValueKind::Text),
			("text", ValueKind::Text),
			("seq", ValueKind::Seq),
			("array", ValueKind::Seq),
			("map", ValueKind::Map),
			("object", ValueKind::Map),
			("callable", ValueKind::Callable),
			("function", ValueKind::Callable),
			("node", ValueKind::Node),
		];
		let name = name.trim();
		NAMES
			.iter()
			.find(|(n, _)| name.eq_ignore_ascii_case(n))
			.map(|(_, kind)| *kind)
	}
}

impl std::fmt::Display for ValueKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(self.name())
	}
}
