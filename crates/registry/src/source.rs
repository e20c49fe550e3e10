//! Merge sources and the variadic argument classifier.

use arbor_primitives::{AttrDescriptor, MemberTable, NodeId, Slot, Value};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::version::VersionTag;

/// One member offered to the merge engine.
#[derive(Debug, Clone, PartialEq)]
pub enum Member {
	/// Copy this slot shape (payload and attributes) into the target.
	Copy(Slot),
	/// Apply as an explicit definition under the descriptor-based
	/// operations; copied as a plain value otherwise.
	Define(AttrDescriptor),
}

/// An ordered set of named members to merge into a node.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MemberSource {
	members: IndexMap<Box<str>, Member, FxBuildHasher>,
}

impl MemberSource {
	/// Creates an empty source.
	pub fn new() -> MemberSource {
		MemberSource::default()
	}

	/// Adds a plain value member.
	pub fn with(mut self, key: impl Into<Box<str>>, value: impl Into<Value>) -> MemberSource {
		self.members.insert(key.into(), Member::Copy(Slot::assigned(value)));
		self
	}

	/// Adds a member copying an exact slot shape.
	pub fn with_slot(mut self, key: impl Into<Box<str>>, slot: Slot) -> MemberSource {
		self.members.insert(key.into(), Member::Copy(slot));
		self
	}

	/// Adds an explicit definition member.
	pub fn define(mut self, key: impl Into<Box<str>>, desc: AttrDescriptor) -> MemberSource {
		self.members.insert(key.into(), Member::Define(desc));
		self
	}

	/// Inserts a member.
	pub fn insert(&mut self, key: impl Into<Box<str>>, member: Member) {
		self.members.insert(key.into(), member);
	}

	/// Returns the member under `key`, if any.
	pub fn get(&self, key: &str) -> Option<&Member> {
		self.members.get(key)
	}

	/// Returns the number of members.
	pub fn len(&self) -> usize {
		self.members.len()
	}

	/// Returns true if the source has no members.
	pub fn is_empty(&self) -> bool {
		self.members.is_empty()
	}

	/// Iterates members in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Member)> {
		self.members.iter().map(|(k, v)| (k.as_ref(), v))
	}
}

impl From<MemberTable> for MemberSource {
	/// Extracts the table's enumerable slots, attributes intact.
	fn from(table: MemberTable) -> MemberSource {
		let mut source = MemberSource::new();
		for (key, slot) in table.enumerable() {
			source.members.insert(key.into(), Member::Copy(slot.clone()));
		}
		source
	}
}

impl<K: Into<Box<str>>, V: Into<Value>> FromIterator<(K, V)> for MemberSource {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> MemberSource {
		let mut source = MemberSource::new();
		for (key, value) in iter {
			source.members.insert(key.into(), Member::Copy(Slot::assigned(value)));
		}
		source
	}
}

/// One argument to a merge operation.
///
/// Mirrors the variadic call shape: sources are queued in call order, the
/// first text- or number-shaped argument becomes the version token, and
/// anything else is skipped without an error.
#[derive(Debug, Clone)]
pub enum MergeArg {
	/// A set of members to merge.
	Source(MemberSource),
	/// An explicit version token.
	Version(VersionTag),
	/// A dynamic value, classified by shape.
	Value(Value),
}

impl From<MemberSource> for MergeArg {
	fn from(source: MemberSource) -> Self {
		MergeArg::Source(source)
	}
}

impl From<VersionTag> for MergeArg {
	fn from(version: VersionTag) -> Self {
		MergeArg::Version(version)
	}
}

impl From<Value> for MergeArg {
	fn from(value: Value) -> Self {
		MergeArg::Value(value)
	}
}

impl From<MemberTable> for MergeArg {
	fn from(table: MemberTable) -> Self {
		MergeArg::Source(table.into())
	}
}

impl From<f64> for MergeArg {
	fn from(v: f64) -> Self {
		MergeArg::Version(VersionTag::Number(v))
	}
}

impl From<i64> for MergeArg {
	fn from(v: i64) -> Self {
		MergeArg::Version(VersionTag::Number(v as f64))
	}
}

impl From<&str> for MergeArg {
	fn from(v: &str) -> Self {
		MergeArg::Version(VersionTag::Text(v.to_string()))
	}
}

/// A queued merge source: inline members, or a node whose own enumerable
/// members are extracted at merge time.
#[derive(Debug, Clone)]
pub(crate) enum SourceSet {
	Inline(MemberSource),
	Node(NodeId),
}

/// Classified merge arguments.
#[derive(Debug, Clone, Default)]
pub(crate) struct ClassifiedArgs {
	pub(crate) sources: Vec<SourceSet>,
	pub(crate) version: Option<VersionTag>,
}

/// Scans a merge argument list: map-, node-, and callable-shaped values are
/// queued as sources in call order (callables enumerate no members and so
/// contribute nothing); the first text or number value is the version token.
/// Everything else is skipped.
pub(crate) fn classify(args: impl IntoIterator<Item = MergeArg>) -> ClassifiedArgs {
	let mut classified = ClassifiedArgs::default();
	for arg in args {
		match arg {
			MergeArg::Source(source) => classified.sources.push(SourceSet::Inline(source)),
			MergeArg::Version(version) => {
				if classified.version.is_none() {
					classified.version = Some(version);
				} else {
					tracing::trace!(%version, "extra version token ignored");
				}
			}
			MergeArg::Value(value) => match value {
				Value::Map(table) => classified.sources.push(SourceSet::Inline(table.into())),
				Value::Node(id) => classified.sources.push(SourceSet::Node(id)),
				Value::Callable(c) => {
					tracing::trace!(name = c.name(), "callable source has no members; skipped");
				}
				Value::Text(s) if classified.version.is_none() => {
					classified.version = Some(VersionTag::Text(s));
				}
				Value::Number(n) if classified.version.is_none() => {
					classified.version = Some(VersionTag::Number(n));
				}
				other => {
					tracing::trace!(kind = other.type_name(), "merge argument ignored");
				}
			},
		}
	}
	classified
}
