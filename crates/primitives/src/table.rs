use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::{AttrDescriptor, Attributes, Callable, Value, ValueKind};

/// Storage payload of a member slot.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotData {
	/// A data member.
	Value(Value),
	/// An accessor member; reads go through `get`.
	Accessor {
		/// Getter invoked on reads.
		get: Option<Callable>,
		/// Setter invoked on writes.
		set: Option<Callable>,
	},
}

/// A single member: payload plus attributes.
#[derive(Debug, Clone, PartialEq)]
pub struct Slot {
	/// Data or accessor payload.
	pub data: SlotData,
	/// Visibility and mutability attributes.
	pub attrs: Attributes,
}

impl Slot {
	/// Slot produced by plain assignment: full attributes.
	pub fn assigned(value: impl Into<Value>) -> Slot {
		Slot {
			data: SlotData::Value(value.into()),
			attrs: Attributes::ASSIGNED,
		}
	}

	/// Slot produced by applying an explicit definition.
	pub fn defined(desc: &AttrDescriptor) -> Slot {
		let data = if desc.is_accessor() {
			SlotData::Accessor {
				get: desc.get.clone(),
				set: desc.set.clone(),
			}
		} else {
			SlotData::Value(desc.value.clone().unwrap_or_default())
		};
		Slot {
			data,
			attrs: desc.attrs,
		}
	}

	/// Returns true if the member is visible to source enumeration.
	pub fn is_enumerable(&self) -> bool {
		self.attrs.contains(Attributes::ENUMERABLE)
	}

	/// Returns true if the member may be redefined or overwritten.
	pub fn is_configurable(&self) -> bool {
		self.attrs.contains(Attributes::CONFIGURABLE)
	}

	/// Reads the slot: clones the value, or invokes the getter with no
	/// arguments. An accessor without a getter reads as [`Value::Null`].
	pub fn read(&self) -> Value {
		match &self.data {
			SlotData::Value(v) => v.clone(),
			SlotData::Accessor { get: Some(g), .. } => g.call(&[]),
			SlotData::Accessor { get: None, .. } => Value::Null,
		}
	}

	/// The slot's own attribute descriptor, the copy shape merges use.
	pub fn to_descriptor(&self) -> AttrDescriptor {
		let mut desc = AttrDescriptor::new();
		desc.attrs = self.attrs;
		match &self.data {
			SlotData::Value(v) => desc.value = Some(v.clone()),
			SlotData::Accessor { get, set } => {
				desc.get = get.clone();
				desc.set = set.clone();
			}
		}
		desc
	}

	/// The category of the slot's payload; accessors report as callable.
	pub fn value_kind(&self) -> ValueKind {
		match &self.data {
			SlotData::Value(v) => v.kind(),
			SlotData::Accessor { .. } => ValueKind::Callable,
		}
	}
}

/// An insertion-ordered member table.
///
/// Iteration follows insertion order, which makes merge results and source
/// enumeration deterministic.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MemberTable {
	slots: IndexMap<Box<str>, Slot, FxBuildHasher>,
}

impl MemberTable {
	/// Creates an empty table.
	pub fn new() -> MemberTable {
		MemberTable::default()
	}

	/// Returns the number of members.
	pub fn len(&self) -> usize {
		self.slots.len()
	}

	/// Returns true if the table has no members.
	pub fn is_empty(&self) -> bool {
		self.slots.is_empty()
	}

	/// Returns true if the table owns a member under `key`.
	pub fn contains(&self, key: &str) -> bool {
		self.slots.contains_key(key)
	}

	/// Returns the slot under `key`, if any.
	pub fn get(&self, key: &str) -> Option<&Slot> {
		self.slots.get(key)
	}

	/// Returns the slot under `key` mutably, if any.
	pub fn get_mut(&mut self, key: &str) -> Option<&mut Slot> {
		self.slots.get_mut(key)
	}

	/// Plain assignment: writes a data slot with full attributes.
	pub fn set(&mut self, key: impl Into<Box<str>>, value: impl Into<Value>) {
		self.slots.insert(key.into(), Slot::assigned(value));
	}

	/// Writes a slot verbatim.
	pub fn put(&mut self, key: impl Into<Box<str>>, slot: Slot) {
		self.slots.insert(key.into(), slot);
	}

	/// Applies an explicit definition under `key`.
	pub fn define(&mut self, key: impl Into<Box<str>>, desc: &AttrDescriptor) {
		self.slots.insert(key.into(), Slot::defined(desc));
	}

	/// Reads the member under `key`, invoking getters.
	pub fn read(&self, key: &str) -> Option<Value> {
		self.slots.get(key).map(Slot::read)
	}

	/// Chainable assignment, for building nested structures.
	pub fn with(mut self, key: impl Into<Box<str>>, value: impl Into<Value>) -> MemberTable {
		self.set(key, value);
		self
	}

	/// Iterates all members in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Slot)> {
		self.slots.iter().map(|(k, v)| (k.as_ref(), v))
	}

	/// Iterates enumerable members only, the surface merge sources see.
	pub fn enumerable(&self) -> impl Iterator<Item = (&str, &Slot)> {
		self.iter().filter(|(_, slot)| slot.is_enumerable())
	}

	/// Iterates member names in insertion order.
	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.slots.keys().map(|k| k.as_ref())
	}
}

impl<K: Into<Box<str>>, V: Into<Value>> FromIterator<(K, V)> for MemberTable {
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> MemberTable {
		let mut table = MemberTable::new();
		for (key, value) in iter {
			table.set(key, value);
		}
		table
	}
}
