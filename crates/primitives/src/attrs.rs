use crate::{Callable, MemberTable, Value};

bitflags::bitflags! {
	/// Visibility and mutability attributes of a member slot.
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	pub struct Attributes: u8 {
		/// The member is visible to source enumeration.
		const ENUMERABLE = 1 << 0;
		/// The member's value may be reassigned.
		const WRITABLE = 1 << 1;
		/// The member may be redefined or overwritten.
		const CONFIGURABLE = 1 << 2;
	}
}

impl Attributes {
	/// Attributes produced by plain assignment.
	pub const ASSIGNED: Attributes = Attributes::all();
	/// Attributes of an explicit definition that requests nothing.
	pub const DEFINED: Attributes = Attributes::empty();
}

impl Default for Attributes {
	fn default() -> Self {
		Attributes::ASSIGNED
	}
}

/// An explicit property definition: a value or an accessor pair, plus the
/// attributes the defined slot will carry.
///
/// This is the structured replacement for sniffing descriptor-shaped maps: a
/// member is either a plain value or an `AttrDescriptor`, and the
/// descriptor-based merge operations apply the latter as definitions.
/// Attributes default to [`Attributes::DEFINED`]; each one must be requested
/// explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct AttrDescriptor {
	/// Data payload of the defined slot.
	pub value: Option<Value>,
	/// Getter invoked on reads.
	pub get: Option<Callable>,
	/// Setter invoked on writes.
	pub set: Option<Callable>,
	/// Attributes of the defined slot.
	pub attrs: Attributes,
}

impl Default for AttrDescriptor {
	fn default() -> Self {
		AttrDescriptor {
			value: None,
			get: None,
			set: None,
			attrs: Attributes::DEFINED,
		}
	}
}

impl AttrDescriptor {
	/// Creates an empty definition.
	pub fn new() -> AttrDescriptor {
		AttrDescriptor::default()
	}

	/// Sets the data payload.
	pub fn with_value(mut self, value: impl Into<Value>) -> AttrDescriptor {
		self.value = Some(value.into());
		self
	}

	/// Sets the getter.
	pub fn with_get(mut self, get: Callable) -> AttrDescriptor {
		self.get = Some(get);
		self
	}

	/// Sets the setter.
	pub fn with_set(mut self, set: Callable) -> AttrDescriptor {
		self.set = Some(set);
		self
	}

	/// Requests or clears the ENUMERABLE attribute.
	pub fn enumerable(mut self, on: bool) -> AttrDescriptor {
		self.attrs.set(Attributes::ENUMERABLE, on);
		self
	}

	/// Requests or clears the WRITABLE attribute.
	pub fn writable(mut self, on: bool) -> AttrDescriptor {
		self.attrs.set(Attributes::WRITABLE, on);
		self
	}

	/// Requests or clears the CONFIGURABLE attribute.
	pub fn configurable(mut self, on: bool) -> AttrDescriptor {
		self.attrs.set(Attributes::CONFIGURABLE, on);
		self
	}

	/// Returns true if this definition carries an accessor.
	pub fn is_accessor(&self) -> bool {
		self.get.is_some() || self.set.is_some()
	}

	/// Renders the definition as a plain map value.
	///
	/// Non-descriptor merges copy definition-tagged members as values; this
	/// is the shape they receive.
	pub fn to_value(&self) -> Value {
		let mut map = MemberTable::new();
		if let Some(value) = &self.value {
			map.set("value", value.clone());
		}
		if let Some(get) = &self.get {
			map.set("get", get.clone());
		}
		if let Some(set) = &self.set {
			map.set("set", set.clone());
		}
		map.set("enumerable", self.attrs.contains(Attributes::ENUMERABLE));
		map.set("writable", self.attrs.contains(Attributes::WRITABLE));
		map.set("configurable", self.attrs.contains(Attributes::CONFIGURABLE));
		Value::Map(map)
	}
}
