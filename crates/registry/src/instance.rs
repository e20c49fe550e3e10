//! Instances of node behavior descriptors.
//!
//! Member lookup on an instance checks its own members first, then walks the
//! explicit delegation chain: the node's instance surface, each ancestor's
//! surface, and finally the root capability surface.

use arbor_primitives::{MemberTable, NodeId, Slot, Value};

use crate::node::NodeRef;
use crate::registry::Registry;

/// An instance of a node's behavior descriptor.
pub struct Instance<'r> {
	registry: &'r Registry,
	node: NodeId,
	members: MemberTable,
}

impl<'r> Instance<'r> {
	/// Invokes the node's descriptor and wraps the result. The descriptor
	/// runs outside the registry lock; a `Map` return value becomes the
	/// instance's own members.
	pub(crate) fn create(node: NodeRef<'r>, args: &[Value]) -> Instance<'r> {
		let descriptor = node.descriptor();
		let members = match descriptor.call(args) {
			Value::Map(table) => table,
			_ => MemberTable::new(),
		};
		Instance {
			registry: node.registry,
			node: node.id,
			members,
		}
	}

	/// Returns the node this instance was created from.
	pub fn node(&self) -> NodeRef<'r> {
		NodeRef {
			registry: self.registry,
			id: self.node,
		}
	}

	/// Returns the immediate parent node, for explicit upward delegation.
	pub fn parent_node(&self) -> Option<NodeRef<'r>> {
		self.node().parent()
	}

	/// Returns the instance's own member table.
	pub fn members(&self) -> &MemberTable {
		&self.members
	}

	/// Sets an own member with assignment semantics.
	pub fn set(&mut self, key: &str, value: impl Into<Value>) {
		self.members.set(key, value);
	}

	/// Reads a member: own members first, then the surface chain. Getters
	/// run outside the registry lock.
	pub fn get(&self, key: &str) -> Option<Value> {
		if let Some(slot) = self.members.get(key) {
			return Some(slot.read());
		}
		let slot = self.find_surface_slot(key)?;
		Some(slot.read())
	}

	fn find_surface_slot(&self, key: &str) -> Option<Slot> {
		let inner = self.registry.read_inner();
		let mut cursor = Some(self.node);
		while let Some(id) = cursor {
			let node = inner.node(id)?;
			if let Some(slot) = node.surface.get(key) {
				return Some(slot.clone());
			}
			cursor = node.parent;
		}
		inner.root.surface.get(key).cloned()
	}

	/// Copies the own members of an instance of an ancestor (or this same)
	/// node into this instance, keeping members already present. Returns
	/// false, doing nothing, for unrelated lineages or foreign registries.
	pub fn adopt(&mut self, source: &Instance<'_>) -> bool {
		if !std::ptr::eq(self.registry, source.registry) || !self.descends_from(source.node) {
			return false;
		}
		for (key, slot) in source.members.enumerable() {
			if !self.members.contains(key) {
				self.members.put(key, slot.clone());
			}
		}
		true
	}

	fn descends_from(&self, ancestor: NodeId) -> bool {
		let inner = self.registry.read_inner();
		let mut cursor = Some(self.node);
		while let Some(id) = cursor {
			if id == ancestor {
				return true;
			}
			cursor = inner.node(id).and_then(|n| n.parent);
		}
		false
	}
}

impl std::fmt::Debug for Instance<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Instance")
			.field("node", &self.node())
			.field("members", &self.members.len())
			.finish()
	}
}
