//! Namespace nodes and their public handle.

use arbor_primitives::{Callable, MemberTable, NodeId, Value};

use crate::Result;
use crate::instance::Instance;
use crate::merge::TableAddr;
use crate::registry::Registry;
use crate::source::{MergeArg, classify};
use crate::version::VersionTag;

/// Where a node's capability lookup continues.
///
/// Every chain terminates at [`Supertype::Root`], the shared root
/// capability; nodes only ever point at already-existing ancestors, so the
/// chain cannot cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Supertype {
	/// The shared root capability.
	Root,
	/// The immediate parent node.
	Node(NodeId),
}

/// Internal state of one namespace node. Set once at creation; the tree is
/// append-only.
pub(crate) struct NodeState {
	pub(crate) name: Box<str>,
	pub(crate) path: Box<str>,
	pub(crate) parent: Option<NodeId>,
	pub(crate) supertype: Supertype,
	pub(crate) own: MemberTable,
	pub(crate) surface: MemberTable,
	pub(crate) descriptor: Callable,
	pub(crate) version: VersionTag,
}

/// Handle to a declared namespace node.
///
/// Handles are identity: two `declare` calls for the same path return equal
/// handles addressing the same state. All mutation goes through the four
/// merge operations, which serialize on the owning registry's lock.
#[derive(Clone, Copy)]
pub struct NodeRef<'r> {
	pub(crate) registry: &'r Registry,
	pub(crate) id: NodeId,
}

impl PartialEq for NodeRef<'_> {
	fn eq(&self, other: &Self) -> bool {
		std::ptr::eq(self.registry, other.registry) && self.id == other.id
	}
}

impl Eq for NodeRef<'_> {}

impl std::fmt::Debug for NodeRef<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("Node").field(&self.path()).finish()
	}
}

impl std::fmt::Display for NodeRef<'_> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.path())
	}
}

impl<'r> NodeRef<'r> {
	/// Returns the node's id.
	pub fn id(&self) -> NodeId {
		self.id
	}

	/// Returns the path segment this node was declared under.
	pub fn name(&self) -> String {
		self.registry
			.with_node(self.id, |n| n.name.to_string())
			.unwrap_or_default()
	}

	/// Returns the full dotted path from the registry root.
	pub fn path(&self) -> String {
		self.registry
			.with_node(self.id, |n| n.path.to_string())
			.unwrap_or_default()
	}

	/// Returns where capability lookup continues from this node.
	pub fn supertype(&self) -> Supertype {
		self.registry
			.with_node(self.id, |n| n.supertype)
			.unwrap_or(Supertype::Root)
	}

	/// Returns the immediate parent node, if any.
	pub fn parent(&self) -> Option<NodeRef<'r>> {
		let parent = self.registry.with_node(self.id, |n| n.parent)??;
		Some(NodeRef {
			registry: self.registry,
			id: parent,
		})
	}

	/// Returns the node's behavior descriptor.
	pub fn descriptor(&self) -> Callable {
		self.registry
			.with_node(self.id, |n| n.descriptor.clone())
			.unwrap_or_else(|| Callable::noop(""))
	}

	/// Returns the node's stored version tag.
	pub fn version(&self) -> VersionTag {
		self.registry
			.with_node(self.id, |n| n.version.clone())
			.unwrap_or_default()
	}

	/// Reads one of the node's own members, invoking getters.
	pub fn member(&self, key: &str) -> Option<Value> {
		let slot = self
			.registry
			.with_node(self.id, |n| n.own.get(key).cloned())
			.flatten()?;
		// getters run outside the registry lock
		Some(slot.read())
	}

	/// Returns this node as a merge-source / member value.
	pub fn to_value(&self) -> Value {
		Value::Node(self.id)
	}

	/// Declares a dotted path relative to this node.
	pub fn declare(&self, path: &str) -> Result<NodeRef<'r>> {
		self.registry.declare_at(Some(self.id), path, None)
	}

	/// Declares a relative path, attaching `descriptor` at the leaf.
	pub fn declare_with(&self, path: &str, descriptor: impl Into<Value>) -> Result<NodeRef<'r>> {
		self.registry
			.declare_at(Some(self.id), path, Some(descriptor.into()))
	}

	/// Merges members into the instance surface by slot copy.
	pub fn extend<I>(&self, args: I) -> NodeRef<'r>
	where
		I: IntoIterator<Item = MergeArg>,
	{
		self.merge(TableAddr::Surface(self.id), args, false)
	}

	/// Merges members into the instance surface, applying explicit
	/// definitions.
	pub fn exdef<I>(&self, args: I) -> NodeRef<'r>
	where
		I: IntoIterator<Item = MergeArg>,
	{
		self.merge(TableAddr::Surface(self.id), args, true)
	}

	/// Merges members into the node's own member table by slot copy.
	pub fn append<I>(&self, args: I) -> NodeRef<'r>
	where
		I: IntoIterator<Item = MergeArg>,
	{
		self.merge(TableAddr::Own(self.id), args, false)
	}

	/// Merges members into the node's own member table, applying explicit
	/// definitions.
	pub fn apdef<I>(&self, args: I) -> NodeRef<'r>
	where
		I: IntoIterator<Item = MergeArg>,
	{
		self.merge(TableAddr::Own(self.id), args, true)
	}

	fn merge<I>(&self, addr: TableAddr, args: I, by_define: bool) -> NodeRef<'r>
	where
		I: IntoIterator<Item = MergeArg>,
	{
		self.registry.run_merge(addr, classify(args), by_define);
		*self
	}

	/// Creates an instance of this node's behavior descriptor.
	pub fn instantiate(&self, args: &[Value]) -> Instance<'r> {
		Instance::create(*self, args)
	}
}

impl From<&NodeRef<'_>> for MergeArg {
	fn from(node: &NodeRef<'_>) -> Self {
		MergeArg::Value(Value::Node(node.id))
	}
}
