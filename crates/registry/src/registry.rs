//! Registry construction, the declaration walk, and the process-global
//! accessor.

use std::sync::OnceLock;

use arbor_primitives::{Attributes, Callable, MemberTable, NodeId, Slot, SlotData, Value};
use parking_lot::{RwLock, RwLockReadGuard};

use crate::merge::{self, TableAddr};
use crate::node::{NodeRef, NodeState, Supertype};
use crate::source::{ClassifiedArgs, MergeArg, classify};
use crate::version::VersionTag;
use crate::{RegistryError, Result};

/// Version the root capability is installed at by [`Registry::new`].
pub const BASE_VERSION: f64 = 1.0;

/// The shared root capability: the terminus of every supertype chain and of
/// every instance-surface chain.
pub(crate) struct RootCapability {
	pub(crate) surface: MemberTable,
	pub(crate) version: VersionTag,
}

impl RootCapability {
	fn new(version: VersionTag) -> RootCapability {
		RootCapability {
			surface: MemberTable::new(),
			version,
		}
	}
}

pub(crate) struct Inner {
	pub(crate) nodes: Vec<NodeState>,
	pub(crate) bindings: MemberTable,
	pub(crate) root: RootCapability,
}

impl Inner {
	pub(crate) fn node(&self, id: NodeId) -> Option<&NodeState> {
		self.nodes.get(id.index())
	}

	pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut NodeState> {
		self.nodes.get_mut(id.index())
	}
}

/// A hierarchical namespace registry.
///
/// All state lives behind one lock; declarations and merge operations are
/// serialized registry-wide. Construct one per scope under test, or share
/// the process-wide instance via [`global`].
pub struct Registry {
	inner: RwLock<Inner>,
}

impl Default for Registry {
	fn default() -> Self {
		Registry::new()
	}
}

impl Registry {
	/// Creates a registry with the root capability installed at
	/// [`BASE_VERSION`].
	pub fn new() -> Registry {
		Registry::with_root_version(BASE_VERSION)
	}

	/// Creates a registry with the root capability at a caller-chosen
	/// version.
	pub fn with_root_version(version: impl Into<VersionTag>) -> Registry {
		let version = version.into();
		tracing::debug!(%version, "installing root capability");
		Registry {
			inner: RwLock::new(Inner {
				nodes: Vec::new(),
				bindings: MemberTable::new(),
				root: RootCapability::new(version),
			}),
		}
	}

	/// Re-runs bootstrap: replaces the root capability if `version` is
	/// strictly newer than the installed one. Returns whether anything was
	/// installed, so repeated initialization is an observable no-op.
	pub fn install_root(&self, version: impl Into<VersionTag>) -> bool {
		let version = version.into();
		let mut inner = self.inner.write();
		if inner.root.version >= version {
			return false;
		}
		tracing::debug!(%version, "reinstalling root capability");
		inner.root = RootCapability::new(version);
		true
	}

	/// Returns the root capability's installed version.
	pub fn root_version(&self) -> VersionTag {
		self.inner.read().root.version.clone()
	}

	/// Returns the number of declared nodes.
	pub fn len(&self) -> usize {
		self.inner.read().nodes.len()
	}

	/// Returns true if no nodes have been declared.
	pub fn is_empty(&self) -> bool {
		self.inner.read().nodes.is_empty()
	}

	/// Declares a dotted path, creating any missing nodes with no-op
	/// descriptors, and returns the leaf node. Idempotent for paths already
	/// declared.
	pub fn declare(&self, path: &str) -> Result<NodeRef<'_>> {
		self.declare_at(None, path, None)
	}

	/// Declares a dotted path, attaching `descriptor` (which must be
	/// callable) at the leaf. Intermediate nodes still get no-op
	/// descriptors; an already-declared leaf keeps its existing one.
	pub fn declare_with(&self, path: &str, descriptor: impl Into<Value>) -> Result<NodeRef<'_>> {
		self.declare_at(None, path, Some(descriptor.into()))
	}

	pub(crate) fn declare_at(
		&self,
		start: Option<NodeId>,
		path: &str,
		descriptor: Option<Value>,
	) -> Result<NodeRef<'_>> {
		if path.is_empty() || path.split('.').any(str::is_empty) {
			return Err(RegistryError::InvalidPath {
				path: path.to_string(),
			});
		}
		let mut descriptor = match descriptor {
			None => None,
			Some(Value::Callable(c)) => Some(c),
			Some(other) => {
				return Err(RegistryError::InvalidDescriptor {
					path: path.to_string(),
					kind: other.kind(),
				});
			}
		};

		let mut inner = self.inner.write();
		let segments: Vec<&str> = path.split('.').collect();
		let last = segments.len() - 1;
		let mut parent = start;
		let mut leaf = NodeId(0);

		for (i, segment) in segments.iter().copied().enumerate() {
			let container = match parent {
				None => &inner.bindings,
				Some(pid) => {
					let Some(node) = inner.node(pid) else {
						return Err(RegistryError::InvalidPath {
							path: path.to_string(),
						});
					};
					&node.own
				}
			};
			let occupant = container.get(segment).map(|slot| match &slot.data {
				SlotData::Value(Value::Node(id)) => Ok(*id),
				_ => Err(slot.value_kind()),
			});

			let id = match occupant {
				Some(Ok(id)) => {
					if i == last && descriptor.is_some() {
						tracing::trace!(segment, "existing node kept; descriptor ignored");
					}
					id
				}
				Some(Err(kind)) => {
					return Err(RegistryError::Conflict {
						path: path.to_string(),
						segment: segment.to_string(),
						kind,
					});
				}
				None => {
					let attached = if i == last { descriptor.take() } else { None };
					create_node(&mut inner, parent, segment, attached)
				}
			};
			parent = Some(id);
			leaf = id;
		}

		Ok(NodeRef { registry: self, id: leaf })
	}

	/// Resolves an already-declared path without creating anything.
	pub fn lookup(&self, path: &str) -> Option<NodeRef<'_>> {
		let inner = self.inner.read();
		let mut current: Option<NodeId> = None;
		for segment in path.split('.') {
			let container = match current {
				None => &inner.bindings,
				Some(id) => &inner.node(id)?.own,
			};
			match &container.get(segment)?.data {
				SlotData::Value(Value::Node(id)) => current = Some(*id),
				_ => return None,
			}
		}
		let id = current?;
		Some(NodeRef { registry: self, id })
	}

	/// Raw-binds a root-level name to a host value. Escape hatch for values
	/// living alongside declared namespaces; `declare` reports a conflict
	/// when a path runs into one of these.
	pub fn bind(&self, name: &str, value: impl Into<Value>) {
		self.inner.write().bindings.set(name, value);
	}

	/// Reads a root-level binding, invoking getters.
	pub fn binding(&self, name: &str) -> Option<Value> {
		let slot = self.inner.read().bindings.get(name).cloned()?;
		Some(slot.read())
	}

	/// Merges shared members into the root capability surface; every
	/// instance of every node inherits them.
	pub fn extend_root<I>(&self, args: I)
	where
		I: IntoIterator<Item = MergeArg>,
	{
		self.run_merge(TableAddr::RootSurface, classify(args), false);
	}

	/// Like [`Registry::extend_root`], applying explicit definitions.
	pub fn exdef_root<I>(&self, args: I)
	where
		I: IntoIterator<Item = MergeArg>,
	{
		self.run_merge(TableAddr::RootSurface, classify(args), true);
	}

	pub(crate) fn run_merge(&self, addr: TableAddr, args: ClassifiedArgs, by_define: bool) {
		let mut inner = self.inner.write();
		merge::run(&mut inner, addr, args, by_define);
	}

	pub(crate) fn with_node<R>(&self, id: NodeId, f: impl FnOnce(&NodeState) -> R) -> Option<R> {
		self.inner.read().node(id).map(f)
	}

	pub(crate) fn read_inner(&self) -> RwLockReadGuard<'_, Inner> {
		self.inner.read()
	}
}

fn create_node(
	inner: &mut Inner,
	parent: Option<NodeId>,
	segment: &str,
	descriptor: Option<Callable>,
) -> NodeId {
	let id = NodeId(inner.nodes.len() as u32);
	let path = match parent {
		Some(pid) => format!("{}.{}", inner.nodes[pid.index()].path, segment),
		None => segment.to_string(),
	};
	let descriptor = match descriptor {
		Some(c) => c.rename(segment),
		None => Callable::noop(segment),
	};
	let supertype = match parent {
		Some(pid) => Supertype::Node(pid),
		None => Supertype::Root,
	};

	let mut own = MemberTable::new();
	if let Some(pid) = parent {
		// fixed upward delegation reference
		own.put(
			"_super_",
			Slot {
				data: SlotData::Value(Value::Node(pid)),
				attrs: Attributes::empty(),
			},
		);
	}

	tracing::debug!(path = %path, "declared namespace node");
	inner.nodes.push(NodeState {
		name: segment.into(),
		path: path.into(),
		parent,
		supertype,
		own,
		surface: MemberTable::new(),
		descriptor,
		version: VersionTag::Unset,
	});

	match parent {
		None => inner.bindings.set(segment, Value::Node(id)),
		Some(pid) => {
			if let Some(node) = inner.node_mut(pid) {
				node.own.set(segment, Value::Node(id));
			}
		}
	}
	id
}

static GLOBAL: OnceLock<Registry> = OnceLock::new();

/// Returns the process-wide registry, installing it on first use.
pub fn global() -> &'static Registry {
	GLOBAL.get_or_init(Registry::new)
}
