//! Hierarchical namespace registry with version-gated member merging.
//!
//! Dot-separated paths declare a tree of nodes. Each node carries a behavior
//! descriptor, an own member table, and an instance surface chained through
//! its ancestors down to a shared root capability. Members are spliced into
//! nodes by four merge operations — [`NodeRef::extend`] / [`NodeRef::exdef`]
//! on the instance surface, [`NodeRef::append`] / [`NodeRef::apdef`] on the
//! node itself — whose collisions are settled by comparing caller-supplied
//! [`VersionTag`]s rather than by last-write-wins.
//!
//! # Example
//!
//! ```
//! use arbor_registry::{MemberSource, Registry, Supertype};
//!
//! # fn main() -> arbor_registry::Result<()> {
//! let registry = Registry::new();
//! let shapes = registry.declare("shapes")?;
//! let circle = registry.declare("shapes.circle")?;
//!
//! assert_eq!(circle.supertype(), Supertype::Node(shapes.id()));
//! assert_eq!(shapes.supertype(), Supertype::Root);
//!
//! circle.extend([MemberSource::new().with("sides", 1.0).into(), 1.0.into()]);
//! let instance = circle.instantiate(&[]);
//! assert_eq!(instance.get("sides"), Some(1.0.into()));
//! # Ok(())
//! # }
//! ```
//!
//! Declarations are idempotent and the tree is append-only: a segment bound
//! to a node is never rebound, and a segment occupied by a non-node value is
//! a [`RegistryError::Conflict`]. The merge operations never raise; inputs
//! they cannot use are skipped.

mod error;
mod instance;
mod merge;
mod node;
mod registry;
mod source;
mod version;

#[cfg(test)]
mod tests;

pub use arbor_primitives::{
	AttrDescriptor, Attributes, Callable, MemberTable, NodeId, Slot, SlotData, TypePattern, Value,
	ValueKind,
};
pub use error::{RegistryError, Result};
pub use instance::Instance;
pub use node::{NodeRef, Supertype};
pub use registry::{BASE_VERSION, Registry, global};
pub use source::{Member, MemberSource, MergeArg};
pub use version::VersionTag;
