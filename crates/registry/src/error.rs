use arbor_primitives::ValueKind;
use thiserror::Error;

/// Errors raised while declaring namespace paths.
///
/// Declaration errors represent programmer mistakes in namespace setup and
/// are raised synchronously; the merge operations never raise.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
	/// Path argument was empty or contained an empty segment.
	#[error("invalid namespace path {path:?}")]
	InvalidPath {
		/// The offending path as supplied.
		path: String,
	},
	/// An explicitly supplied behavior descriptor was not callable.
	#[error("descriptor for {path:?} is not callable (got {kind})")]
	InvalidDescriptor {
		/// The path being declared.
		path: String,
		/// Category of the rejected descriptor value.
		kind: ValueKind,
	},
	/// A path segment is already bound to something that is not a node.
	#[error("namespace conflict at segment {segment:?} of {path:?}: bound to a {kind} value")]
	Conflict {
		/// The path being declared.
		path: String,
		/// The segment occupied by a non-node value.
		segment: String,
		/// Category of the occupying value.
		kind: ValueKind,
	},
}

/// Registry result alias.
pub type Result<T> = std::result::Result<T, RegistryError>;
