use std::fmt;
use std::sync::Arc;

use crate::Value;

type CallFn = dyn Fn(&[Value]) -> Value + Send + Sync;

/// A named, invocable value.
///
/// The display name travels with the function so generated namespace nodes
/// stay identifiable in diagnostics. [`Callable::rename`] produces a callable
/// that forwards every invocation to the same function under a different
/// name, leaving the original untouched. Equality is function identity plus
/// name.
#[derive(Clone)]
pub struct Callable {
	name: Arc<str>,
	func: Arc<CallFn>,
}

impl Callable {
	/// Creates a named callable from a function.
	pub fn new(
		name: impl Into<Arc<str>>,
		func: impl Fn(&[Value]) -> Value + Send + Sync + 'static,
	) -> Callable {
		Callable {
			name: name.into(),
			func: Arc::new(func),
		}
	}

	/// Creates a named callable that ignores its arguments and returns
	/// [`Value::Null`].
	pub fn noop(name: impl Into<Arc<str>>) -> Callable {
		Callable::new(name, |_| Value::Null)
	}

	/// Returns the display name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns a callable sharing this one's function under a new name.
	pub fn rename(&self, name: impl Into<Arc<str>>) -> Callable {
		Callable {
			name: name.into(),
			func: Arc::clone(&self.func),
		}
	}

	/// Invokes the callable.
	pub fn call(&self, args: &[Value]) -> Value {
		(self.func)(args)
	}

	/// Returns true if both callables share the same underlying function.
	pub fn same_fn(&self, other: &Callable) -> bool {
		Arc::ptr_eq(&self.func, &other.func)
	}
}

impl PartialEq for Callable {
	fn eq(&self, other: &Self) -> bool {
		self.same_fn(other) && self.name == other.name
	}
}

impl fmt::Debug for Callable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Callable").field(&self.name).finish()
	}
}

impl fmt::Display for Callable {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.name)
	}
}
