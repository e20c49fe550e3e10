//! The capability merge engine.
//!
//! One algorithm serves all four public operations: the target table and the
//! descriptor flag vary, the version gate and the deep-merge rules do not.
//! The engine never raises; every member it declines to write is skipped
//! with a trace event.

use std::sync::LazyLock;

use arbor_primitives::{MemberTable, NodeId, Slot, SlotData, TypePattern, Value};

use crate::registry::Inner;
use crate::source::{ClassifiedArgs, Member, MemberSource, SourceSet};
use crate::version::VersionTag;

/// Which member table of which owner a merge writes into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TableAddr {
	/// The root capability's instance surface.
	RootSurface,
	/// A node's own member table.
	Own(NodeId),
	/// A node's instance surface.
	Surface(NodeId),
}

static CONTAINERS: LazyLock<TypePattern> = LazyLock::new(|| TypePattern::parse("map|seq"));

/// Runs one public merge operation against `addr`.
///
/// The version token is compared against the owner's stored tag once, up
/// front; a strictly greater token turns collisions into overwrites and
/// advances the stored tag after the sources are applied.
pub(crate) fn run(inner: &mut Inner, addr: TableAddr, args: ClassifiedArgs, by_define: bool) {
	let Some(stored) = version_of(inner, addr) else {
		tracing::trace!(?addr, "merge target does not exist; skipped");
		return;
	};
	let newer = match &args.version {
		Some(token) => *token > stored,
		None => false,
	};

	for source in &args.sources {
		match source {
			SourceSet::Inline(members) => merge_source(inner, addr, members, newer, by_define),
			SourceSet::Node(id) => {
				let Some(table) = inner.node(*id).map(|n| n.own.clone()) else {
					tracing::trace!(node = %id, "unknown node source; skipped");
					continue;
				};
				let members = MemberSource::from(table);
				merge_source(inner, addr, &members, newer, by_define);
			}
		}
	}

	if newer && let Some(token) = args.version {
		set_version(inner, addr, token);
	}
}

fn version_of(inner: &Inner, addr: TableAddr) -> Option<VersionTag> {
	match addr {
		TableAddr::RootSurface => Some(inner.root.version.clone()),
		TableAddr::Own(id) | TableAddr::Surface(id) => {
			inner.node(id).map(|n| n.version.clone())
		}
	}
}

fn set_version(inner: &mut Inner, addr: TableAddr, version: VersionTag) {
	match addr {
		TableAddr::RootSurface => inner.root.version = version,
		TableAddr::Own(id) | TableAddr::Surface(id) => {
			if let Some(node) = inner.node_mut(id) {
				node.version = version;
			}
		}
	}
}

/// Detaches the addressed table, merges into it, reattaches it. Detaching
/// lets the deep-merge recursion borrow the arena for node-valued members.
fn merge_source(
	inner: &mut Inner,
	addr: TableAddr,
	source: &MemberSource,
	newer: bool,
	by_define: bool,
) {
	let Some(mut table) = take_table(inner, addr) else {
		return;
	};
	merge_table(inner, &mut table, source, newer, by_define);
	put_table(inner, addr, table);
}

fn take_table(inner: &mut Inner, addr: TableAddr) -> Option<MemberTable> {
	match addr {
		TableAddr::RootSurface => Some(std::mem::take(&mut inner.root.surface)),
		TableAddr::Own(id) => inner.node_mut(id).map(|n| std::mem::take(&mut n.own)),
		TableAddr::Surface(id) => inner.node_mut(id).map(|n| std::mem::take(&mut n.surface)),
	}
}

fn put_table(inner: &mut Inner, addr: TableAddr, table: MemberTable) {
	match addr {
		TableAddr::RootSurface => inner.root.surface = table,
		TableAddr::Own(id) => {
			if let Some(node) = inner.node_mut(id) {
				node.own = table;
			}
		}
		TableAddr::Surface(id) => {
			if let Some(node) = inner.node_mut(id) {
				node.surface = table;
			}
		}
	}
}

fn merge_table(
	inner: &mut Inner,
	table: &mut MemberTable,
	source: &MemberSource,
	newer: bool,
	by_define: bool,
) {
	for (key, member) in source.iter() {
		let Some(current) = table.get(key) else {
			table.put(key, incoming_slot(member, by_define));
			continue;
		};
		if let Member::Copy(slot) = member
			&& slot.data == current.data
		{
			continue;
		}
		if newer {
			if !current.is_configurable() {
				tracing::trace!(key, "non-configurable member kept");
				continue;
			}
			if matches!(current.data, SlotData::Value(Value::Node(_))) {
				// tree edges are append-only
				tracing::trace!(key, "node-valued member kept");
				continue;
			}
			table.put(key, incoming_slot(member, by_define));
			continue;
		}
		if by_define {
			// descriptor merges never deep-merge
			continue;
		}
		deep_merge_member(inner, table, key, member);
	}
}

fn incoming_slot(member: &Member, by_define: bool) -> Slot {
	match member {
		Member::Copy(slot) => slot.clone(),
		Member::Define(desc) if by_define => Slot::defined(desc),
		Member::Define(desc) => Slot::assigned(desc.to_value()),
	}
}

/// Member-by-member recursion for container pairs: map into map, seq into
/// seq, and map into a bound child node's own table.
fn deep_merge_member(inner: &mut Inner, table: &mut MemberTable, key: &str, member: &Member) {
	let Member::Copy(incoming) = member else {
		return;
	};
	let SlotData::Value(src) = &incoming.data else {
		return;
	};
	if !CONTAINERS.matches(src) {
		return;
	}
	let Some(slot) = table.get_mut(key) else {
		return;
	};
	match (&mut slot.data, src) {
		(SlotData::Value(Value::Map(dst)), Value::Map(nested)) => {
			let nested = MemberSource::from(nested.clone());
			merge_table(inner, dst, &nested, false, false);
		}
		(SlotData::Value(Value::Seq(dst)), Value::Seq(items)) => {
			merge_seq(inner, dst, items);
		}
		(SlotData::Value(Value::Node(id)), Value::Map(nested)) => {
			let id = *id;
			let nested = MemberSource::from(nested.clone());
			merge_source(inner, TableAddr::Own(id), &nested, false, false);
		}
		_ => {
			tracing::trace!(key, "member kept");
		}
	}
}

fn merge_seq(inner: &mut Inner, dst: &mut Vec<Value>, src: &[Value]) {
	for (i, item) in src.iter().enumerate() {
		match dst.get_mut(i) {
			None => dst.push(item.clone()),
			Some(existing) if existing == item => {}
			Some(Value::Map(nested)) => {
				if let Value::Map(incoming) = item {
					let incoming = MemberSource::from(incoming.clone());
					merge_table(inner, nested, &incoming, false, false);
				}
			}
			Some(Value::Seq(nested)) => {
				if let Value::Seq(incoming) = item {
					merge_seq(inner, nested, incoming);
				}
			}
			Some(_) => {}
		}
	}
}
