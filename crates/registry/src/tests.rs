use pretty_assertions::assert_eq;

use arbor_primitives::{AttrDescriptor, Callable, MemberTable, Value};

use crate::{
	MemberSource, MergeArg, Registry, RegistryError, Supertype, VersionTag, global,
};

fn src(entries: &[(&str, f64)]) -> MergeArg {
	let mut source = MemberSource::new();
	for (key, value) in entries {
		source = source.with(*key, *value);
	}
	source.into()
}

#[test]
fn declare_is_idempotent() {
	let registry = Registry::new();
	let first = registry.declare("app.core").unwrap();
	first.append([src(&[("ready", 1.0)])]);

	let second = registry.declare("app.core").unwrap();
	assert_eq!(first, second);
	assert_eq!(registry.len(), 2);
	// the second declaration does not alter the first node's members
	assert_eq!(second.member("ready"), Some(Value::from(1.0)));
}

#[test]
fn declared_leaf_keeps_existing_descriptor() {
	let registry = Registry::new();
	let original = Callable::new("make", |_| Value::from(1.0));
	let replacement = Callable::new("make", |_| Value::from(2.0));

	registry.declare_with("widget", original).unwrap();
	let node = registry.declare_with("widget", replacement).unwrap();

	assert_eq!(node.descriptor().call(&[]), Value::from(1.0));
}

#[test]
fn supertype_chain_terminates_at_root() {
	let registry = Registry::new();
	let c = registry.declare("a.b.c").unwrap();
	let b = registry.declare("a.b").unwrap();
	let a = registry.declare("a").unwrap();

	assert_eq!(c.supertype(), Supertype::Node(b.id()));
	assert_eq!(b.supertype(), Supertype::Node(a.id()));
	assert_eq!(a.supertype(), Supertype::Root);
	assert_eq!(c.parent(), Some(b));
	assert_eq!(a.parent(), None);
}

#[test]
fn intermediate_nodes_get_noop_descriptors() {
	let registry = Registry::new();
	let leaf = registry
		.declare_with("ns.widget", Callable::new("ctor", |_| Value::from(7.0)))
		.unwrap();
	let middle = registry.lookup("ns").unwrap();

	assert_eq!(leaf.descriptor().name(), "widget");
	assert_eq!(middle.descriptor().name(), "ns");
	assert_eq!(middle.descriptor().call(&[]), Value::Null);
	assert_eq!(leaf.path(), "ns.widget");
	assert_eq!(middle.name(), "ns");
}

#[test]
fn version_gated_override() {
	let registry = Registry::new();
	let node = registry.declare("versioned").unwrap();

	node.extend([src(&[("m", 10.0)]), 1.0.into()]);
	assert_eq!(node.version(), VersionTag::from(1.0));

	// a newer token overwrites
	node.extend([src(&[("m", 20.0)]), 2.0.into()]);
	assert_eq!(node.instantiate(&[]).get("m"), Some(Value::from(20.0)));
	assert_eq!(node.version(), VersionTag::from(2.0));

	// an equal or lower token loses, and the stored tag never decreases
	node.extend([src(&[("m", 30.0)]), 1.0.into()]);
	node.extend([src(&[("m", 40.0)]), 2.0.into()]);
	assert_eq!(node.instantiate(&[]).get("m"), Some(Value::from(20.0)));
	assert_eq!(node.version(), VersionTag::from(2.0));
}

#[test]
fn unversioned_merge_never_overrides() {
	let registry = Registry::new();
	let node = registry.declare("quiet").unwrap();

	node.append([src(&[("m", 1.0)])]);
	node.append([src(&[("m", 2.0)])]);

	assert_eq!(node.member("m"), Some(Value::from(1.0)));
	assert!(node.version().is_unset());
}

#[test]
fn first_real_version_beats_the_sentinel() {
	let registry = Registry::new();
	let node = registry.declare("fresh").unwrap();

	node.append([src(&[("m", 1.0)])]);
	node.append([src(&[("m", 2.0)]), 0.5.into()]);

	assert_eq!(node.member("m"), Some(Value::from(2.0)));
	assert_eq!(node.version(), VersionTag::from(0.5));
}

#[test]
fn deep_merge_of_nested_maps() {
	let registry = Registry::new();
	let node = registry.declare("cfg_holder").unwrap();

	node.append([MergeArg::from(
		MemberSource::new().with("cfg", MemberTable::new().with("b", 2.0)),
	)]);
	node.append([MergeArg::from(
		MemberSource::new().with("cfg", MemberTable::new().with("a", 1.0)),
	)]);

	let cfg = node.member("cfg").unwrap();
	let cfg = cfg.as_map().unwrap();
	assert_eq!(cfg.read("a"), Some(Value::from(1.0)));
	assert_eq!(cfg.read("b"), Some(Value::from(2.0)));
}

#[test]
fn deep_merge_of_sequences_appends_missing_indices() {
	let registry = Registry::new();
	let node = registry.declare("seq_holder").unwrap();

	let first = MemberSource::new().with("items", vec![Value::from(1.0), Value::from(2.0)]);
	let second = MemberSource::new().with(
		"items",
		vec![Value::from(1.0), Value::from(5.0), Value::from(3.0)],
	);
	node.append([MergeArg::from(first)]);
	node.append([MergeArg::from(second)]);

	assert_eq!(
		node.member("items"),
		Some(Value::Seq(vec![
			Value::from(1.0),
			Value::from(2.0),
			Value::from(3.0),
		]))
	);
}

#[test]
fn descriptor_merges_never_deep_merge() {
	let registry = Registry::new();
	let node = registry.declare("shallow").unwrap();

	node.append([MergeArg::from(
		MemberSource::new().with("cfg", MemberTable::new().with("b", 2.0)),
	)]);
	node.apdef([MergeArg::from(
		MemberSource::new().with("cfg", MemberTable::new().with("a", 1.0)),
	)]);

	let cfg = node.member("cfg").unwrap();
	let cfg = cfg.as_map().unwrap();
	assert_eq!(cfg.read("a"), None);
	assert_eq!(cfg.read("b"), Some(Value::from(2.0)));
}

#[test]
fn conflict_with_root_level_binding() {
	let registry = Registry::new();
	registry.declare("x").unwrap();
	registry.bind("x", 5.0);

	let err = registry.declare("x.y").unwrap_err();
	assert_eq!(
		err,
		RegistryError::Conflict {
			path: "x.y".to_string(),
			segment: "x".to_string(),
			kind: crate::ValueKind::Number,
		}
	);
}

#[test]
fn conflict_with_appended_member() {
	let registry = Registry::new();
	let a = registry.declare("a").unwrap();
	a.append([src(&[("b", 5.0)])]);

	let err = registry.declare("a.b.c").unwrap_err();
	match err {
		RegistryError::Conflict { segment, .. } => assert_eq!(segment, "b"),
		other => panic!("expected conflict, got {other:?}"),
	}
}

#[test]
fn invalid_paths_are_rejected() {
	let registry = Registry::new();
	for path in ["", "a..b", ".a", "a."] {
		assert_eq!(
			registry.declare(path).unwrap_err(),
			RegistryError::InvalidPath {
				path: path.to_string()
			},
		);
	}
	assert_eq!(registry.len(), 0);
}

#[test]
fn non_callable_descriptor_is_rejected() {
	let registry = Registry::new();
	let err = registry.declare_with("v", 5.0).unwrap_err();
	assert_eq!(
		err,
		RegistryError::InvalidDescriptor {
			path: "v".to_string(),
			kind: crate::ValueKind::Number,
		}
	);
}

#[test]
fn shapes_scenario() {
	let registry = Registry::new();
	let circle = registry
		.declare_with("shapes.circle", Callable::noop("mk_circle"))
		.unwrap();
	let square = registry
		.declare_with("shapes.square", Callable::noop("mk_square"))
		.unwrap();
	let shapes = registry.declare("shapes").unwrap();

	assert_eq!(circle.supertype(), Supertype::Node(shapes.id()));
	assert_eq!(square.supertype(), Supertype::Node(shapes.id()));
	assert_eq!(shapes.supertype(), Supertype::Root);

	// the shared root capability is reachable from every instance
	registry.extend_root([src(&[("shared", 1.0)])]);
	assert_eq!(
		circle.instantiate(&[]).get("shared"),
		Some(Value::from(1.0))
	);
	assert_eq!(
		square.instantiate(&[]).get("shared"),
		Some(Value::from(1.0))
	);
}

#[test]
fn extend_targets_surface_append_targets_node() {
	let registry = Registry::new();
	let node = registry.declare("split").unwrap();

	node.extend([src(&[("surfaced", 1.0)])]);
	node.append([src(&[("owned", 2.0)])]);

	assert_eq!(node.member("surfaced"), None);
	assert_eq!(node.member("owned"), Some(Value::from(2.0)));

	let instance = node.instantiate(&[]);
	assert_eq!(instance.get("surfaced"), Some(Value::from(1.0)));
	assert_eq!(instance.get("owned"), None);
}

#[test]
fn exdef_applies_accessor_definitions() {
	let registry = Registry::new();
	let node = registry.declare("computed").unwrap();

	let getter = Callable::new("get_answer", |_| Value::from(42.0));
	node.exdef([MergeArg::from(
		MemberSource::new().define("answer", AttrDescriptor::new().with_get(getter)),
	)]);

	assert_eq!(node.instantiate(&[]).get("answer"), Some(Value::from(42.0)));
}

#[test]
fn plain_merge_copies_definitions_as_values() {
	let registry = Registry::new();
	let node = registry.declare("literal").unwrap();

	node.extend([MergeArg::from(
		MemberSource::new().define("d", AttrDescriptor::new().with_value(7.0)),
	)]);

	let copied = node.instantiate(&[]).get("d").unwrap();
	let map = copied.as_map().expect("definition copied as a map value");
	assert_eq!(map.read("value"), Some(Value::from(7.0)));
}

#[test]
fn hidden_members_are_not_enumerated_into_other_nodes() {
	let registry = Registry::new();
	let source = registry.declare("donor").unwrap();
	source.append([src(&[("shown", 1.0)])]);
	source.apdef([MergeArg::from(
		MemberSource::new().define("hidden", AttrDescriptor::new().with_value(2.0)),
	)]);

	let target = registry.declare("taker").unwrap();
	target.append([MergeArg::from(&source)]);

	assert_eq!(target.member("shown"), Some(Value::from(1.0)));
	assert_eq!(target.member("hidden"), None);
}

#[test]
fn node_sources_copy_child_references() {
	let registry = Registry::new();
	let donor = registry.declare("tree").unwrap();
	let kid = registry.declare("tree.kid").unwrap();

	let target = registry.declare("copycat").unwrap();
	target.append([MergeArg::from(&donor)]);

	assert_eq!(target.member("kid"), Some(Value::Node(kid.id())));
}

#[test]
fn super_reference_is_fixed() {
	let registry = Registry::new();
	let a = registry.declare("a").unwrap();
	let b = registry.declare("a.b").unwrap();

	assert_eq!(b.member("_super_"), Some(Value::Node(a.id())));

	// not even a newer version may redefine it
	b.append([src(&[("_super_", 9.0)]), 99.0.into()]);
	assert_eq!(b.member("_super_"), Some(Value::Node(a.id())));
}

#[test]
fn tree_edges_survive_versioned_overwrites() {
	let registry = Registry::new();
	let a = registry.declare("a").unwrap();
	let b = registry.declare("a.b").unwrap();

	a.append([src(&[("b", 5.0)]), 99.0.into()]);

	assert_eq!(a.member("b"), Some(Value::Node(b.id())));
	assert_eq!(registry.lookup("a.b"), Some(b));
}

#[test]
fn maps_deep_merge_into_bound_child_nodes() {
	let registry = Registry::new();
	let a = registry.declare("a").unwrap();
	let b = registry.declare("a.b").unwrap();

	a.append([MergeArg::from(
		MemberSource::new().with("b", MemberTable::new().with("x", 1.0)),
	)]);

	assert_eq!(b.member("x"), Some(Value::from(1.0)));
	assert_eq!(registry.lookup("a.b"), Some(b));
}

#[test]
fn instance_lookup_walks_the_surface_chain() {
	let registry = Registry::new();
	registry.extend_root([src(&[("shared", 0.0)])]);

	let a = registry.declare("a").unwrap();
	let ab = registry
		.declare_with(
			"a.b",
			Callable::new("mk", |_| {
				Value::Map(MemberTable::new().with("own", 9.0))
			}),
		)
		.unwrap();

	a.extend([src(&[("mid", 2.0), ("leaf", 1.0)])]);
	ab.extend([src(&[("leaf", 3.0)])]);

	let instance = ab.instantiate(&[]);
	assert_eq!(instance.get("own"), Some(Value::from(9.0)));
	assert_eq!(instance.get("leaf"), Some(Value::from(3.0)));
	assert_eq!(instance.get("mid"), Some(Value::from(2.0)));
	assert_eq!(instance.get("shared"), Some(Value::from(0.0)));
	assert_eq!(instance.get("absent"), None);
	assert_eq!(instance.parent_node(), Some(a));
}

#[test]
fn bootstrap_is_version_gated() {
	let registry = Registry::with_root_version(2.0);
	assert!(!registry.install_root(1.0));
	assert!(!registry.install_root(2.0));
	assert!(registry.install_root(3.0));
	assert_eq!(registry.root_version(), VersionTag::from(3.0));
}

#[test]
fn reinstall_replaces_the_root_surface() {
	let registry = Registry::new();
	let node = registry.declare("n").unwrap();

	registry.extend_root([src(&[("shared", 1.0)])]);
	assert_eq!(node.instantiate(&[]).get("shared"), Some(Value::from(1.0)));

	assert!(registry.install_root(2.0));
	assert_eq!(node.instantiate(&[]).get("shared"), None);
}

#[test]
fn relative_declaration() {
	let registry = Registry::new();
	let a = registry.declare("a").unwrap();
	let c = a.declare("b.c").unwrap();

	assert_eq!(c.path(), "a.b.c");
	assert_eq!(registry.lookup("a.b.c"), Some(c));
	assert_eq!(c.parent().unwrap().path(), "a.b");
}

#[test]
fn adoption_requires_shared_lineage() {
	let registry = Registry::new();
	let base = registry.declare("base").unwrap();
	let derived = registry.declare("base.derived").unwrap();
	let other = registry.declare("other").unwrap();

	let mut base_inst = base.instantiate(&[]);
	base_inst.set("greeting", "hi");
	base_inst.set("kept", 1.0);

	let mut derived_inst = derived.instantiate(&[]);
	derived_inst.set("greeting", "yo");
	assert!(derived_inst.adopt(&base_inst));
	// present members win over adopted ones
	assert_eq!(derived_inst.get("greeting"), Some(Value::from("yo")));
	assert_eq!(derived_inst.get("kept"), Some(Value::from(1.0)));

	let mut other_inst = other.instantiate(&[]);
	assert!(!other_inst.adopt(&base_inst));
	assert_eq!(other_inst.get("kept"), None);
}

#[test]
fn text_tokens_gate_like_numbers() {
	let registry = Registry::new();
	let node = registry.declare("texty").unwrap();

	node.append([src(&[("m", 1.0)]), "b".into()]);
	node.append([src(&[("m", 2.0)]), "a".into()]);
	assert_eq!(node.member("m"), Some(Value::from(1.0)));

	node.append([src(&[("m", 3.0)]), "c".into()]);
	assert_eq!(node.member("m"), Some(Value::from(3.0)));
}

#[test]
fn stray_arguments_are_ignored() {
	let registry = Registry::new();
	let node = registry.declare("tolerant").unwrap();

	node.append([
		MergeArg::from(Value::Bool(true)),
		MergeArg::from(Value::Seq(vec![Value::Null])),
		src(&[("m", 1.0)]),
		MergeArg::from(Value::Callable(Callable::noop("nothing"))),
	]);

	assert_eq!(node.member("m"), Some(Value::from(1.0)));
}

#[test]
fn process_wide_registry_is_shared() {
	let first = global().declare("proc.wide").unwrap();
	let second = global().declare("proc.wide").unwrap();
	assert_eq!(first.id(), second.id());
}
