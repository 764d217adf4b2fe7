use serde_json::json;
use silsilah_core::{
    resolve, FamilyTree, HierarchyResolver, OrphanPolicy, PersonNode, PersonRecord,
    ResolutionError, ResolveOptions,
};

fn rows(value: serde_json::Value) -> Vec<PersonRecord> {
    serde_json::from_value(value).unwrap()
}

fn child_ids<'a>(tree: &'a FamilyTree, id: &str) -> Vec<&'a str> {
    tree.find(id)
        .unwrap()
        .children()
        .iter()
        .map(PersonNode::id)
        .collect()
}

#[test]
fn chain_resolves_through_parent_id_and_patronymic() {
    let records = rows(json!([
        { "id": 1, "nama": "A" },
        { "id": 2, "nama": "B", "parent_id": 1 },
        { "id": 3, "nama": "C", "bin": "2" }
    ]));

    let resolution = resolve(&records).unwrap();
    let tree = &resolution.tree;

    assert_eq!(tree.root().id(), "1");
    assert_eq!(child_ids(tree, "1"), ["2"]);
    assert_eq!(child_ids(tree, "2"), ["3"]);
    assert!(tree.find("3").unwrap().is_leaf());
    assert!(resolution.diagnostics.is_clean());
}

#[test]
fn unknown_parent_id_falls_back_to_name_match() {
    let records = rows(json!([
        { "id": 1, "nama": "A", "parent_id": "X" },
        { "id": 2, "nama": "X" }
    ]));

    let tree = resolve(&records).unwrap().tree;

    assert_eq!(tree.root().id(), "2");
    assert_eq!(child_ids(&tree, "2"), ["1"]);
}

#[test]
fn name_fallback_is_case_insensitive_and_trimmed() {
    let records = vec![
        PersonRecord::new("10", "Kyai Munajad"),
        PersonRecord::new("11", "Siti").with_parent_ref("  kyai MUNAJAD "),
    ];

    let tree = resolve(&records).unwrap().tree;

    assert_eq!(tree.parent_of("11").map(PersonNode::id), Some("10"));
}

#[test]
fn id_match_wins_over_name_match() {
    // "2" is both an id and the name of row 3.
    let records = vec![
        PersonRecord::new("1", "Root"),
        PersonRecord::new("2", "Two").with_parent_id("1"),
        PersonRecord::new("3", "2").with_parent_id("1"),
        PersonRecord::new("4", "Four").with_parent_ref("2"),
    ];

    let tree = resolve(&records).unwrap().tree;

    assert_eq!(tree.parent_of("4").map(PersonNode::id), Some("2"));
}

#[test]
fn structured_parent_id_beats_patronymic_id() {
    let records = vec![
        PersonRecord::new("1", "A"),
        PersonRecord::new("2", "B").with_parent_id("1"),
        PersonRecord::new("3", "C").with_parent_id("1").with_patronymic("2"),
    ];

    let tree = resolve(&records).unwrap().tree;

    assert_eq!(tree.parent_of("3").map(PersonNode::id), Some("1"));
    assert_eq!(child_ids(&tree, "1"), ["2", "3"]);
}

#[test]
fn parent_id_beats_both_orang_tua_spellings() {
    let records = rows(json!([
        { "id": "1", "nama": "A" },
        { "id": "2", "nama": "B" },
        { "id": "3", "nama": "C" },
        { "id": "4", "nama": "D", "parent_id": "1", "orang_tua": "2", "orangtua": "3" },
        { "id": "5", "nama": "E", "orang_tua": "2", "orangtua": "3" },
        { "id": "6", "nama": "F", "orangtua": "3" }
    ]));

    let resolution = resolve(&records).unwrap();
    let tree = &resolution.tree;

    assert_eq!(tree.parent_of("4").map(PersonNode::id), Some("1"));
    // 2 and 3 are orphans, so their children are discarded with them.
    assert_eq!(tree.len(), 2);
    let discarded: Vec<(&str, usize)> = resolution
        .diagnostics
        .discarded_roots
        .iter()
        .map(|root| (root.id.as_str(), root.subtree_size))
        .collect();
    assert_eq!(discarded, [("2", 2), ("3", 2)]);
}

#[test]
fn sentinel_and_blank_parent_refs_behave_like_absent_fields() {
    let with_sentinels = rows(json!([
        { "id": "1", "nama": "A" },
        { "id": "2", "nama": "B", "parent_id": "-", "orang_tua": "  ", "bin": "1" },
        { "id": "3", "nama": "C", "parent_id": "", "orangtua": "-" }
    ]));
    let without_fields = rows(json!([
        { "id": "1", "nama": "A" },
        { "id": "2", "nama": "B", "bin": "1" },
        { "id": "3", "nama": "C" }
    ]));

    let left = resolve(&with_sentinels).unwrap();
    let right = resolve(&without_fields).unwrap();

    assert_eq!(left.tree.parent_of("2").map(PersonNode::id), Some("1"));
    assert_eq!(left.diagnostics.discarded_roots.len(), 1);
    assert_eq!(left.diagnostics.discarded_roots[0].id, "3");
    assert_eq!(
        left.diagnostics.discarded_roots,
        right.diagnostics.discarded_roots
    );
    assert_eq!(child_ids(&left.tree, "1"), child_ids(&right.tree, "1"));
}

#[test]
fn non_numeric_patronymic_is_not_a_parent_reference() {
    let records = rows(json!([
        { "id": "1", "nama": "Kyai Munajad" },
        { "id": "2", "nama": "Siti", "bin": "Alm. Kyai Munajad" }
    ]));

    let resolution = resolve(&records).unwrap();

    assert_eq!(resolution.tree.len(), 1);
    assert_eq!(resolution.diagnostics.discarded_roots[0].id, "2");
}

#[test]
fn root_with_sentinel_id_wins_regardless_of_position() {
    let records = vec![
        PersonRecord::new("7", "Orphan"),
        PersonRecord::new("8", "Orphan child").with_parent_id("7"),
        PersonRecord::new("1", "Founder"),
        PersonRecord::new("2", "Heir").with_parent_id("1"),
    ];

    let resolution = resolve(&records).unwrap();

    assert_eq!(resolution.tree.root().id(), "1");
    assert_eq!(resolution.tree.len(), 2);
    assert_eq!(resolution.diagnostics.discarded_roots.len(), 1);
    assert_eq!(resolution.diagnostics.discarded_roots[0].id, "7");
    assert_eq!(resolution.diagnostics.discarded_roots[0].subtree_size, 2);
}

#[test]
fn first_root_candidate_wins_without_sentinel_id() {
    let records = vec![
        PersonRecord::new("5", "Child").with_parent_id("9"),
        PersonRecord::new("9", "Elder"),
        PersonRecord::new("3", "Loner"),
    ];

    let resolution = resolve(&records).unwrap();

    assert_eq!(resolution.tree.root().id(), "9");
    assert_eq!(child_ids(&resolution.tree, "9"), ["5"]);
    assert_eq!(resolution.diagnostics.discarded_roots[0].id, "3");
}

#[test]
fn reachable_plus_discarded_equals_input_count() {
    let records = vec![
        PersonRecord::new("1", "A"),
        PersonRecord::new("2", "B").with_parent_id("1"),
        PersonRecord::new("3", "C").with_parent_id("missing"),
        PersonRecord::new("4", "D").with_parent_id("3"),
        PersonRecord::new("5", "E").with_parent_id("4"),
        PersonRecord::new("6", "F"),
        PersonRecord::new("7", "G").with_patronymic("2"),
    ];

    let resolution = resolve(&records).unwrap();

    assert_eq!(
        resolution.tree.len() + resolution.diagnostics.discarded_records(),
        records.len()
    );
    assert_eq!(resolution.tree.len(), 3);
}

#[test]
fn children_keep_input_order_even_before_parent_row() {
    let records = vec![
        PersonRecord::new("c", "Second").with_parent_id("1"),
        PersonRecord::new("a", "First").with_parent_id("1"),
        PersonRecord::new("1", "Parent"),
        PersonRecord::new("b", "Third").with_parent_id("1"),
    ];

    let tree = resolve(&records).unwrap().tree;

    assert_eq!(child_ids(&tree, "1"), ["c", "a", "b"]);
}

#[test]
fn spouse_is_attached_as_annotation_only() {
    let records = rows(json!([
        { "id": "1", "nama": "Kyai Munajad", "pasangan": "Nyai Munajad", "foto_pasangan": "-" },
        { "id": "2", "nama": "Siti", "orang_tua": "1", "pasangan": " - ", "foto_pasangan": "x.jpg" },
        { "id": "3", "nama": "Budi", "orang_tua": "1", "pasangan": "Siti", "foto_pasangan": "s.jpg" }
    ]));

    let tree = resolve(&records).unwrap().tree;

    let founder = tree.root().spouse().unwrap();
    assert_eq!(founder.name, "Nyai Munajad");
    assert_eq!(founder.photo, None);
    assert!(tree.find("2").unwrap().spouse().is_none());

    // Spouse names are never cross-linked to rows with the same name.
    let budi = tree.find("3").unwrap();
    assert_eq!(budi.spouse().unwrap().photo.as_deref(), Some("s.jpg"));
    assert!(budi.is_leaf());
    assert_eq!(tree.len(), 3);
}

#[test]
fn empty_input_has_no_root() {
    assert_eq!(resolve(&[]).unwrap_err(), ResolutionError::NoRootFound);
}

#[test]
fn duplicate_ids_are_rejected() {
    let records = rows(json!([
        { "id": 1, "nama": "A" },
        { "id": "2", "nama": "B" },
        { "id": "1", "nama": "C" }
    ]));

    assert_eq!(
        resolve(&records).unwrap_err(),
        ResolutionError::DuplicateId {
            id: "1".to_string()
        }
    );
}

#[test]
fn ids_are_compared_after_trimming() {
    let records = vec![PersonRecord::new("1", "A"), {
        let mut record = PersonRecord::new("x", "B");
        record.id = " 1 ".to_string();
        record
    }];

    assert!(matches!(
        resolve(&records),
        Err(ResolutionError::DuplicateId { ref id }) if id == "1"
    ));
}

#[test]
fn self_reference_by_id_is_rejected() {
    let records = vec![
        PersonRecord::new("1", "A"),
        PersonRecord::new("2", "B").with_parent_id("2"),
    ];

    assert_eq!(
        resolve(&records).unwrap_err(),
        ResolutionError::SelfParentReference {
            id: "2".to_string()
        }
    );
}

#[test]
fn self_reference_by_name_is_rejected() {
    let records = vec![
        PersonRecord::new("1", "A"),
        PersonRecord::new("2", "Budi").with_parent_ref("budi"),
    ];

    assert!(matches!(
        resolve(&records),
        Err(ResolutionError::SelfParentReference { ref id }) if id == "2"
    ));
}

#[test]
fn blank_id_is_rejected_with_position() {
    let records = rows(json!([
        { "id": "1", "nama": "A" },
        { "id": " ", "nama": "B" }
    ]));

    assert_eq!(
        resolve(&records).unwrap_err(),
        ResolutionError::MissingId { position: 1 }
    );
}

#[test]
fn mutual_parents_are_reported_as_cycle() {
    let records = vec![
        PersonRecord::new("1", "Root"),
        PersonRecord::new("2", "A").with_parent_id("3"),
        PersonRecord::new("3", "B").with_parent_id("2"),
        PersonRecord::new("4", "Below loop").with_parent_id("2"),
    ];

    assert_eq!(
        resolve(&records).unwrap_err(),
        ResolutionError::ParentCycle {
            ids: vec!["2".to_string(), "3".to_string()]
        }
    );
}

#[test]
fn shadowed_names_are_reported_and_first_row_keeps_the_name() {
    let records = vec![
        PersonRecord::new("1", "Ahmad"),
        PersonRecord::new("2", "ahmad ").with_parent_id("1"),
        PersonRecord::new("3", "Cucu").with_parent_ref("AHMAD"),
    ];

    let resolution = resolve(&records).unwrap();

    assert_eq!(
        resolution.tree.parent_of("3").map(PersonNode::id),
        Some("1")
    );
    let shadowed = &resolution.diagnostics.shadowed_names;
    assert_eq!(shadowed.len(), 1);
    assert_eq!(shadowed[0].key, "ahmad");
    assert_eq!(shadowed[0].kept_id, "1");
    assert_eq!(shadowed[0].shadowed_id, "2");
}

#[test]
fn reject_policy_reports_every_root_candidate() {
    let records = vec![
        PersonRecord::new("4", "Loner"),
        PersonRecord::new("1", "Founder"),
        PersonRecord::new("2", "Heir").with_parent_id("1"),
    ];
    let resolver = HierarchyResolver::new(ResolveOptions {
        orphan_policy: OrphanPolicy::Reject,
    });

    assert_eq!(
        resolver.resolve(&records).unwrap_err(),
        ResolutionError::MultipleRoots {
            ids: vec!["4".to_string(), "1".to_string()]
        }
    );
    assert!(resolver.resolve(&records[1..]).is_ok());
}

#[test]
fn resolution_is_idempotent_and_leaves_input_untouched() {
    let records = rows(json!([
        { "id": 1, "nama": "A", "pasangan": "Z" },
        { "id": 2, "nama": "B", "parent_id": 1 },
        { "id": 3, "nama": "C", "bin": "2" },
        { "id": 4, "nama": "D", "orang_tua": "b" },
        { "id": 5, "nama": "E" }
    ]));
    let snapshot = records.clone();

    let first = resolve(&records).unwrap();
    let second = resolve(&records).unwrap();

    assert_eq!(first, second);
    assert_eq!(records, snapshot);
}
