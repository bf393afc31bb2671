//! Document-level diff: compare two nested documents path by path.
//!
//! Mappings are compared key by key, sequences position by position. The
//! walk only descends while both sides have the same container kind; any
//! other mismatch is reported as a single `changed` record carrying the full
//! old and new values.

use otr_types::change::PATH_SEPARATOR;
use otr_types::{ChangeRecord, Document};
use serde_json::Map;

/// Compute the changes between `old` and `new`.
///
/// `base_path` is prepended verbatim to every emitted key, so callers pass
/// either an empty string or a prefix ending in `.` (for example `"0."`).
///
/// Ordering is deterministic: mapping keys follow the old document's key
/// order, followed by keys only present in the new document in their order;
/// sequence positions ascend.
pub fn diff_documents(old: &Document, new: &Document, base_path: &str) -> Vec<ChangeRecord> {
    let mut changes = Vec::new();
    diff_into(old, new, base_path, &mut changes);
    changes
}

fn diff_into(old: &Document, new: &Document, prefix: &str, out: &mut Vec<ChangeRecord>) {
    match (old, new) {
        (Document::Object(old_map), Document::Object(new_map)) => {
            diff_mappings(old_map, new_map, prefix, out)
        }
        (Document::Array(old_seq), Document::Array(new_seq)) => {
            diff_sequences(old_seq, new_seq, prefix, out)
        }
        _ => {
            if old != new {
                let key = prefix.strip_suffix(PATH_SEPARATOR).unwrap_or(prefix);
                out.push(ChangeRecord::changed(key, old.clone(), new.clone()));
            }
        }
    }
}

fn diff_mappings(
    old: &Map<String, Document>,
    new: &Map<String, Document>,
    prefix: &str,
    out: &mut Vec<ChangeRecord>,
) {
    // Removed and modified keys, in old order.
    for (key, old_val) in old {
        let path = format!("{prefix}{key}");
        match new.get(key) {
            Some(new_val) => diff_entry(old_val, new_val, path, out),
            None => out.push(ChangeRecord::removed(path, old_val.clone())),
        }
    }

    // Added keys, in new order.
    for (key, new_val) in new {
        if !old.contains_key(key) {
            out.push(ChangeRecord::added(format!("{prefix}{key}"), new_val.clone()));
        }
    }
}

fn diff_sequences(
    old: &[Document],
    new: &[Document],
    prefix: &str,
    out: &mut Vec<ChangeRecord>,
) {
    let shared = old.len().min(new.len());

    for (index, (old_val, new_val)) in old.iter().zip(new).enumerate() {
        diff_entry(old_val, new_val, format!("{prefix}{index}"), out);
    }

    for (index, new_val) in new.iter().enumerate().skip(shared) {
        out.push(ChangeRecord::added(format!("{prefix}{index}"), new_val.clone()));
    }

    for (index, old_val) in old.iter().enumerate().skip(shared) {
        out.push(ChangeRecord::removed(format!("{prefix}{index}"), old_val.clone()));
    }
}

/// Compare a value present on both sides at `path`.
fn diff_entry(old: &Document, new: &Document, path: String, out: &mut Vec<ChangeRecord>) {
    match (old, new) {
        (Document::Object(_), Document::Object(_)) | (Document::Array(_), Document::Array(_)) => {
            diff_into(old, new, &format!("{path}{PATH_SEPARATOR}"), out)
        }
        _ if old != new => out.push(ChangeRecord::changed(path, old.clone(), new.clone())),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use otr_types::Operation;
    use proptest::prelude::*;
    use serde_json::json;

    fn document() -> impl Strategy<Value = Document> {
        let leaf = prop_oneof![
            Just(Document::Null),
            any::<bool>().prop_map(Document::from),
            any::<i64>().prop_map(Document::from),
            "[a-z]{0,6}".prop_map(Document::from),
        ];
        leaf.prop_recursive(4, 32, 4, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..4).prop_map(Document::Array),
                prop::collection::btree_map("[a-c]{1,2}", inner, 0..4)
                    .prop_map(|m| Document::Object(m.into_iter().collect())),
            ]
        })
    }

    fn mapping() -> impl Strategy<Value = Document> {
        prop::collection::btree_map("[a-d]{1,2}", document(), 0..5)
            .prop_map(|m| Document::Object(m.into_iter().collect()))
    }

    /// `(key, payload)` pairs of one operation, sorted for comparison.
    fn keyed(records: &[ChangeRecord], op: Operation) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = records
            .iter()
            .filter(|r| r.operation == op)
            .map(|r| {
                let payload = match op {
                    Operation::Removed => &r.old_value,
                    _ => &r.value,
                };
                (r.key.clone(), format!("{payload:?}"))
            })
            .collect();
        out.sort();
        out
    }

    proptest! {
        #[test]
        fn identical_documents_no_diff(doc in document()) {
            prop_assert!(diff_documents(&doc, &doc, "").is_empty());
        }

        #[test]
        fn removals_mirror_additions(a in mapping(), b in mapping()) {
            let forward = diff_documents(&a, &b, "");
            let backward = diff_documents(&b, &a, "");

            prop_assert_eq!(
                keyed(&forward, Operation::Removed),
                keyed(&backward, Operation::Added)
            );
        }

        #[test]
        fn new_only_keys_added_with_full_subtree(a in mapping(), b in mapping()) {
            let changes = diff_documents(&a, &b, "");
            let (old_map, new_map) = (a.as_object().unwrap(), b.as_object().unwrap());

            for (key, value) in new_map.iter().filter(|(k, _)| !old_map.contains_key(*k)) {
                let matching: Vec<_> = changes.iter().filter(|r| &r.key == key).collect();
                prop_assert_eq!(matching.len(), 1);
                prop_assert_eq!(matching[0].operation, Operation::Added);
                prop_assert_eq!(matching[0].value.as_ref(), Some(value));
            }
        }

        #[test]
        fn every_record_is_consistent(a in document(), b in document()) {
            for record in diff_documents(&a, &b, "") {
                prop_assert!(record.validate().is_ok());
            }
        }
    }

    #[test]
    fn changed_keys_precede_new_only_keys() {
        let old = json!({"status": "A"});
        let new = json!({"status": "B", "vin": "X"});

        let changes = diff_documents(&old, &new, "");
        assert_eq!(
            changes,
            vec![
                ChangeRecord::changed("status", json!("A"), json!("B")),
                ChangeRecord::added("vin", json!("X")),
            ]
        );
    }

    #[test]
    fn key_order_follows_old_then_new() {
        let old = json!({"z": 1, "a": 1, "m": 1});
        let new = json!({"q": 2, "m": 2, "a": 1, "b": 2});

        let keys: Vec<_> = diff_documents(&old, &new, "")
            .into_iter()
            .map(|r| (r.operation, r.key))
            .collect();
        assert_eq!(
            keys,
            vec![
                (Operation::Removed, "z".to_string()),
                (Operation::Changed, "m".to_string()),
                (Operation::Added, "q".to_string()),
                (Operation::Added, "b".to_string()),
            ]
        );
    }

    #[test]
    fn nested_paths_are_dot_joined() {
        let old = json!({"details": {"tasks": {"registration": {"orderDetails": {"vin": null}}}}});
        let new = json!({"details": {"tasks": {"registration": {"orderDetails": {"vin": "5YJ"}}}}});

        let changes = diff_documents(&old, &new, "0.");
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].key, "0.details.tasks.registration.orderDetails.vin");
        assert_eq!(changes[0].operation, Operation::Changed);
        assert_eq!(changes[0].old_value, Some(json!(null)));
    }

    #[test]
    fn sequence_positions_become_segments() {
        let old = json!({"items": [{"n": 1}, {"n": 2}, 3]});
        let new = json!({"items": [{"n": 1}, {"n": 5}]});

        let changes = diff_documents(&old, &new, "");
        assert_eq!(
            changes,
            vec![
                ChangeRecord::changed("items.1.n", json!(2), json!(5)),
                ChangeRecord::removed("items.2", json!(3)),
            ]
        );
    }

    #[test]
    fn trailing_sequence_elements_added() {
        let changes = diff_documents(&json!([1]), &json!([1, [2], {"x": 3}]), "");
        assert_eq!(
            changes,
            vec![
                ChangeRecord::added("1", json!([2])),
                ChangeRecord::added("2", json!({"x": 3})),
            ]
        );
    }

    #[test]
    fn type_mismatch_stops_recursion() {
        let old = json!({"payment": {"amount": 10}});
        let new = json!({"payment": [10]});

        let changes = diff_documents(&old, &new, "");
        assert_eq!(
            changes,
            vec![ChangeRecord::changed("payment", json!({"amount": 10}), json!([10]))]
        );
    }

    #[test]
    fn null_differs_from_absent() {
        let changes = diff_documents(&json!({}), &json!({"eta": null}), "");
        assert_eq!(changes, vec![ChangeRecord::added("eta", json!(null))]);

        let changes = diff_documents(&json!({"eta": null}), &json!({"eta": "soon"}), "");
        assert_eq!(changes, vec![ChangeRecord::changed("eta", json!(null), json!("soon"))]);
    }

    #[test]
    fn empty_containers_are_not_absent() {
        let changes = diff_documents(&json!({}), &json!({"tasks": {}, "parts": []}), "");
        assert_eq!(
            changes,
            vec![
                ChangeRecord::added("tasks", json!({})),
                ChangeRecord::added("parts", json!([])),
            ]
        );

        let changes = diff_documents(&json!({"tasks": {}}), &json!({"tasks": {"a": 1}}), "");
        assert_eq!(changes, vec![ChangeRecord::added("tasks.a", json!(1))]);
    }

    #[test]
    fn top_level_scalar_mismatch_uses_base_path() {
        let changes = diff_documents(&json!(1), &json!("one"), "3.");
        assert_eq!(changes, vec![ChangeRecord::changed("3", json!(1), json!("one"))]);
    }

    #[test]
    fn numeric_equality_is_by_value() {
        assert!(diff_documents(&json!({"odo": 30}), &json!({"odo": 30}), "").is_empty());
        assert_eq!(diff_documents(&json!({"odo": 30}), &json!({"odo": 31}), "").len(), 1);
    }
}
