use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::TypeError;
use crate::Document;

/// Path separator used in change record keys.
pub const PATH_SEPARATOR: char = '.';

/// Kind of difference a [`ChangeRecord`] describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    /// The path exists only in the new document.
    Added,
    /// The path exists only in the old document.
    Removed,
    /// The path exists in both documents with different values.
    Changed,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Removed => "removed",
            Self::Changed => "changed",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Operation {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "added" => Ok(Self::Added),
            "removed" => Ok(Self::Removed),
            "changed" => Ok(Self::Changed),
            other => Err(TypeError::UnknownOperation(other.to_string())),
        }
    }
}

/// One detected difference between two documents.
///
/// `key` is the dot-joined path from the document root, with sequence
/// positions rendered as integer segments (`0.details.tasks.0.status`).
///
/// Payload presence follows the operation:
/// - `Added`: `value` set, `old_value` absent
/// - `Removed`: `old_value` set, `value` absent
/// - `Changed`: both set and different
///
/// A payload that is present but JSON `null` is kept as `Some(Value::Null)`
/// so that "set to null" and "absent" survive a round trip through the log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub operation: Operation,
    pub key: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_payload"
    )]
    pub value: Option<Document>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "present_payload"
    )]
    pub old_value: Option<Document>,
}

fn present_payload<'de, D>(deserializer: D) -> Result<Option<Document>, D::Error>
where
    D: Deserializer<'de>,
{
    Document::deserialize(deserializer).map(Some)
}

impl ChangeRecord {
    /// A path that only exists in the new document.
    pub fn added(key: impl Into<String>, value: Document) -> Self {
        Self {
            operation: Operation::Added,
            key: key.into(),
            value: Some(value),
            old_value: None,
        }
    }

    /// A path that only exists in the old document.
    pub fn removed(key: impl Into<String>, old_value: Document) -> Self {
        Self {
            operation: Operation::Removed,
            key: key.into(),
            value: None,
            old_value: Some(old_value),
        }
    }

    /// A path whose value differs between the two documents.
    pub fn changed(key: impl Into<String>, old_value: Document, value: Document) -> Self {
        Self {
            operation: Operation::Changed,
            key: key.into(),
            value: Some(value),
            old_value: Some(old_value),
        }
    }

    /// A whole entity appeared at list position `index`.
    pub fn entity_added(index: usize, entity: Document) -> Self {
        Self::added(index.to_string(), entity)
    }

    /// A whole entity disappeared from list position `index`.
    pub fn entity_removed(index: usize, entity: Document) -> Self {
        Self::removed(index.to_string(), entity)
    }

    /// Split the key into its leading segment (the entity position for
    /// records produced from entity lists) and the entity-relative path.
    ///
    /// Entity-level keys have no remaining path; both halves are the key.
    pub fn split_entity(&self) -> (&str, &str) {
        self.key
            .split_once(PATH_SEPARATOR)
            .unwrap_or((self.key.as_str(), self.key.as_str()))
    }

    /// Returns `true` if the key addresses a whole entity rather than a field.
    pub fn is_entity_level(&self) -> bool {
        !self.key.contains(PATH_SEPARATOR)
    }

    /// Check the payload invariant for this record's operation.
    ///
    /// Entity-level `added`/`removed` records may omit their payload; older
    /// logs recorded list growth and shrinkage without one.
    pub fn validate(&self) -> Result<(), TypeError> {
        let inconsistent = |reason: &str| TypeError::InconsistentRecord {
            key: self.key.clone(),
            reason: reason.to_string(),
        };

        match self.operation {
            Operation::Added => {
                if self.old_value.is_some() {
                    return Err(inconsistent("added record carries old_value"));
                }
                if self.value.is_none() && !self.is_entity_level() {
                    return Err(inconsistent("added record has no value"));
                }
            }
            Operation::Removed => {
                if self.value.is_some() {
                    return Err(inconsistent("removed record carries value"));
                }
                if self.old_value.is_none() && !self.is_entity_level() {
                    return Err(inconsistent("removed record has no old_value"));
                }
            }
            Operation::Changed => match (&self.old_value, &self.value) {
                (Some(old), Some(new)) if old != new => {}
                (Some(_), Some(_)) => return Err(inconsistent("changed record with equal values")),
                _ => return Err(inconsistent("changed record needs both values")),
            },
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn operation_display_and_parse() {
        for op in [Operation::Added, Operation::Removed, Operation::Changed] {
            assert_eq!(op.to_string().parse::<Operation>().unwrap(), op);
        }
        assert_eq!(
            "moved".parse::<Operation>(),
            Err(TypeError::UnknownOperation("moved".into()))
        );
    }

    #[test]
    fn serializes_fields_in_wire_order() {
        let record = ChangeRecord::changed("status", json!("A"), json!("B"));
        let encoded = serde_json::to_string(&record).unwrap();
        assert_eq!(
            encoded,
            r#"{"operation":"changed","key":"status","value":"B","old_value":"A"}"#
        );
    }

    #[test]
    fn absent_payloads_are_omitted() {
        let record = ChangeRecord::added("vin", json!("X"));
        let encoded = serde_json::to_value(&record).unwrap();
        assert_eq!(encoded, json!({"operation": "added", "key": "vin", "value": "X"}));
    }

    #[test]
    fn null_payload_is_distinct_from_absent() {
        let record: ChangeRecord =
            serde_json::from_str(r#"{"operation":"added","key":"a.b","value":null}"#).unwrap();
        assert_eq!(record.value, Some(json!(null)));
        assert_eq!(record.old_value, None);

        let encoded = serde_json::to_string(&record).unwrap();
        assert!(encoded.contains(r#""value":null"#));
        assert!(!encoded.contains("old_value"));
    }

    #[test]
    fn legacy_entity_record_without_payload() {
        let record: ChangeRecord =
            serde_json::from_str(r#"{"operation":"removed","key":"2"}"#).unwrap();
        assert!(record.is_entity_level());
        assert_eq!(record.split_entity(), ("2", "2"));
        assert!(record.validate().is_ok());
    }

    #[test]
    fn split_entity_on_first_separator() {
        let record = ChangeRecord::added("0.details.vin", json!("X"));
        assert_eq!(record.split_entity(), ("0", "details.vin"));
        assert!(!record.is_entity_level());
    }

    #[test]
    fn validate_rejects_broken_invariants() {
        assert!(ChangeRecord::changed("a", json!(1), json!(1)).validate().is_err());

        let mut record = ChangeRecord::added("a.b", json!(1));
        record.old_value = Some(json!(0));
        assert!(record.validate().is_err());

        let field_removal = ChangeRecord {
            operation: Operation::Removed,
            key: "0.a".into(),
            value: None,
            old_value: None,
        };
        assert!(field_removal.validate().is_err());
    }
}
