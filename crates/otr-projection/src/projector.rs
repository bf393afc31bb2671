use otr_history::HistoryStore;
use otr_types::{ChangeRecord, Document, HistoryLog, Operation};
use serde::Serialize;
use tracing::debug;

use crate::policy::TranslationPolicy;
use crate::timestamp::display_date;

/// A history record prepared for display.
///
/// `key` holds the translated label when the policy has one, otherwise the
/// entity-relative path.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ProjectedChange {
    pub timestamp: String,
    pub operation: Operation,
    pub key: String,
    pub value: Option<Document>,
    pub old_value: Option<Document>,
}

/// Builds per-entity projections of the history log.
pub struct HistoryProjector;

impl HistoryProjector {
    /// Project every record of `entity_id` through `policy`.
    ///
    /// Output follows log order, then record order within each entry.
    pub fn project(
        log: &HistoryLog,
        entity_id: &str,
        policy: &TranslationPolicy,
    ) -> Vec<ProjectedChange> {
        let projected: Vec<ProjectedChange> = log
            .iter()
            .flat_map(move |entry| {
                entry
                    .records()
                    .filter_map(move |record| project_record(record, entity_id, policy))
                    .map(move |change| ProjectedChange {
                        timestamp: entry.timestamp.clone(),
                        ..change
                    })
            })
            .collect();

        debug!(
            entity = entity_id,
            total = log.change_count(),
            shown = projected.len(),
            "projected history"
        );
        projected
    }

    /// Load the log from `store` and project it.
    pub fn from_store<S: HistoryStore + ?Sized>(
        store: &S,
        entity_id: &str,
        policy: &TranslationPolicy,
    ) -> Vec<ProjectedChange> {
        Self::project(&store.load(), entity_id, policy)
    }
}

/// Apply the policy to one record. The timestamp is filled in by the caller.
fn project_record(
    record: &ChangeRecord,
    entity_id: &str,
    policy: &TranslationPolicy,
) -> Option<ProjectedChange> {
    // Entity-level records have no remaining path and keep the entity id.
    let (head, path) = record.split_entity();
    if head != entity_id {
        return None;
    }

    if !policy.verbose && (policy.is_ignored(path) || !policy.is_allowed(path)) {
        return None;
    }

    let mut value = record.value.clone();
    let mut old_value = record.old_value.clone();

    if policy.redact && policy.is_anonymous(path) {
        redact_string(&mut value);
        redact_string(&mut old_value);
    }

    Some(ProjectedChange {
        timestamp: String::new(),
        operation: record.operation,
        key: policy.label(path).unwrap_or(path).to_string(),
        value: value.map(reformat_datetime),
        old_value: old_value.map(reformat_datetime),
    })
}

fn redact_string(payload: &mut Option<Document>) {
    if matches!(payload, Some(Document::String(_))) {
        *payload = None;
    }
}

fn reformat_datetime(payload: Document) -> Document {
    match payload {
        Document::String(raw) => match display_date(&raw) {
            Some(formatted) => Document::String(formatted),
            None => Document::String(raw),
        },
        other => other,
    }
}
