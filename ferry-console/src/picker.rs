//! Remote picker
//!
//! A searchable multi-select over entities fetched live from the source
//! system. Checked state is an explicit set of normalized identifier keys,
//! independent of what the current filter shows, so filtering can never
//! lose a selection.
//!
//! Each open starts a new session. A fetch response carries the session id
//! it was issued for and is dropped when a newer session has replaced it.

use ferry_core::domain::entity::{EntityItem, EntityType, canonical_selection, selection_set};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// Identifies one picker session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PickerError {
    #[error("No picker is open")]
    NoSession,
    #[error("Picker items are not loaded")]
    NotLoaded,
    #[error("No item with id '{0}' in the picker")]
    UnknownItem(String),
}

/// Confirmed selection to write back into the identifier field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub entity_type: EntityType,
    pub value: String,
}

/// One visible candidate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerRow {
    pub id: String,
    pub label: String,
    pub checked: bool,
}

/// What the picker currently shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerView {
    Closed,
    Loading {
        entity_type: EntityType,
        filter: String,
    },
    Failed {
        entity_type: EntityType,
        error: String,
    },
    Ready {
        entity_type: EntityType,
        filter: String,
        rows: Vec<PickerRow>,
        /// Candidates in the full list, filtered or not
        total: usize,
        /// Checked candidates in the full list, filtered or not
        selected: usize,
    },
}

#[derive(Debug)]
enum Candidates {
    Loading,
    Failed(String),
    Ready(Vec<EntityItem>),
}

#[derive(Debug)]
struct PickerSession {
    id: SessionId,
    entity_type: EntityType,
    existing: String,
    candidates: Candidates,
    selected: HashSet<String>,
    filter: String,
}

impl PickerSession {
    fn items(&self) -> Result<&[EntityItem], PickerError> {
        match &self.candidates {
            Candidates::Ready(items) => Ok(items),
            _ => Err(PickerError::NotLoaded),
        }
    }
}

#[derive(Debug, Default)]
pub struct Picker {
    last_id: u64,
    session: Option<PickerSession>,
}

impl Picker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a new session, superseding any open one
    ///
    /// `existing` is the identifier field's current text; it decides which
    /// candidates start checked once the fetch completes.
    pub fn open(&mut self, entity_type: EntityType, existing: &str) -> SessionId {
        self.last_id += 1;
        let id = SessionId(self.last_id);

        if let Some(previous) = self.session.take() {
            tracing::debug!("Picker session {} superseded by {}", previous.id, id);
        }

        self.session = Some(PickerSession {
            id,
            entity_type,
            existing: existing.to_string(),
            candidates: Candidates::Loading,
            selected: HashSet::new(),
            filter: String::new(),
        });
        id
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Populates the session a fetch was issued for
    ///
    /// Returns false, leaving the picker untouched, when that session is no
    /// longer the current one.
    pub fn apply_fetch(&mut self, id: SessionId, result: Result<Vec<EntityItem>, String>) -> bool {
        let Some(session) = self.session.as_mut().filter(|s| s.id == id) else {
            tracing::debug!("Discarding fetch response for stale picker session {}", id);
            return false;
        };

        match result {
            Ok(items) => {
                let existing = selection_set(&session.existing);
                session.selected = items
                    .iter()
                    .map(|item| item.id.key())
                    .filter(|key| existing.contains(key))
                    .collect();
                tracing::debug!(
                    "Picker session {} loaded {} {} ({} preselected)",
                    id,
                    items.len(),
                    session.entity_type,
                    session.selected.len()
                );
                session.candidates = Candidates::Ready(items);
            }
            Err(error) => session.candidates = Candidates::Failed(error),
        }
        true
    }

    pub fn filter(&mut self, term: &str) -> Result<(), PickerError> {
        let session = self.session.as_mut().ok_or(PickerError::NoSession)?;
        session.filter = term.trim().to_string();
        Ok(())
    }

    /// Flips one candidate, returning whether it is now checked
    pub fn toggle(&mut self, id: &str) -> Result<bool, PickerError> {
        let session = self.session.as_mut().ok_or(PickerError::NoSession)?;
        let key = id.trim();
        if !session.items()?.iter().any(|item| item.id.key() == key) {
            return Err(PickerError::UnknownItem(key.to_string()));
        }

        if session.selected.remove(key) {
            Ok(false)
        } else {
            session.selected.insert(key.to_string());
            Ok(true)
        }
    }

    /// Checks every candidate, including the ones the filter hides
    pub fn select_all(&mut self) -> Result<(), PickerError> {
        let session = self.session.as_mut().ok_or(PickerError::NoSession)?;
        let keys: HashSet<String> = session.items()?.iter().map(|item| item.id.key()).collect();
        session.selected = keys;
        Ok(())
    }

    pub fn deselect_all(&mut self) -> Result<(), PickerError> {
        let session = self.session.as_mut().ok_or(PickerError::NoSession)?;
        session.items()?;
        session.selected.clear();
        Ok(())
    }

    /// Closes the session and returns the checked ids in candidate order
    ///
    /// Fails, leaving the session open, while nothing is loaded.
    pub fn confirm(&mut self) -> Result<Selection, PickerError> {
        let session = self.session.as_ref().ok_or(PickerError::NoSession)?;
        let value = canonical_selection(
            session
                .items()?
                .iter()
                .map(|item| item.id.key())
                .filter(|key| session.selected.contains(key)),
        );
        let selection = Selection {
            entity_type: session.entity_type,
            value,
        };

        self.session = None;
        Ok(selection)
    }

    /// Closes the session without producing a selection
    pub fn cancel(&mut self) -> bool {
        self.session.take().is_some()
    }

    pub fn view(&self) -> PickerView {
        let Some(session) = &self.session else {
            return PickerView::Closed;
        };

        match &session.candidates {
            Candidates::Loading => PickerView::Loading {
                entity_type: session.entity_type,
                filter: session.filter.clone(),
            },
            Candidates::Failed(error) => PickerView::Failed {
                entity_type: session.entity_type,
                error: error.clone(),
            },
            Candidates::Ready(items) => {
                let term = session.filter.to_lowercase();
                let rows = items
                    .iter()
                    .filter(|item| term.is_empty() || item.label.to_lowercase().contains(&term))
                    .map(|item| {
                        let id = item.id.key();
                        PickerRow {
                            checked: session.selected.contains(&id),
                            id,
                            label: item.label.clone(),
                        }
                    })
                    .collect();

                PickerView::Ready {
                    entity_type: session.entity_type,
                    filter: session.filter.clone(),
                    rows,
                    total: items.len(),
                    selected: session.selected.len(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<EntityItem> {
        vec![
            EntityItem::new(3i64, "[3] Blue Shirt"),
            EntityItem::new("7", "[7] Red Shirt"),
            EntityItem::new(9i64, "[9] Green Hat"),
        ]
    }

    fn loaded(existing: &str) -> Picker {
        let mut picker = Picker::new();
        let id = picker.open(EntityType::Products, existing);
        assert!(picker.apply_fetch(id, Ok(candidates())));
        picker
    }

    fn checked(picker: &Picker) -> Vec<(String, bool)> {
        match picker.view() {
            PickerView::Ready { rows, .. } => rows.into_iter().map(|r| (r.id, r.checked)).collect(),
            other => panic!("picker not ready: {:?}", other),
        }
    }

    #[test]
    fn test_open_shows_loading() {
        let mut picker = Picker::new();
        picker.open(EntityType::Orders, "");

        assert_eq!(
            picker.view(),
            PickerView::Loading {
                entity_type: EntityType::Orders,
                filter: String::new()
            }
        );
    }

    #[test]
    fn test_preselection_matches_numbers_and_strings() {
        let picker = loaded("3, 7");

        assert_eq!(
            checked(&picker),
            vec![
                ("3".to_string(), true),
                ("7".to_string(), true),
                ("9".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_filter_never_loses_checked_state() {
        let mut picker = loaded("3, 7");

        picker.filter("hat").unwrap();
        assert_eq!(checked(&picker), vec![("9".to_string(), false)]);

        picker.filter("").unwrap();
        assert_eq!(
            checked(&picker),
            vec![
                ("3".to_string(), true),
                ("7".to_string(), true),
                ("9".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_filter_is_case_insensitive() {
        let mut picker = loaded("");
        picker.filter("SHIRT").unwrap();

        assert_eq!(checked(&picker).len(), 2);
    }

    #[test]
    fn test_confirm_counts_hidden_checked_items() {
        let mut picker = loaded("");
        picker.toggle("3").unwrap();
        picker.toggle("9").unwrap();
        picker.filter("hat").unwrap();

        let selection = picker.confirm().unwrap();
        assert_eq!(selection.value, "3, 9");
        assert!(!picker.is_open());
    }

    #[test]
    fn test_confirm_uses_candidate_order() {
        let mut picker = loaded("9, 3");

        assert_eq!(picker.confirm().unwrap().value, "3, 9");
    }

    #[test]
    fn test_confirm_drops_ids_missing_from_candidates() {
        let mut picker = loaded("3, 42");

        assert_eq!(picker.confirm().unwrap().value, "3");
    }

    #[test]
    fn test_open_confirm_round_trip() {
        let mut picker = loaded("7");
        picker.toggle("3").unwrap();
        let before = checked(&picker);
        let selection = picker.confirm().unwrap();

        assert_eq!(
            selection,
            Selection {
                entity_type: EntityType::Products,
                value: "3, 7".to_string()
            }
        );

        let id = picker.open(EntityType::Products, &selection.value);
        assert!(picker.apply_fetch(id, Ok(candidates())));
        assert_eq!(checked(&picker), before);
    }

    #[test]
    fn test_toggle() {
        let mut picker = loaded("3");

        assert_eq!(picker.toggle("3"), Ok(false));
        assert_eq!(picker.toggle(" 7 "), Ok(true));
        assert_eq!(
            picker.toggle("42"),
            Err(PickerError::UnknownItem("42".to_string()))
        );
        assert_eq!(picker.confirm().unwrap().value, "7");
    }

    #[test]
    fn test_select_all_ignores_filter() {
        let mut picker = loaded("");
        picker.filter("hat").unwrap();
        picker.select_all().unwrap();

        assert_eq!(picker.confirm().unwrap().value, "3, 7, 9");
    }

    #[test]
    fn test_deselect_all() {
        let mut picker = loaded("3, 7, 9");
        picker.deselect_all().unwrap();

        assert_eq!(picker.confirm().unwrap().value, "");
    }

    #[test]
    fn test_superseded_response_is_discarded() {
        let mut picker = Picker::new();
        let first = picker.open(EntityType::Products, "3");
        let second = picker.open(EntityType::Customers, "");

        assert!(!picker.apply_fetch(first, Ok(candidates())));
        assert_eq!(
            picker.view(),
            PickerView::Loading {
                entity_type: EntityType::Customers,
                filter: String::new()
            }
        );

        assert!(picker.apply_fetch(second, Ok(vec![EntityItem::new(1i64, "[1] Ada")])));
        assert_eq!(checked(&picker), vec![("1".to_string(), false)]);
    }

    #[test]
    fn test_response_after_cancel_is_discarded() {
        let mut picker = Picker::new();
        let id = picker.open(EntityType::Products, "");
        assert!(picker.cancel());

        assert!(!picker.apply_fetch(id, Ok(candidates())));
        assert_eq!(picker.view(), PickerView::Closed);
    }

    #[test]
    fn test_fetch_failure_keeps_session_open() {
        let mut picker = Picker::new();
        let id = picker.open(EntityType::Orders, "");
        picker.apply_fetch(id, Err("Not authenticated with Magento".to_string()));

        assert_eq!(
            picker.view(),
            PickerView::Failed {
                entity_type: EntityType::Orders,
                error: "Not authenticated with Magento".to_string()
            }
        );
        assert!(picker.is_open());
        assert_eq!(picker.confirm(), Err(PickerError::NotLoaded));
        assert!(picker.is_open());
    }

    #[test]
    fn test_confirm_while_loading_fails() {
        let mut picker = Picker::new();
        picker.open(EntityType::Orders, "1");

        assert_eq!(picker.confirm(), Err(PickerError::NotLoaded));
        assert_eq!(picker.toggle("1"), Err(PickerError::NotLoaded));
    }

    #[test]
    fn test_commands_without_session() {
        let mut picker = Picker::new();

        assert_eq!(picker.filter("x"), Err(PickerError::NoSession));
        assert_eq!(picker.confirm(), Err(PickerError::NoSession));
        assert!(!picker.cancel());
    }

    #[test]
    fn test_ready_view_counts() {
        let mut picker = loaded("3, 7");
        picker.filter("hat").unwrap();

        match picker.view() {
            PickerView::Ready {
                total, selected, rows, ..
            } => {
                assert_eq!(total, 3);
                assert_eq!(selected, 2);
                assert_eq!(rows.len(), 1);
            }
            other => panic!("picker not ready: {:?}", other),
        }
    }
}
