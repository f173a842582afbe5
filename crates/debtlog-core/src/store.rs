//! In-memory store of debt entries.
//!
//! The store keeps entries in insertion order. Every ordered view is
//! derived on demand with a stable sort, so entries with equal priority
//! always appear in the order they were added.

use tracing::debug;

use crate::error::AddError;
use crate::id::{Clock, EntryId, IdAllocator, SystemClock};
use crate::model::{Category, DebtEntry, Effort, EntryDraft};
use crate::score::{Priority, compute_priority};
use crate::summary::{DEFAULT_HIGH_PRIORITY_THRESHOLD, Report, Summary};

/// Whether views render placeholder or computed content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreState {
    Empty,
    NonEmpty,
}

/// Ordered collection of debt entries owned by one session.
#[derive(Debug)]
pub struct ItemStore<C = SystemClock> {
    entries: Vec<DebtEntry>,
    ids: IdAllocator<C>,
}

impl Default for ItemStore<SystemClock> {
    fn default() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl ItemStore<SystemClock> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock> ItemStore<C> {
    pub const fn with_clock(clock: C) -> Self {
        Self {
            entries: Vec::new(),
            ids: IdAllocator::new(clock),
        }
    }

    /// Validate a draft and append it as a new entry.
    ///
    /// On rejection the store is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`AddError`] when the category, description, or effort is
    /// missing. A whitespace-only description counts as missing.
    pub fn add(&mut self, draft: &EntryDraft) -> Result<&DebtEntry, AddError> {
        let (category, effort) = match validate(draft) {
            Ok(fields) => fields,
            Err(err) => {
                debug!(reason = %err, "entry rejected");
                return Err(err);
            }
        };

        let id = self.ids.next_id();
        let priority = compute_priority(draft.impact, effort, draft.business_risk);
        debug!(%id, %category, %priority, "entry added");

        self.entries.push(DebtEntry::new(
            id,
            category,
            draft.description.clone(),
            draft.impact,
            effort,
            draft.business_risk,
            priority,
        ));
        Ok(&self.entries[self.entries.len() - 1])
    }
}

fn validate(draft: &EntryDraft) -> Result<(Category, Effort), AddError> {
    let category = draft.category.ok_or(AddError::MissingCategory)?;
    if draft.description.trim().is_empty() {
        return Err(AddError::MissingDescription);
    }
    let effort = draft.effort.ok_or(AddError::MissingEffort)?;
    Ok((category, effort))
}

impl<C> ItemStore<C> {
    /// Delete the entry with `id`. Absent ids are a no-op.
    pub fn remove(&mut self, id: EntryId) -> Option<DebtEntry> {
        let index = self.entries.iter().position(|entry| entry.id() == id)?;
        let removed = self.entries.remove(index);
        debug!(%id, remaining = self.entries.len(), "entry removed");
        Some(removed)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn state(&self) -> StoreState {
        if self.entries.is_empty() {
            StoreState::Empty
        } else {
            StoreState::NonEmpty
        }
    }

    #[must_use]
    pub fn get(&self, id: EntryId) -> Option<&DebtEntry> {
        self.entries.iter().find(|entry| entry.id() == id)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &DebtEntry> {
        self.entries.iter()
    }

    /// All entries, highest priority first. Ties keep insertion order.
    #[must_use]
    pub fn list_by_priority_descending(&self) -> Vec<&DebtEntry> {
        let mut sorted: Vec<&DebtEntry> = self.entries.iter().collect();
        sorted.sort_by(|a, b| b.priority().cmp(&a.priority()));
        sorted
    }

    /// The first `n` entries of [`list_by_priority_descending`](Self::list_by_priority_descending).
    #[must_use]
    pub fn top_n(&self, n: usize) -> Vec<&DebtEntry> {
        let mut sorted = self.list_by_priority_descending();
        sorted.truncate(n);
        sorted
    }

    /// Aggregate statistics using the default high-priority threshold.
    #[must_use]
    pub fn summarize(&self) -> Summary {
        self.summarize_with(DEFAULT_HIGH_PRIORITY_THRESHOLD)
    }

    #[must_use]
    pub fn summarize_with(&self, high_priority_threshold: Priority) -> Summary {
        Summary::from_entries(&self.entries, high_priority_threshold)
    }

    /// Build the stakeholder report with the `top_n` highest-priority entries.
    #[must_use]
    pub fn report(&self, top_n: usize, high_priority_threshold: Priority) -> Report<'_> {
        Report::new(
            self.summarize_with(high_priority_threshold),
            self.top_n(top_n),
            high_priority_threshold,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::testing::ManualClock;
    use crate::model::{BusinessRisk, Impact};

    fn draft(
        category: Category,
        description: &str,
        impact: Impact,
        effort: Effort,
        risk: BusinessRisk,
    ) -> EntryDraft {
        EntryDraft {
            category: Some(category),
            description: description.to_string(),
            impact: Some(impact),
            effort: Some(effort),
            business_risk: Some(risk),
        }
    }

    fn testing_draft() -> EntryDraft {
        draft(
            Category::Testing,
            "flaky checkout tests",
            Impact::High,
            Effort::Months,
            BusinessRisk::Medium,
        )
    }

    fn security_draft() -> EntryDraft {
        draft(
            Category::Security,
            "hardcoded API key",
            Impact::Critical,
            Effort::Weeks,
            BusinessRisk::High,
        )
    }

    #[test]
    fn add_assigns_id_and_priority() {
        let clock = ManualClock::at(1_700_000_000_000);
        let mut store = ItemStore::with_clock(&clock);

        let entry = store.add(&testing_draft()).unwrap();
        assert_eq!(entry.id().as_u64(), 1_700_000_000_000);
        assert_eq!(entry.priority(), Priority::from_tenths(24));
        assert_eq!(entry.category(), Category::Testing);
        assert_eq!(store.len(), 1);
        assert_eq!(store.state(), StoreState::NonEmpty);
    }

    #[test]
    fn add_rejects_missing_category_without_mutating() {
        let mut store = ItemStore::new();
        let mut d = testing_draft();
        d.category = None;
        assert_eq!(store.add(&d).unwrap_err(), AddError::MissingCategory);
        assert!(store.is_empty());
        assert_eq!(store.state(), StoreState::Empty);
    }

    #[test]
    fn add_rejects_blank_description_without_mutating() {
        let mut store = ItemStore::new();
        for description in ["", "   ", "\n\t"] {
            let mut d = testing_draft();
            d.description = description.to_string();
            assert_eq!(store.add(&d).unwrap_err(), AddError::MissingDescription);
        }
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn unset_effort_is_rejected_instead_of_dividing_by_zero() {
        let mut store = ItemStore::new();
        let mut d = testing_draft();
        d.effort = None;
        assert_eq!(store.add(&d).unwrap_err(), AddError::MissingEffort);
        assert!(store.is_empty());
    }

    #[test]
    fn category_is_checked_before_description() {
        let mut store = ItemStore::new();
        let d = EntryDraft::default();
        assert_eq!(store.add(&d).unwrap_err(), AddError::MissingCategory);
    }

    #[test]
    fn unset_impact_and_risk_are_accepted() {
        let mut store = ItemStore::new();
        let d = EntryDraft {
            category: Some(Category::Documentation),
            description: "no onboarding guide".to_string(),
            effort: Some(Effort::Weeks),
            ..EntryDraft::default()
        };
        let entry = store.add(&d).unwrap();
        assert_eq!(entry.priority(), Priority::ZERO);
        assert!(entry.impact().is_none());
        assert!(entry.business_risk().is_none());
    }

    #[test]
    fn ids_are_unique_within_one_millisecond() {
        let clock = ManualClock::at(5);
        let mut store = ItemStore::with_clock(&clock);
        let a = store.add(&testing_draft()).unwrap().id();
        let b = store.add(&testing_draft()).unwrap().id();
        assert_ne!(a, b);
    }

    #[test]
    fn remove_deletes_only_the_matching_entry() {
        let clock = ManualClock::at(100);
        let mut store = ItemStore::with_clock(&clock);
        let a = store.add(&testing_draft()).unwrap().id();
        let b = store.add(&security_draft()).unwrap().id();

        let removed = store.remove(a).unwrap();
        assert_eq!(removed.id(), a);
        assert_eq!(store.len(), 1);
        assert!(store.get(a).is_none());
        assert!(store.get(b).is_some());
    }

    #[test]
    fn remove_absent_id_is_a_noop() {
        let mut store = ItemStore::new();
        store.add(&testing_draft()).unwrap();
        let before: Vec<_> = store.iter().cloned().collect();

        assert!(store.remove(EntryId::new(1)).is_none());
        let after: Vec<_> = store.iter().cloned().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn higher_priority_sorts_first() {
        let mut store = ItemStore::new();
        store.add(&testing_draft()).unwrap();
        store.add(&security_draft()).unwrap();

        let sorted = store.list_by_priority_descending();
        assert_eq!(sorted[0].priority().tenths(), 75);
        assert_eq!(sorted[1].priority().to_string(), "2.4");
        // storage order is untouched
        assert_eq!(store.iter().next().unwrap().category(), Category::Testing);
    }

    #[test]
    fn equal_priorities_keep_insertion_order() {
        let clock = ManualClock::at(10);
        let mut store = ItemStore::with_clock(&clock);
        let first = store.add(&testing_draft()).unwrap().id();
        store.add(&security_draft()).unwrap();
        let mut same = testing_draft();
        same.category = Some(Category::Performance);
        let second = store.add(&same).unwrap().id();

        for _ in 0..3 {
            let ids: Vec<EntryId> = store
                .list_by_priority_descending()
                .iter()
                .filter(|e| e.priority() == Priority::from_tenths(24))
                .map(|e| e.id())
                .collect();
            assert_eq!(ids, vec![first, second]);
        }
    }

    #[test]
    fn top_n_truncates_sorted_view() {
        let mut store = ItemStore::new();
        store.add(&testing_draft()).unwrap();
        store.add(&security_draft()).unwrap();
        store.add(&testing_draft()).unwrap();

        let top = store.top_n(2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].category(), Category::Security);
        assert_eq!(store.top_n(10).len(), 3);
        assert!(store.top_n(0).is_empty());
    }
}
