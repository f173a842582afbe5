//! Session controller: the form draft plus the entry store.
//!
//! A [`Session`] is the single owner of all mutable state for one run.
//! Front ends push field edits and submit/remove events into it and read
//! the store and report back out.

use tracing::{debug, info, instrument};

use crate::error::AddError;
use crate::id::{Clock, EntryId, SystemClock};
use crate::model::{DebtEntry, DraftField, EntryDraft, ParseEnumError};
use crate::store::ItemStore;
use crate::summary::{Report, ReportSettings, Summary};

#[derive(Debug)]
pub struct Session<C = SystemClock> {
    draft: EntryDraft,
    store: ItemStore<C>,
    settings: ReportSettings,
}

impl Default for Session<SystemClock> {
    fn default() -> Self {
        Self::new(ReportSettings::default())
    }
}

impl Session<SystemClock> {
    #[must_use]
    pub fn new(settings: ReportSettings) -> Self {
        Self::with_clock(SystemClock, settings)
    }
}

impl<C: Clock> Session<C> {
    pub fn with_clock(clock: C, settings: ReportSettings) -> Self {
        Self {
            draft: EntryDraft::default(),
            store: ItemStore::with_clock(clock),
            settings,
        }
    }

    /// Submit the current draft. The draft is cleared only on success.
    ///
    /// # Errors
    ///
    /// Returns the [`AddError`] from the store; the draft is kept as-is.
    #[instrument(skip(self))]
    pub fn submit(&mut self) -> Result<&DebtEntry, AddError> {
        let entry = self.store.add(&self.draft)?;
        self.draft = EntryDraft::default();
        info!(id = %entry.id(), priority = %entry.priority(), "draft submitted");
        Ok(entry)
    }

    /// Add a fully formed draft without touching the session draft.
    ///
    /// # Errors
    ///
    /// Returns the [`AddError`] from the store.
    pub fn add(&mut self, draft: &EntryDraft) -> Result<&DebtEntry, AddError> {
        self.store.add(draft)
    }
}

impl<C> Session<C> {
    /// Parse `text` into one draft field. Blank text clears the field.
    ///
    /// # Errors
    ///
    /// Returns [`ParseEnumError`] for text outside the field's fixed set;
    /// the draft is unchanged.
    #[instrument(skip(self))]
    pub fn set_field(&mut self, field: DraftField, text: &str) -> Result<(), ParseEnumError> {
        let blank = text.trim().is_empty();
        match field {
            DraftField::Category => {
                self.draft.category = if blank { None } else { Some(text.parse()?) };
            }
            DraftField::Description => text.clone_into(&mut self.draft.description),
            DraftField::Impact => {
                self.draft.impact = if blank { None } else { Some(text.parse()?) };
            }
            DraftField::Effort => {
                self.draft.effort = if blank { None } else { Some(text.parse()?) };
            }
            DraftField::BusinessRisk => {
                self.draft.business_risk = if blank { None } else { Some(text.parse()?) };
            }
        }
        debug!(%field, "draft field updated");
        Ok(())
    }

    #[must_use]
    pub const fn draft(&self) -> &EntryDraft {
        &self.draft
    }

    pub fn clear_draft(&mut self) {
        self.draft = EntryDraft::default();
    }

    /// Whether the draft has the fields `submit` requires to be considered.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        self.draft.has_required_fields()
    }

    pub fn remove(&mut self, id: EntryId) -> Option<DebtEntry> {
        self.store.remove(id)
    }

    #[must_use]
    pub const fn store(&self) -> &ItemStore<C> {
        &self.store
    }

    #[must_use]
    pub const fn settings(&self) -> ReportSettings {
        self.settings
    }

    #[must_use]
    pub fn summary(&self) -> Summary {
        self.store.summarize_with(self.settings.high_priority_threshold)
    }

    /// The report with the configured top-N size.
    #[must_use]
    pub fn report(&self) -> Report<'_> {
        self.report_with_top(self.settings.top_n)
    }

    #[must_use]
    pub fn report_with_top(&self, top_n: usize) -> Report<'_> {
        self.store.report(top_n, self.settings.high_priority_threshold)
    }
}
