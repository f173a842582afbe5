pub mod entry;

pub use entry::{
    BusinessRisk, Category, DebtEntry, DraftField, Effort, EntryDraft, Impact, ParseEnumError,
};
