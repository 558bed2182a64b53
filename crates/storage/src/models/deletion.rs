use chrono::NaiveDateTime;

use crate::error::{Result, StorageError};

/// Lifecycle state of a soft-deletable row.
///
/// Rows are never physically removed; a populated `deleted_at` column marks
/// them deleted. Repositories exclude deleted rows from every read, and
/// mutations call [`DeletionState::ensure_active`] on rows that were loaded
/// earlier in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionState {
    Active,
    Deleted { at: NaiveDateTime },
}

impl DeletionState {
    pub fn from_timestamp(deleted_at: Option<NaiveDateTime>) -> Self {
        match deleted_at {
            None => Self::Active,
            Some(at) => Self::Deleted { at },
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }

    pub fn ensure_active(&self, entity: &'static str) -> Result<()> {
        if self.is_active() {
            Ok(())
        } else {
            Err(StorageError::MissingEntity(entity))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_timestamp_is_active() {
        let state = DeletionState::from_timestamp(None);
        assert!(state.is_active());
        assert!(state.ensure_active("outfit").is_ok());
    }

    #[test]
    fn test_set_timestamp_is_deleted() {
        let at = chrono::NaiveDate::from_ymd_opt(2025, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let state = DeletionState::from_timestamp(Some(at));
        assert_eq!(state, DeletionState::Deleted { at });
        assert!(state.ensure_active("outfit").is_err());
    }
}
