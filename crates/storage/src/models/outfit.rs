use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::{Result, StorageError};

use super::{DeletionState, ProductDetail};

/// A named, ordered collection of products. Invariant: an outfit always
/// contains at least one product; mutations that would empty it are
/// rejected before any row changes.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Outfit {
    pub outfit_id: Uuid,
    pub name: String,
    pub customer_id: Option<Uuid>,
    pub created_at: chrono::NaiveDateTime,
    pub updated_at: chrono::NaiveDateTime,
    pub deleted_at: Option<chrono::NaiveDateTime>,
}

impl Outfit {
    pub fn deletion_state(&self) -> DeletionState {
        DeletionState::from_timestamp(self.deleted_at)
    }

    /// Ownership check for mutations. Outfits without a creator are
    /// curated and cannot be mutated through the customer surface.
    pub fn ensure_owned_by(&self, customer_id: Uuid) -> Result<()> {
        match self.customer_id {
            Some(owner) if owner == customer_id => Ok(()),
            _ => Err(StorageError::NotAllowed(
                "outfit does not belong to this customer".to_string(),
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct OutfitProduct {
    pub outfit_id: Uuid,
    pub product_id: Uuid,
    pub position: i32,
}

/// An outfit with its member products loaded, in position order.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OutfitDetail {
    pub outfit: Outfit,
    pub products: Vec<ProductDetail>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outfit_owned_by(customer_id: Option<Uuid>) -> Outfit {
        let created = chrono::NaiveDate::from_ymd_opt(2025, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        Outfit {
            outfit_id: Uuid::new_v4(),
            name: "Weekend".to_string(),
            customer_id,
            created_at: created,
            updated_at: created,
            deleted_at: None,
        }
    }

    #[test]
    fn test_owner_may_mutate() {
        let owner = Uuid::new_v4();
        let outfit = outfit_owned_by(Some(owner));
        assert!(outfit.ensure_owned_by(owner).is_ok());
    }

    #[test]
    fn test_other_customer_is_rejected() {
        let outfit = outfit_owned_by(Some(Uuid::new_v4()));
        let result = outfit.ensure_owned_by(Uuid::new_v4());
        assert!(matches!(result, Err(StorageError::NotAllowed(_))));
    }

    #[test]
    fn test_curated_outfit_is_rejected() {
        let outfit = outfit_owned_by(None);
        let result = outfit.ensure_owned_by(Uuid::new_v4());
        assert!(matches!(result, Err(StorageError::NotAllowed(_))));
    }
}
