use sqlx::PgPool;
use uuid::Uuid;

use crate::dto::customer::RegisterCustomerRequest;
use crate::error::{Result, StorageError};
use crate::models::Customer;

const CUSTOMER_COLUMNS: &str = "customer_id, email, first_name, last_name, created_at";

pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, req: &RegisterCustomerRequest) -> Result<Customer> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            r#"
            INSERT INTO customers (email, first_name, last_name)
            VALUES ($1, $2, $3)
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(&req.email)
        .bind(&req.first_name)
        .bind(&req.last_name)
        .fetch_one(self.pool)
        .await
        .map_err(|e| {
            let error = StorageError::from(e);
            if error.is_unique_violation() {
                StorageError::Duplicate("email is already registered".to_string())
            } else {
                error
            }
        })?;

        Ok(customer)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Customer> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            r#"
            SELECT {CUSTOMER_COLUMNS}
            FROM customers
            WHERE customer_id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::MissingEntity("customer"))?;

        Ok(customer)
    }

    /// Existence check used by collaborating services before persisting
    /// references to a customer.
    pub async fn ensure_exists(&self, id: Uuid) -> Result<()> {
        self.find_by_id(id).await.map(|_| ())
    }
}
