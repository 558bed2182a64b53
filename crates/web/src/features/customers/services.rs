use sqlx::PgPool;
use storage::{
    dto::customer::RegisterCustomerRequest, error::Result, models::Customer,
    repository::customer::CustomerRepository,
};
use uuid::Uuid;

/// Register a new customer
pub async fn register(pool: &PgPool, request: &RegisterCustomerRequest) -> Result<Customer> {
    let repo = CustomerRepository::new(pool);
    repo.create(request).await
}

/// Get customer by id
pub async fn get_customer(pool: &PgPool, customer_id: Uuid) -> Result<Customer> {
    let repo = CustomerRepository::new(pool);
    repo.find_by_id(customer_id).await
}
