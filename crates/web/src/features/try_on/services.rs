use std::sync::Arc;

use sqlx::PgPool;
use storage::{
    dto::try_on::CreateTryOnRequest,
    error::{Result, StorageError},
    models::TryOnRequest,
    repository::{
        customer::CustomerRepository, product::ProductRepository,
        stored_file::StoredFileRepository, try_on::TryOnRepository,
    },
};
use tryon::TryOnPipeline;
use uuid::Uuid;

use crate::events::{DomainEvent, EventBus, names};

/// Validate the referenced customer, product and uploaded image, persist
/// a pending request and kick off generation out-of-band. The caller
/// gets the pending record back immediately and polls for the terminal
/// state.
pub async fn create_try_on(
    pool: &PgPool,
    events: Arc<EventBus>,
    pipeline: Option<Arc<TryOnPipeline>>,
    customer_id: Uuid,
    request: &CreateTryOnRequest,
) -> Result<TryOnRequest> {
    let Some(pipeline) = pipeline else {
        return Err(StorageError::UnexpectedState(
            "virtual try-on service is not configured".to_string(),
        ));
    };

    CustomerRepository::new(pool).ensure_exists(customer_id).await?;
    ProductRepository::new(pool)
        .find_by_id(request.product_id)
        .await?;
    StoredFileRepository::new(pool)
        .find_by_id(request.user_image_id)
        .await?;

    let record = TryOnRepository::new(pool)
        .create(
            customer_id,
            request.product_id,
            request.user_image_id,
            request.metadata(),
        )
        .await?;

    events.publish(
        DomainEvent::new(names::TRY_ON_CREATED)
            .entity(record.request_id)
            .customer(customer_id),
    );

    let request_id = record.request_id;
    tokio::spawn(async move {
        match pipeline.run(request_id).await {
            Ok(status) => {
                events.publish(
                    DomainEvent::new(names::TRY_ON_UPDATED)
                        .entity(request_id)
                        .payload(serde_json::json!({ "status": status.as_str() })),
                );
            }
            Err(e) => {
                tracing::error!("Try-on pipeline for {} did not run: {}", request_id, e);
            }
        }
    });

    Ok(record)
}

/// Get a request the customer owns, with the result image URL when the
/// generation has completed.
pub async fn get_try_on(
    pool: &PgPool,
    customer_id: Uuid,
    request_id: Uuid,
) -> Result<(TryOnRequest, Option<String>)> {
    let request = TryOnRepository::new(pool).find_by_id(request_id).await?;
    request.ensure_owned_by(customer_id)?;

    let result_image_url = resolve_result_url(pool, &request).await?;

    Ok((request, result_image_url))
}

/// All of the customer's requests, newest first.
pub async fn list_try_ons(
    pool: &PgPool,
    customer_id: Uuid,
) -> Result<Vec<(TryOnRequest, Option<String>)>> {
    let requests = TryOnRepository::new(pool).list_by_customer(customer_id).await?;

    let mut result = Vec::with_capacity(requests.len());
    for request in requests {
        let url = resolve_result_url(pool, &request).await?;
        result.push((request, url));
    }

    Ok(result)
}

async fn resolve_result_url(pool: &PgPool, request: &TryOnRequest) -> Result<Option<String>> {
    let Some(result_image_id) = request.result_image_id else {
        return Ok(None);
    };

    match StoredFileRepository::new(pool).find_by_id(result_image_id).await {
        Ok(file) => Ok(Some(file.url)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}
