use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use storage::Database;
use tower_http::cors::{Any, CorsLayer};
use tryon::{FileStorageClient, GenerationClient, PgFileStore, PgRequestStore, TryOnPipeline};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod config;
mod error;
mod events;
mod features;
mod middleware;
mod state;

use config::Config;
use middleware::auth::ApiKeys;
use state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        features::customers::handlers::register_customer,
        features::customers::handlers::get_customer,
        features::products::handlers::list_products,
        features::products::handlers::get_product,
        features::products::handlers::create_product,
        features::products::handlers::delete_product,
        features::measurements::handlers::upsert_measurements,
        features::measurements::handlers::get_measurements,
        features::measurements::handlers::recommend_size,
        features::style_profiles::handlers::create_profile,
        features::style_profiles::handlers::update_profile,
        features::style_profiles::handlers::get_profile,
        features::style_profiles::handlers::get_recommendations,
        features::outfits::handlers::create_outfit,
        features::outfits::handlers::list_outfits,
        features::outfits::handlers::get_outfit,
        features::outfits::handlers::update_outfit,
        features::outfits::handlers::delete_outfit,
        features::outfits::handlers::add_outfit_product,
        features::outfits::handlers::remove_outfit_product,
        features::outfits::handlers::recommended_outfits,
        features::outfits::handlers::suggested_products,
        features::try_on::handlers::create_try_on,
        features::try_on::handlers::get_try_on,
        features::try_on::handlers::list_try_ons,
    ),
    components(
        schemas(
            storage::dto::customer::RegisterCustomerRequest,
            storage::dto::customer::CustomerResponse,
            storage::dto::product::CreateProductRequest,
            storage::dto::product::CreateVariantRequest,
            storage::dto::product::ProductResponse,
            storage::dto::product::VariantResponse,
            storage::dto::product::ProductDetailResponse,
            storage::dto::measurement::UpsertMeasurementsRequest,
            storage::dto::measurement::MeasurementsResponse,
            storage::dto::measurement::SizeRecommendationRequest,
            storage::dto::measurement::SizeAlternative,
            storage::dto::measurement::SizeRecommendationResponse,
            storage::dto::style_profile::UpsertStyleProfileRequest,
            storage::dto::style_profile::StyleProfileResponse,
            storage::dto::style_profile::ProductRecommendation,
            storage::dto::style_profile::RecommendationsResponse,
            storage::dto::outfit::CreateOutfitRequest,
            storage::dto::outfit::UpdateOutfitRequest,
            storage::dto::outfit::AddOutfitProductRequest,
            storage::dto::outfit::OutfitResponse,
            storage::dto::outfit::OutfitDetailResponse,
            storage::dto::outfit::RecommendedOutfitsResponse,
            storage::dto::try_on::CreateTryOnRequest,
            storage::dto::try_on::TryOnResponse,
            storage::dto::try_on::TryOnListResponse,
            storage::dto::common::PageMeta,
            storage::models::GarmentCategory,
            storage::models::TryOnStatus,
        )
    ),
    tags(
        (name = "customers", description = "Customer registration and lookup"),
        (name = "products", description = "Catalog browsing and admin"),
        (name = "measurements", description = "Body measurements and size recommendations"),
        (name = "style-profile", description = "Style preferences and product recommendations"),
        (name = "outfits", description = "Outfit curation and similarity"),
        (name = "try-on", description = "Virtual try-on requests"),
    ),
    modifiers(&SecurityAddon)
)]
struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                utoipa::openapi::security::SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .bearer_format("API Key")
                        .build(),
                ),
            )
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_target(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("Starting storefront API");

    let config = Config::from_env().context("Failed to load API configuration")?;
    tracing::info!("Configuration loaded successfully");

    tracing::info!(
        "Connecting to database at: {}",
        config
            .database_url
            .split('@')
            .next_back()
            .unwrap_or("unknown")
    );
    let db = Database::new(&config.database_url)
        .await
        .context("Failed to initialize database")?;
    tracing::info!("Database connection established");

    tracing::info!("Running database migrations");
    db.run_migrations()
        .await
        .context("Failed to run migrations")?;
    tracing::info!("Database migrations completed successfully");

    let events = Arc::new(events::EventBus::new());
    events::spawn_logger(&events);

    let pipeline = build_pipeline(&config, &db)?;
    if pipeline.is_none() {
        tracing::warn!("TRYON_API_URL/FILE_STORAGE_URL not set, virtual try-on is disabled");
    }

    let api_keys = ApiKeys::from_comma_separated(&config.api_keys);

    let state = AppState {
        db,
        events,
        pipeline,
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let openapi = ApiDoc::openapi();

    let product_routes = features::products::routes::routes(api_keys)
        .merge(features::outfits::routes::product_routes());

    let app = Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .nest("/api/customers", features::customers::routes::routes())
        .nest("/api/products", product_routes)
        .nest("/api/measurements", features::measurements::routes::routes())
        .nest(
            "/api/size-recommendations",
            features::measurements::routes::recommendation_routes(),
        )
        .nest(
            "/api/style-profile",
            features::style_profiles::routes::routes(),
        )
        .nest("/api/outfits", features::outfits::routes::routes())
        .nest("/api/try-on", features::try_on::routes::routes())
        .layer(cors)
        .with_state(state);

    let bind_address = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting server at http://{}", bind_address);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", bind_address);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Wire the try-on pipeline when both external collaborators are
/// configured.
fn build_pipeline(config: &Config, db: &Database) -> anyhow::Result<Option<Arc<TryOnPipeline>>> {
    let (Some(tryon_api_url), Some(file_storage_url)) =
        (&config.tryon_api_url, &config.file_storage_url)
    else {
        return Ok(None);
    };

    let generation = GenerationClient::new(tryon_api_url.clone(), config.tryon_api_key.clone())
        .context("Failed to create generation client")?;
    let files = FileStorageClient::new(file_storage_url.clone())
        .context("Failed to create file storage client")?;

    let pipeline = TryOnPipeline::new(
        Arc::new(PgRequestStore::new(db.pool().clone())),
        Arc::new(PgFileStore::new(db.pool().clone(), files)),
        Arc::new(generation),
    );

    Ok(Some(Arc::new(pipeline)))
}
