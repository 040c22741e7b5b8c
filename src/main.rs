pub mod accounts;
pub mod auth;
pub mod db;
pub mod error;
pub mod models;
pub mod notify;
pub mod orders;
pub mod validation;

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, patch, post, put},
    Router,
};
use sqlx::PgPool;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use validator::Validate;

use accounts::AccountsRepository;
use error::ApiError;
use models::{Category, CreateMenuItem, MenuItem, UpdateMenuItem};
use notify::{BroadcastPublisher, EventPublisher, LogSmsGateway, Notifier, SmsGateway};
use orders::{
    CatalogRepository, OrderService, OrdersRepository, PricingEngine, RewardConfig,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        create_menu_item,
        get_all_menu_items,
        get_menu_item_by_id,
        update_menu_item,
        delete_menu_item,
    ),
    components(
        schemas(MenuItem, CreateMenuItem, UpdateMenuItem, Category)
    ),
    tags(
        (name = "menu", description = "Menu catalog management endpoints")
    ),
    info(
        title = "Cafe Order API",
        version = "1.0.0",
        description = "Order management core for a cafe ordering platform"
    )
)]
struct ApiDoc;

/// Application state shared across handlers
///
/// Every component is constructed once at startup and injected here; there
/// is no ambient singleton.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub order_service: OrderService,
    pub accounts_repo: AccountsRepository,
    /// Real-time event stream; the external connection registry
    /// subscribes here
    pub events: Arc<BroadcastPublisher>,
}

/// Handler for POST /api/menu
/// Creates a new menu item
#[utoipa::path(
    post,
    path = "/api/menu",
    request_body = CreateMenuItem,
    responses(
        (status = 201, description = "Menu item created successfully", body = MenuItem),
        (status = 400, description = "Invalid input data", body = String, example = json!({"error": "Price must be non-negative"})),
        (status = 409, description = "Duplicate name", body = String, example = json!({"error": "Menu item already exists"})),
        (status = 500, description = "Internal server error", body = String, example = json!({"error": "Database error"}))
    ),
    tag = "menu"
)]
async fn create_menu_item(
    State(state): State<AppState>,
    Json(payload): Json<CreateMenuItem>,
) -> Result<(StatusCode, Json<MenuItem>), ApiError> {
    tracing::debug!("Creating new menu item: {}", payload.name);

    payload.validate()?;

    if db::check_duplicate_menu_item(&state.db, &payload.name).await? {
        tracing::warn!("Attempt to create duplicate menu item: {}", payload.name);
        return Err(ApiError::Conflict {
            message: format!("Menu item with name '{}' already exists", payload.name),
        });
    }

    let item = sqlx::query_as::<_, MenuItem>(
        r#"
        INSERT INTO menu_items (name, category, price, reward_points, available)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, category, price, reward_points, available, created_at, updated_at
        "#,
    )
    .bind(&payload.name)
    .bind(payload.category)
    .bind(payload.price)
    .bind(payload.reward_points)
    .bind(payload.available)
    .fetch_one(&state.db)
    .await?;

    tracing::info!("Successfully created menu item with id: {}", item.id);
    Ok((StatusCode::CREATED, Json(item)))
}

/// Handler for GET /api/menu
/// Retrieves all menu items
#[utoipa::path(
    get,
    path = "/api/menu",
    responses(
        (status = 200, description = "List of all menu items", body = Vec<MenuItem>),
        (status = 500, description = "Internal server error", body = String, example = json!({"error": "Database error"}))
    ),
    tag = "menu"
)]
async fn get_all_menu_items(State(state): State<AppState>) -> Result<Json<Vec<MenuItem>>, ApiError> {
    tracing::debug!("Fetching all menu items");

    let items = sqlx::query_as::<_, MenuItem>(
        r#"
        SELECT id, name, category, price, reward_points, available, created_at, updated_at
        FROM menu_items
        ORDER BY id
        "#,
    )
    .fetch_all(&state.db)
    .await?;

    tracing::debug!("Retrieved {} menu items", items.len());
    Ok(Json(items))
}

/// Handler for GET /api/menu/:id
/// Retrieves a specific menu item by ID
#[utoipa::path(
    get,
    path = "/api/menu/{id}",
    params(
        ("id" = i32, Path, description = "Menu item ID")
    ),
    responses(
        (status = 200, description = "Menu item found", body = MenuItem),
        (status = 404, description = "Menu item not found", body = String, example = json!({"error": "Menu item with id 1 not found"})),
        (status = 500, description = "Internal server error", body = String, example = json!({"error": "Database error"}))
    ),
    tag = "menu"
)]
async fn get_menu_item_by_id(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<MenuItem>, ApiError> {
    tracing::debug!("Fetching menu item with id: {}", id);

    let item = sqlx::query_as::<_, MenuItem>(
        r#"
        SELECT id, name, category, price, reward_points, available, created_at, updated_at
        FROM menu_items
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&state.db)
    .await?
    .ok_or_else(|| ApiError::NotFound {
        resource: "Menu item".to_string(),
        id: id.to_string(),
    })?;

    Ok(Json(item))
}

/// Handler for PUT /api/menu/:id
/// Updates an existing menu item
///
/// Existing orders keep the prices frozen at their creation; only future
/// pricing sees this change.
#[utoipa::path(
    put,
    path = "/api/menu/{id}",
    params(
        ("id" = i32, Path, description = "Menu item ID")
    ),
    request_body = UpdateMenuItem,
    responses(
        (status = 200, description = "Menu item updated successfully", body = MenuItem),
        (status = 400, description = "Invalid input data", body = String, example = json!({"error": "Price must be non-negative"})),
        (status = 404, description = "Menu item not found", body = String, example = json!({"error": "Menu item with id 1 not found"})),
        (status = 500, description = "Internal server error", body = String, example = json!({"error": "Database error"}))
    ),
    tag = "menu"
)]
async fn update_menu_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(payload): Json<UpdateMenuItem>,
) -> Result<Json<MenuItem>, ApiError> {
    tracing::debug!("Updating menu item with id: {}", id);

    payload.validate()?;

    // Transaction so the existence check, duplicate check and update are
    // applied as a unit
    let mut tx = state.db.begin().await?;

    let existing = sqlx::query_as::<_, MenuItem>(
        r#"
        SELECT id, name, category, price, reward_points, available, created_at, updated_at
        FROM menu_items
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| ApiError::NotFound {
        resource: "Menu item".to_string(),
        id: id.to_string(),
    })?;

    if let Some(ref new_name) = payload.name {
        if new_name != &existing.name {
            let duplicate_exists: Option<bool> = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM menu_items WHERE name = $1 AND id != $2)",
            )
            .bind(new_name)
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

            if duplicate_exists.unwrap_or(false) {
                tracing::warn!(
                    "Attempt to update menu item {} to duplicate name: {}",
                    id,
                    new_name
                );
                return Err(ApiError::Conflict {
                    message: format!("Menu item with name '{}' already exists", new_name),
                });
            }
        }
    }

    let updated = sqlx::query_as::<_, MenuItem>(
        r#"
        UPDATE menu_items
        SET name = $1,
            category = $2,
            price = $3,
            reward_points = $4,
            available = $5,
            updated_at = NOW()
        WHERE id = $6
        RETURNING id, name, category, price, reward_points, available, created_at, updated_at
        "#,
    )
    .bind(payload.name.unwrap_or(existing.name))
    .bind(payload.category.unwrap_or(existing.category))
    .bind(payload.price.unwrap_or(existing.price))
    .bind(payload.reward_points.unwrap_or(existing.reward_points))
    .bind(payload.available.unwrap_or(existing.available))
    .bind(id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!("Successfully updated menu item with id: {}", id);
    Ok(Json(updated))
}

/// Handler for DELETE /api/menu/:id
/// Deletes a menu item
///
/// Items referenced by existing order lines cannot be deleted; the foreign
/// key keeps historical orders resolvable.
#[utoipa::path(
    delete,
    path = "/api/menu/{id}",
    params(
        ("id" = i32, Path, description = "Menu item ID")
    ),
    responses(
        (status = 204, description = "Menu item deleted successfully"),
        (status = 404, description = "Menu item not found", body = String, example = json!({"error": "Menu item with id 1 not found"})),
        (status = 409, description = "Menu item is referenced by orders", body = String, example = json!({"error": "Menu item is referenced by existing orders"})),
        (status = 500, description = "Internal server error", body = String, example = json!({"error": "Database error"}))
    ),
    tag = "menu"
)]
async fn delete_menu_item(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    tracing::debug!("Deleting menu item with id: {}", id);

    let result = sqlx::query("DELETE FROM menu_items WHERE id = $1")
        .bind(id)
        .execute(&state.db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return ApiError::Conflict {
                        message: format!("Menu item {} is referenced by existing orders", id),
                    };
                }
            }
            ApiError::DatabaseError(e)
        })?;

    if result.rows_affected() == 0 {
        tracing::debug!("Menu item with id {} not found for deletion", id);
        return Err(ApiError::NotFound {
            resource: "Menu item".to_string(),
            id: id.to_string(),
        });
    }

    tracing::info!("Successfully deleted menu item with id: {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Creates and configures the application router
/// Maps all API endpoints to their handlers and adds CORS middleware
fn create_router(state: AppState) -> Router {
    use tower_http::cors::{Any, CorsLayer};

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Swagger UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        // Catalog routes
        .route("/api/menu", post(create_menu_item))
        .route("/api/menu", get(get_all_menu_items))
        .route("/api/menu/:id", get(get_menu_item_by_id))
        .route("/api/menu/:id", put(update_menu_item))
        .route("/api/menu/:id", delete(delete_menu_item))
        // Order routes
        .route("/api/orders", post(orders::create_order_handler))
        .route("/api/orders", get(orders::get_order_history_handler))
        .route("/api/orders/:order_id", get(orders::get_order_by_id_handler))
        .route(
            "/api/orders/:order_id/status",
            patch(orders::update_order_status_handler),
        )
        // Account routes
        .route("/api/account/wallet", get(accounts::get_wallet_handler))
        .layer(cors)
        .with_state(state)
}

/// Wire up repositories, services and the notification fan-out around a
/// connection pool
fn build_state(db: PgPool) -> AppState {
    let events = Arc::new(BroadcastPublisher::new(256));
    let sms: Arc<dyn SmsGateway> = Arc::new(LogSmsGateway);

    let accounts_repo = AccountsRepository::new(db.clone());
    let notifier = Notifier::new(
        accounts_repo.clone(),
        Arc::clone(&events) as Arc<dyn EventPublisher>,
        sms,
    );

    let order_service = OrderService::new(
        CatalogRepository::new(db.clone()),
        OrdersRepository::new(db.clone()),
        PricingEngine::new(RewardConfig::default()),
        notifier,
    );

    AppState {
        db,
        order_service,
        accounts_repo,
        events,
    }
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_level(true)
        .init();

    tracing::info!("Cafe Order API - Starting...");

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");
    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = std::env::var("PORT").unwrap_or_else(|_| "8080".to_string());

    tracing::info!("Connecting to database...");
    let db_pool = db::create_pool(&database_url)
        .await
        .expect("Failed to create database pool");

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations")
        .run(&db_pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Migrations completed successfully");

    let app = create_router(build_state(db_pool));

    let addr = format!("{}:{}", host, port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind to address");

    tracing::info!("Cafe Order API is running on http://{}", addr);
    tracing::info!("Swagger UI available at http://{}/swagger-ui", addr);

    axum::serve(listener, app)
        .await
        .expect("Server error");
}

#[cfg(test)]
mod tests;
