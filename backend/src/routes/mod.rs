//! Route definitions for the BargainWale backend

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::{handlers, middleware::org_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Organization onboarding (public; no org header yet)
        .nest("/organizations", organization_routes())
        // Protected routes - master data
        .nest("/items", item_routes())
        .nest("/buyers", buyer_routes())
        .nest("/manufacturers", manufacturer_routes())
        .nest("/transports", transport_routes())
        .nest("/warehouses", warehouse_routes())
        // Protected routes - bargains and fulfillment
        .nest("/orders", order_routes())
        .nest("/bookings", booking_routes())
        .nest("/purchases", purchase_routes())
        .nest("/sales", sale_routes())
        // Protected routes - read models
        .nest("/timeline", timeline_routes())
        .nest("/analytics", analytics_routes())
}

/// Organization routes; registration and the check are public, the rest
/// require the organization header
fn organization_routes() -> Router<AppState> {
    let protected = Router::new()
        .route("/", post(handlers::create_organization))
        .route("/:id", get(handlers::get_organization))
        .route("/:id", put(handlers::update_organization))
        .route_layer(middleware::from_fn(org_middleware));

    Router::new()
        .route("/register", post(handlers::register_organization))
        .route("/check", post(handlers::check_organization))
        .merge(protected)
}

fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_items))
        .route("/", post(handlers::create_item))
        .route("/:id", get(handlers::get_item))
        .route("/:id", put(handlers::update_item))
        .route("/:id", delete(handlers::delete_item))
        .route_layer(middleware::from_fn(org_middleware))
}

fn buyer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_buyers))
        .route("/", post(handlers::create_buyer))
        .route("/:id", get(handlers::get_buyer))
        .route("/:id", put(handlers::update_buyer))
        .route("/:id", delete(handlers::delete_buyer))
        .route_layer(middleware::from_fn(org_middleware))
}

fn manufacturer_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_manufacturers))
        .route("/", post(handlers::create_manufacturer))
        .route("/:id", get(handlers::get_manufacturer))
        .route("/:id", put(handlers::update_manufacturer))
        .route("/:id", delete(handlers::delete_manufacturer))
        .route_layer(middleware::from_fn(org_middleware))
}

fn transport_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_transports))
        .route("/", post(handlers::create_transport))
        .route("/:id", get(handlers::get_transport))
        .route("/:id", put(handlers::update_transport))
        .route("/:id", delete(handlers::delete_transport))
        .route_layer(middleware::from_fn(org_middleware))
}

fn warehouse_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_warehouses))
        .route("/", post(handlers::create_warehouse))
        .route("/filter", get(handlers::filter_warehouses))
        .route("/:id", get(handlers::get_warehouse))
        .route("/:id", put(handlers::update_warehouse))
        .route("/:id", delete(handlers::delete_warehouse))
        .route("/:id/stock", get(handlers::list_stock))
        .route("/:id/stock/:item_id", put(handlers::adjust_stock))
        .route("/:id/prices", get(handlers::get_prices))
        .route("/:id/prices", post(handlers::update_prices))
        .route("/:id/prices/:item_id/history", get(handlers::get_price_history))
        .route_layer(middleware::from_fn(org_middleware))
}

fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_orders))
        .route("/", post(handlers::create_order))
        .route("/:id", get(handlers::get_order))
        .route("/:id", delete(handlers::delete_order))
        .route("/:id/bill-type", put(handlers::update_order_bill_type))
        .route_layer(middleware::from_fn(org_middleware))
}

fn booking_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_bookings))
        .route("/", post(handlers::create_booking))
        .route("/:id", get(handlers::get_booking))
        .route("/:id", delete(handlers::delete_booking))
        .route_layer(middleware::from_fn(org_middleware))
}

fn purchase_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_purchases))
        .route("/", post(handlers::record_purchase))
        .route("/:id", get(handlers::get_purchase))
        .route("/:id", put(handlers::update_purchase))
        .route("/orders/:order_id", get(handlers::list_order_purchases))
        .route_layer(middleware::from_fn(org_middleware))
}

fn sale_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_sales))
        .route("/", post(handlers::record_sale))
        .route("/:id", get(handlers::get_sale))
        .route("/:id", put(handlers::update_sale))
        .route("/bookings/:booking_id", get(handlers::list_booking_sales))
        .route_layer(middleware::from_fn(org_middleware))
}

fn timeline_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/items/:item_id/:inventory_type",
            get(handlers::get_item_timeline),
        )
        .route_layer(middleware::from_fn(org_middleware))
}

fn analytics_routes() -> Router<AppState> {
    Router::new()
        .route("/summary", get(handlers::get_summary))
        .route_layer(middleware::from_fn(org_middleware))
}
