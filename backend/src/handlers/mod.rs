//! HTTP handlers for the BargainWale backend

pub mod analytics;
pub mod booking;
pub mod health;
pub mod item;
pub mod order;
pub mod organization;
pub mod party;
pub mod purchase;
pub mod sale;
pub mod timeline;
pub mod transport;
pub mod warehouse;

pub use analytics::get_summary;
pub use booking::{create_booking, delete_booking, get_booking, list_bookings};
pub use health::health_check;
pub use item::{create_item, delete_item, get_item, list_items, update_item};
pub use order::{create_order, delete_order, get_order, list_orders, update_order_bill_type};
pub use organization::{
    check as check_organization, create as create_organization, get as get_organization,
    register as register_organization, update as update_organization,
};
pub use party::{
    create_buyer, create_manufacturer, delete_buyer, delete_manufacturer, get_buyer,
    get_manufacturer, list_buyers, list_manufacturers, update_buyer, update_manufacturer,
};
pub use purchase::{
    get_purchase, list_order_purchases, list_purchases, record_purchase, update_purchase,
};
pub use sale::{get_sale, list_booking_sales, list_sales, record_sale, update_sale};
pub use timeline::get_item_timeline;
pub use transport::{
    create_transport, delete_transport, get_transport, list_transports, update_transport,
};
pub use warehouse::{
    adjust_stock, create_warehouse, delete_warehouse, filter_warehouses, get_price_history,
    get_prices, get_warehouse, list_stock, list_warehouses, update_prices, update_warehouse,
};
