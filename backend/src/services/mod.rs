//! Business logic services for the BargainWale backend

pub mod analytics;
pub mod booking;
pub mod item;
pub mod order;
pub mod organization;
pub mod party;
pub mod purchase;
pub mod sale;
pub mod timeline;
pub mod transport;
pub mod warehouse;

pub use analytics::AnalyticsService;
pub use booking::BookingService;
pub use item::ItemService;
pub use order::OrderService;
pub use organization::OrganizationService;
pub use party::PartyService;
pub use purchase::PurchaseService;
pub use sale::SaleService;
pub use timeline::TimelineService;
pub use transport::TransportService;
pub use warehouse::WarehouseService;
