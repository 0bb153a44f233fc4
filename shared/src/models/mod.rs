//! Domain models for the BargainWale trading operations backend

mod bargain;
mod booking;
mod fulfillment;
mod item;
mod movement;
mod order;
mod organization;
mod party;
mod transport;
mod warehouse;

pub use bargain::*;
pub use booking::*;
pub use fulfillment::*;
pub use item::*;
pub use movement::*;
pub use order::*;
pub use organization::*;
pub use party::*;
pub use transport::*;
pub use warehouse::*;
