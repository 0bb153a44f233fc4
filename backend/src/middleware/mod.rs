//! Request middleware for the BargainWale backend

pub mod org;

pub use org::{org_middleware, CurrentOrg, OrgContext};
