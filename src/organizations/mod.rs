//! Organization Registry Module
//!
//! Tenant organizations kept in process memory. The registry is volatile:
//! it starts empty and is lost on restart.

pub mod handlers;
pub mod models;
pub mod store;

pub use handlers::routes;
pub use models::{
    CallerContext, CallerRole, CreateOrganizationInput, Organization, OrganizationError,
    UpdateOrganizationInput,
};
pub use store::OrganizationStore;
