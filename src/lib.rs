pub mod api;
pub mod config;
pub mod docs;
pub mod error;
pub mod model;
pub mod payroll;
pub mod reports;
pub mod routes;
pub mod state;
pub mod store;

pub use error::AdminError;
pub use state::{AppState, ClientCache};
pub use store::RecordStoreClient;
