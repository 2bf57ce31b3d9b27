pub mod coords;
pub mod error;
pub mod models;
pub mod overlay;
pub mod selection;
pub mod session;
pub mod store;
