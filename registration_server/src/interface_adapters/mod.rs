pub mod auth;
pub mod extractors;
pub mod handlers;
pub mod protocol;
pub mod routes;
pub mod state;
pub mod stores;
pub mod utils;
