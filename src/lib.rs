mod database {
    pub mod actions;
    pub mod error;
    pub mod form;
    pub mod schema;
}
mod authentication {
    pub mod cryptography;
    pub mod jwt;
    pub mod middleware;
}
mod api {
    pub mod handlers;
    pub mod rejection;
    pub mod routes;
}
mod config;
mod constants;

pub use api::routes::routes;
pub use api::*;
pub use authentication::*;
pub use config::*;
pub use constants::*;
pub use database::*;
