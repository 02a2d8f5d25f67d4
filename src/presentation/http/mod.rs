pub mod dto;
pub mod errors;
pub mod handlers;
pub mod routes;
pub mod server;

pub use server::{HttpServer, ServerConfig};
