pub mod auth;
pub mod channels;
pub mod comments;
mod convert;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod routes;
pub mod videos;
