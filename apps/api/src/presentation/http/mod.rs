pub mod device;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
