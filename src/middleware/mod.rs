// ABOUTME: HTTP middleware applied around every route
// ABOUTME: Currently the cross-origin policy; request tracing comes from tower-http in the server

pub mod cors;

// CORS configuration
pub use cors::setup_cors;
