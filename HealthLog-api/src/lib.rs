// HealthLog-api lib.rs
//
// HTTP layer for the HealthLog application: routes, handlers, configuration
// and the OpenAPI document.

// Public modules
pub mod api;
pub mod config;
pub mod openapi;
