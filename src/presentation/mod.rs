// Presentation layer - HTTP transport
pub mod api_error;
pub mod app_state;
pub mod handlers;
pub mod views;
