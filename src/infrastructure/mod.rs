// Infrastructure layer - External dependencies and adapters
pub mod bitmap_text;
pub mod chart_canvas;
pub mod config;
pub mod csv_parser;
pub mod http_response;
pub mod memory_history;
