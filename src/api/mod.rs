//! API module for HTTP and WebSocket endpoints
//!
//! This module provides the WebSocket stream and health check for the traffic front-end.

pub mod websocket;
pub mod http;

pub use http::create_router;
