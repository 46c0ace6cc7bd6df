//! Traffic Broadcast Server
//!
//! Generates synthetic road-density and camera-status data for a fixed
//! grid and pushes it to every connected WebSocket client once per second.
//!
//! # Features
//!
//! - **Fixed Registry**: 42 roads and 440 cameras enumerated once at startup
//! - **Injected Randomness**: generation takes any `rand::Rng`, seedable in tests
//! - **Transport-Agnostic Loop**: fan-out depends only on the `ClientRegistry` trait
//! - **Initial Snapshot**: each new client immediately gets a snapshot with all cameras online
//!
//! # Modules
//!
//! - `types`: Wire data structures (RoadStatus, CameraStatus, TrafficSnapshot)
//! - `registry`: Road and camera id enumeration
//! - `generator`: Synthetic snapshot generation
//! - `broadcast`: Periodic broadcast loop and client capability traits
//! - `api`: Axum router and WebSocket connection handling
//! - `server`: Listener binding and lifecycle
//! - `config`: Listen address configuration
//! - `error`: Error types
//!
//! # Example
//!
//! ```no_run
//! use traffic_broadcast::{ServerConfig, ServerResult, TrafficServer};
//!
//! #[tokio::main]
//! async fn main() -> ServerResult<()> {
//!     let config = ServerConfig::from_env()?;
//!     let server = TrafficServer::bind(&config).await?;
//!     server.run().await
//! }
//! ```

pub mod api;
pub mod broadcast;
pub mod config;
pub mod error;
pub mod generator;
pub mod registry;
pub mod server;
pub mod types;

// Re-export commonly used items at crate root
pub use broadcast::{BroadcastLoop, Client, ClientRegistry, TickReport, TICK_INTERVAL};
pub use config::ServerConfig;
pub use error::{SendError, ServerError, ServerResult};
pub use generator::{generate_snapshot, initial_snapshot, periodic_snapshot, CameraMode};
pub use registry::{build_camera_ids, build_road_ids, Registry};
pub use server::TrafficServer;
pub use types::{CameraState, CameraStatus, RoadStatus, TrafficColor, TrafficSnapshot};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
