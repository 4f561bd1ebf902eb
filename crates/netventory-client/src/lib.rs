//! netventory-client: HTTP client library
//!
//! Typed client for the netventory daemon's HTTP API.
//!
//! # Examples
//!
//! ```no_run
//! use netventory_client::HttpClient;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = HttpClient::new("http://localhost:8080")?;
//!
//! // Get health
//! let health = client.health().await?;
//! println!("Status: {}", health.status);
//!
//! // Add one device
//! client.add_device("nyc01jp1", "10.1.1.1").await?;
//!
//! // Ingest a list stored on the daemon host
//! let report = client.populate_from_file("devices.txt").await?;
//! println!("{} failed", report.connection_failure.len());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod http;

pub use error::{ClientError, Result};
pub use http::HttpClient;
