//! graph_drive - A filesystem-style adapter for Microsoft Graph drives.
//!
//! This library maps filesystem verbs onto the Graph drive API:
//! - Read, write and stream file content
//! - List directory contents (optionally recursive)
//! - Move, copy, delete items and create directories
//! - Fetch normalized metadata records
//!
//! # Example
//!
//! ```no_run
//! use graph_drive::{DriveConfig, GraphDriveAdapter};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let adapter = GraphDriveAdapter::connect(DriveConfig {
//!         drive_id: "drive-id".to_string(),
//!         tenant: "contoso.onmicrosoft.com".to_string(),
//!         client_id: "client-id".to_string(),
//!         client_secret: "client-secret".to_string(),
//!     })
//!     .await?;
//!
//!     for entry in adapter.list_contents("", false).await? {
//!         println!("{}", entry);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod adapter;
pub mod auth;
pub mod error;
pub mod models;
pub mod path;

// Re-exports for convenience
pub use adapter::{DriveConfig, GraphDriveAdapter, GRAPH_API_BASE};
pub use auth::TokenProvider;
pub use error::{DriveError, Result};
pub use models::{ItemKind, Metadata};
