//! Volans State Management
//!
//! This crate provides state management for the Volans infrastructure
//! tool. Dashboard state is mirrored into a versioned JSON state file
//! stored in a pluggable backend (local file or S3) with locking for
//! safe concurrent access.
//!
//! # Overview
//!
//! - **StateFile**: The main state structure containing all managed resources
//! - **StateBackend**: A trait for state storage backends (local, S3)
//! - **LockInfo**: Information about state locks for concurrent access control
//!
//! # Example
//!
//! ```ignore
//! use volans_state::{create_backend, BackendConfig};
//!
//! let config = BackendConfig {
//!     backend_type: "local".to_string(),
//!     attributes: [("path".to_string(), serde_json::json!("volans.state.json"))]
//!         .into_iter()
//!         .collect(),
//! };
//!
//! let backend = create_backend(&config).await?;
//!
//! let lock = backend.acquire_lock("apply").await?;
//! let state = backend.read_state().await?;
//! // ... modify resources ...
//! backend.write_state(&state).await?;
//! backend.release_lock(&lock).await?;
//! ```

pub mod backend;
pub mod backends;
pub mod lock;
pub mod state;

// Re-export main types for convenience
pub use backend::{BackendConfig, BackendError, BackendResult, StateBackend};
pub use backends::create_backend;
pub use lock::LockInfo;
pub use state::{ResourceState, StateFile};
