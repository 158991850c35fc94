//! External system integrations.
//!
//! - [`tautulli`] - Tautulli HTTP API (export commands)
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits so the workflow can be
//! exercised with scripted implementations:
//!
//! ```rust,no_run
//! use tautulli_exporter::adapters::tautulli::TautulliClient;
//! use tautulli_exporter::config::secret_string;
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = TautulliClient::new(
//!     "http://tautulli.local:8181",
//!     secret_string("0123456789abcdef".to_string()),
//!     Duration::from_secs(30),
//! )?;
//! println!("Using {}", client.endpoint());
//! # Ok(())
//! # }
//! ```

pub mod tautulli;
