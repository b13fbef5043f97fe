//! Clients registry core.
//!
//! SQLite-backed storage of client records with allow-listed search,
//! CSV export and simple frequency analytics. The `clients_registry`
//! binary is a thin command-line front end over this library.
//!
//! ```rust,ignore
//! use clients_registry::{ClientRepository, config, db};
//!
//! let config = config::init()?;
//! let repo = ClientRepository::new(db::acquire(&config).await?);
//! let oslo = repo.search_by_field("city", "Oslo").await?;
//! ```

pub mod analytics;
pub mod config;
pub mod db;
pub mod error;
pub mod export;
pub mod models;

pub use db::ClientRepository;
pub use error::{ClientError, Result};
