//! Workspace (Notion) integration.
//!
//! # Data Flow
//! ```text
//! Recipe + source link
//!     → blocks.rs (database properties, page body tree)
//!     → client.rs (create page, append overflow blocks)
//!     → PageRef { id, url }
//! ```

pub mod blocks;
pub mod client;
pub mod types;

pub use client::NotionClient;
pub use types::{NotionError, NotionResult, PageRef};
