//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL repositories using Diesel
//! - **avatars**: Gravatar defaults and Cloudinary uploads
//! - **credentials**: Argon2id password hashing
//! - **notifications**: confirmation links written to the log
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business rules.

pub mod avatars;
pub mod credentials;
pub mod notifications;
pub mod persistence;
