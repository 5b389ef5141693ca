//! Shared FIPA carrier types for the JADE content crates.
//!
//! The agent kernel, the transport layer and the content subsystem all
//! exchange the same two values: the [`AclMessage`] envelope-less message
//! and the [`Aid`] agent identifier. They are defined here so that the
//! content crates can fill and extract message content without depending on
//! the kernel.
//!
//! # Modules
//!
//! - [`acl`] -- [`AclMessage`], [`Performative`] and the [`MessageContent`]
//!   slot that holds either string or byte-sequence content.
//! - [`aid`] -- [`Aid`], the FIPA agent identifier.

pub mod acl;
pub mod aid;

pub use acl::{AclMessage, MessageContent, Performative};
pub use aid::Aid;
