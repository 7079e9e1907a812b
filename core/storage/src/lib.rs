//! Collection storage providers for Shelf.
//!
//! This module provides the trait every collection backend implements and a
//! provider registry for picking one at startup.
//!
//! # Design Principles
//! - Provider isolation: no backend-specific logic in the collection service
//! - Async operations: all provider calls are async
//! - Hard constraints: providers own title uniqueness and the single-active rule

pub mod provider;
pub mod registry;
pub mod memory;
pub mod local;
mod set;

pub use provider::{Collection, CollectionProvider};
pub use registry::{ProviderRegistry, ProviderFactory, create_default_registry};
pub use memory::MemoryProvider;
pub use local::LocalProvider;
