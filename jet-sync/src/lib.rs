//! # jet-sync
//!
//! Reconciles code-declared data type models against the definitions a CMS
//! has persisted.
//!
//! Build a [`DataTypeSynchronizer`] from the three collaborators
//! ([`DataTypeService`], [`ModelSource`], [`TypeRepository`]) and call
//! [`DataTypeSynchronizer::run`]. Hosts that synchronize at startup wrap their
//! synchronizers in an [`ApplicationHandler`], which runs them at most once.

pub mod error;
pub mod finder;
pub mod handler;
pub mod memory;
pub mod prevalues;
pub mod repository;
pub mod service;
pub mod synchronizer;
pub mod validate;

pub use error::SyncError;
pub use finder::DataTypeFinder;
pub use handler::{ApplicationHandler, StartupGate};
pub use memory::{MemoryDataTypeService, ServiceCall};
pub use repository::{FileTypeRepository, MemoryTypeRepository};
pub use service::{DataTypeService, ModelSource, TypeRepository};
pub use synchronizer::{DataTypeSynchronizer, Synchronizer, SynchronizerBuilder};
pub use validate::{validate, ValidationErrors, ValidationIssue};
