//! Port contracts for the stack workflow.

mod catalog;

pub use catalog::{
    AttachServerSpec, NewStack, RemoteCatalog, RemoteCatalogError, RemoteCatalogResult,
};
