//! Application services for the stack workflow.

mod manager;

pub use manager::{
    CreateStackRequest, ErrorKind, StackManager, StackManagerError, StackManagerResult,
};
