//! Unit tests for stack manager orchestration.
