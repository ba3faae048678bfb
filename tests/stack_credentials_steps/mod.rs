//! Step definitions for stack credential scenarios.


mod given;
mod then;
mod when;
