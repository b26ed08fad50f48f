// dashtime - platform/mod.rs
//
// Platform abstraction layer.
// Dependencies: standard library, directories crate, core (config value
// validation and settings parsing only).
// Must NOT depend on: app.

pub mod config;
pub mod fs;
