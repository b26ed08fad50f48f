// dashtime - lib.rs
//
// Library entry point. The `dashtime` binary in `main.rs` is a thin CLI over
// these modules; integration tests use the same surface.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
