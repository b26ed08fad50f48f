// dashtime - app/mod.rs
//
// Application layer: time controls state, the range picker and its
// persisted history.
// Dependencies: core, platform (config values), util.

pub mod controls;
pub mod history;
pub mod picker;
