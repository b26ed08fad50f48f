// dashtime - core/mod.rs
//
// Core logic layer: time model, date math, range description and
// navigation, dashboard links, menus, panel stats, notifier payloads.
// Dependencies: standard library, chrono, regex, serde.
// Must NOT depend on: platform, app, or any file I/O.

pub mod datahub;
pub mod datemath;
pub mod describe;
pub mod duration;
pub mod links;
pub mod menu;
pub mod model;
pub mod navigation;
pub mod panels;
