//! Spin wheel and dice roller widgets for a tabbed browser page.
//!
//! The crate compiles to WebAssembly for the browser and to a plain `rlib`
//! for native tests. Everything that decides an outcome (chip parsing,
//! sector layout, spin physics, dice rolls, the tab session, and its saved
//! JSON form) lives in DOM-free modules driven by [`engine::EngineCore`].
//! The `web` feature adds the canvas, audio, and timer plumbing that turns
//! [`engine::Action`]s into pixels and sound.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Testable [`engine::EngineCore`] and the host [`engine::Action`] contract |
//! | [`session`] | Ordered tab registry and active-tab tracking |
//! | [`snapshot`] | Save/load of the session as a JSON document |
//! | [`wheel`] | Wheel widget: chips, sectors, staged rebuilds, result banner |
//! | [`spin`] | Friction-decay spin physics and pointer-sector math |
//! | [`sector`] | Chip list to weighted sector list |
//! | [`chip`] | Chip text parsing and label truncation |
//! | [`color`] | Hex colors and WCAG contrast checks |
//! | [`dice`] | Dice settings, rolls, and the rolling animation |
//! | [`config`] | Host-supplied tunables with defaults |
//! | [`consts`] | Shared constants (physics, colors, timing) |
//! | `render` | Canvas drawing of a wheel (`web` only) |
//! | `audio` | Detent tick sound (`web` only) |
//! | `web` | `wasm_bindgen` entry point (`web` only) |

pub mod chip;
pub mod color;
pub mod config;
pub mod consts;
pub mod dice;
pub mod engine;
pub mod sector;
pub mod session;
pub mod snapshot;
pub mod spin;
pub mod wheel;

#[cfg(feature = "web")]
pub mod audio;
#[cfg(feature = "web")]
pub mod render;
#[cfg(feature = "web")]
pub mod web;
