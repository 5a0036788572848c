//! Types handed across the host boundary.
//!
//! All types derive `serde::Serialize` + `serde::Deserialize` so a host can
//! forward them as JSON (polling view, update notifications, exports).

pub mod events;
pub mod view;
