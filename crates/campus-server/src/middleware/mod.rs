//! HTTP middleware applied around handler routes.

mod admin_gate;

pub use admin_gate::{ADMIN_PASSWORD_HEADER, require_admin};
