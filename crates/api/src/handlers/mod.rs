//! HTTP request handlers, one module per resource.

pub mod item;
pub mod uploads;
pub mod user;
