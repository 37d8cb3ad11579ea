//! Webhook domain module for HTTP callback notifications

mod entity;
mod repository;

pub use entity::*;
pub use repository::*;
