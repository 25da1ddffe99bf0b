//! Core types for the Bookcase catalog

mod book;
mod cover;

pub use book::{Book, MAX_RATING, PLACEHOLDER_ISBN};
pub use cover::{Cover, ImageFormat};
