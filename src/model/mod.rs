//! Data models for reelsync.

pub mod movie;

pub use movie::{ImageSource, Movie, MovieDetails, MovieRow, PLACEHOLDER_IMAGE};
