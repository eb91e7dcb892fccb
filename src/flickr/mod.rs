//! Typed client for the photo-sharing API.

mod client;
mod types;

pub use client::FlickrClient;
pub use types::{Photo, PhotoPage};
