//! Dropbox image store: uploads product images and returns public links.

pub mod client;
pub mod error;
mod header;
pub mod types;

pub use client::{raw_url, DropboxClient, DropboxEndpoints};
pub use error::DropboxError;
