//! Client for the 1C:Enterprise OData REST interface.

pub mod client;
pub mod error;
mod retry;
pub mod types;

pub use client::{ODataClient, ODataSettings};
pub use error::ODataError;
pub use types::ODataPage;
