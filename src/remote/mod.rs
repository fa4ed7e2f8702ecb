//! HTTP implementations of the document layer's collaborator traits.

mod http;

pub use http::*;
