// Adapters layer: concrete enrollment stores behind the domain ports.

pub mod http;
pub mod memory;

pub use http::HttpEnrollmentStore;
pub use memory::{DataBundle, InMemoryEnrollmentStore};
