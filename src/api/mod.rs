pub mod http;
pub mod transport;
pub mod types;

pub use http::HttpTransport;
pub use transport::{PostTransport, TransportError};
