//! HTTP middleware shared by the backend's routers.

pub mod metrics;
pub mod request_id;
pub mod security_headers;

pub use self::metrics::metrics_middleware;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
pub use security_headers::security_headers_middleware;
