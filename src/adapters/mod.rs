// Adapters layer: concrete implementations for external systems (http, config).

pub mod http;

pub use http::HttpQueryService;
