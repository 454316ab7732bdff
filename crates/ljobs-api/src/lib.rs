mod adapter;
mod error;
mod handler;
mod http;

pub use adapter::SnapshotAdapter;
pub use error::ApiError;
pub use handler::ApiHandler;
pub use http::HttpApi;
