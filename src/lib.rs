pub mod api;
pub mod config;
pub mod database;
pub mod error;
pub mod http;
pub mod types;
pub mod utils;
pub mod visit;

pub use api::LottoApi;
pub use database::{KeyValueStore, SqliteStore};
pub use error::{ApiError, StorageError, TransportError};
pub use http::{BearerAuth, HttpTransport, Passthrough, RequestInterceptor, Transport};
pub use types::*;
pub use visit::{Clock, SystemClock, VisitTracker, today_key};
