//! Typed REST resource client.
//!
//! # Overview
//! `ResourceClient<E>` performs list/get/create/update/delete against one
//! collection of a JSON HTTP API and returns either a typed value or a
//! classified `ApiError`. Callers never see raw status codes.
//!
//! # Design
//! - `Transport` is the only I/O seam; `HttpTransport` implements it over
//!   reqwest and is injected explicitly, never held as a global.
//! - Each operation is split into `build_*` (produces a request) and
//!   `parse_*` (classifies a response), so the I/O boundary stays explicit
//!   and both halves are testable without a network.
//! - Configuration is immutable after construction and shared read-only.
//! - The crate emits `tracing` events but never installs a subscriber, and
//!   never retries.
//!
//! ```no_run
//! use resource_client::{ClientConfig, ResourceClient, User};
//!
//! # async fn demo() -> resource_client::Result<()> {
//! let config = ClientConfig::new("https://api.test/")?;
//! let users = ResourceClient::<User>::connect(&config, "users")?;
//! let created = users.create(&User::new("James", "http://x/a.png")).await?;
//! println!("{:?}", created.id);
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod http;
pub mod transport;
pub mod types;

pub use client::ResourceClient;
pub use codec::JsonCodec;
pub use config::ClientConfig;
pub use error::{ApiError, HttpErrorKind, Result, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use transport::{HttpTransport, Transport};
pub use types::{Entity, Resource, User};
