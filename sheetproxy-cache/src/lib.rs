//! Proxy cache for sheetproxy.
//!
//! Memoizes asynchronous producer calls by producer id and call arguments,
//! with a fixed time-to-live and a background [`ExpiryScheduler`] that
//! sweeps stale entries.
//!
//! ## Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use sheetproxy_cache::{ExpiryScheduler, ProxyCache};
//!
//! let cache = Arc::new(ProxyCache::<String>::new());
//! let scheduler = ExpiryScheduler::new(cache.clone());
//! scheduler.start();
//!
//! let greeting = cache
//!     .memoized_call("greet", ("world",), |(name,)| async move {
//!         Ok::<_, std::convert::Infallible>(format!("hello {}", name))
//!     })
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

mod cache;
mod key;
mod scheduler;

pub use cache::{CacheConfig, CacheStats, ProxyCache};
pub use key::cache_key;
pub use scheduler::{ExpiryScheduler, SchedulerHandle};
