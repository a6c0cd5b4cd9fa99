//! Results that are either available now or arrive later.
//!
//! Copyright (c) 2025 Posit, PBC
//!
//! Resolution is synchronous for plain file-system lookups and asynchronous
//! when a build tool's module resolver is involved. Both paths produce a
//! `MaybeAsync`, so there is one code path: synchronous callers take the
//! `Ready` value, asynchronous callers await it.

use std::fmt;
use std::future::{Future, IntoFuture};

use futures::future::{self, BoxFuture, FutureExt};

/// A value that is ready now, or a future that will produce it.
pub enum MaybeAsync<T> {
    Ready(T),
    Pending(BoxFuture<'static, T>),
}

impl<T: Send + 'static> MaybeAsync<T> {
    pub fn ready(value: T) -> Self {
        MaybeAsync::Ready(value)
    }

    pub fn pending<F>(fut: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        MaybeAsync::Pending(fut.boxed())
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, MaybeAsync::Ready(_))
    }

    /// Transform the value, now if it is ready, otherwise once it arrives.
    pub fn map<U, F>(self, f: F) -> MaybeAsync<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        match self {
            MaybeAsync::Ready(value) => MaybeAsync::Ready(f(value)),
            MaybeAsync::Pending(fut) => MaybeAsync::Pending(fut.map(f).boxed()),
        }
    }

    /// Take the value if it is ready, handing back `self` otherwise.
    pub fn into_ready(self) -> Result<T, Self> {
        match self {
            MaybeAsync::Ready(value) => Ok(value),
            pending => Err(pending),
        }
    }
}

impl<T: Send + 'static> IntoFuture for MaybeAsync<T> {
    type Output = T;
    type IntoFuture = BoxFuture<'static, T>;

    fn into_future(self) -> Self::IntoFuture {
        match self {
            MaybeAsync::Ready(value) => future::ready(value).boxed(),
            MaybeAsync::Pending(fut) => fut,
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for MaybeAsync<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaybeAsync::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            MaybeAsync::Pending(_) => f.write_str("Pending(<future>)"),
        }
    }
}
