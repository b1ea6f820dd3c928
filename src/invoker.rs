//! Invocation collaborator: executes opaque callback references.
//!
//! The scheduler never interprets a callback reference itself; it only
//! hands the reference to an [`Invoker`] and uses its textual form when
//! deriving job ids.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{CronError, CronResult};

/// Error returned by a failing callback execution.
///
/// The dispatch loop captures and reports these; they never stop the loop.
pub type InvokeError = Box<dyn std::error::Error + Send + Sync>;

/// Opaque reference to an invocable callback.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CallbackRef(String);

impl CallbackRef {
    /// Create a callback reference. Fails with
    /// [`CronError::InvalidCallback`] when the descriptor is blank.
    pub fn new(descriptor: impl Into<String>) -> CronResult<Self> {
        let descriptor = descriptor.into();
        if descriptor.trim().is_empty() {
            return Err(CronError::InvalidCallback);
        }
        Ok(Self(descriptor))
    }

    /// The textual descriptor.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CallbackRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Executes opaque callback references on behalf of the scheduler.
#[async_trait]
pub trait Invoker: Send + Sync {
    /// Execute the callback with no arguments, returning normally or with
    /// a caller-supplied error.
    async fn invoke(&self, callback: &CallbackRef) -> Result<(), InvokeError>;
}

type CallbackFuture = Pin<Box<dyn Future<Output = Result<(), InvokeError>> + Send>>;
type CallbackFn = dyn Fn() -> CallbackFuture + Send + Sync;

/// [`Invoker`] backed by an explicit name-to-function registry.
///
/// Callback references resolve by exact descriptor match; invoking an
/// unregistered descriptor fails like any other callback error.
#[derive(Default)]
pub struct CallbackRegistry {
    callbacks: HashMap<String, Arc<CallbackFn>>,
}

impl CallbackRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an async function under a descriptor name. A later insert
    /// with the same name replaces the earlier one.
    pub fn insert<F, Fut>(&mut self, name: impl Into<String>, callback: F)
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), InvokeError>> + Send + 'static,
    {
        let callback = move || -> CallbackFuture { Box::pin(callback()) };
        self.callbacks.insert(name.into(), Arc::new(callback));
    }

    /// Whether a descriptor is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.callbacks.contains_key(name)
    }
}

#[async_trait]
impl Invoker for CallbackRegistry {
    async fn invoke(&self, callback: &CallbackRef) -> Result<(), InvokeError> {
        match self.callbacks.get(callback.as_str()) {
            Some(callback) => callback().await,
            None => Err(format!("unknown callback: {callback}").into()),
        }
    }
}
