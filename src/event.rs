//! The `event` module defines [`Event`], the envelope a producer hands to the
//! engine for every emitted value or failure.

use std::{any::Any, error::Error, sync::Arc};

use crate::SharedError;

/// Type-erased payload for streams whose producers emit values of different types.
///
/// Use `Event<AnyValue>` where heterogeneous directive results must share one
/// stream and recover the concrete type with [`Event::downcast`].
pub type AnyValue = Box<dyn Any + Send>;

/// One unit of stream data: either a successfully produced value or a failure.
///
/// Events are created by a production strategy when the value (or failure) is
/// ready and are consumed exactly once by the dispatch step that routes them to
/// the matching `Observer` callback.
#[derive(Debug, Clone)]
pub enum Event<T> {
    /// A successfully emitted value.
    Value(T),
    /// A failure. Delivering it terminates the subscription.
    Error(SharedError),
}

impl<T> Event<T> {
    /// Creates an error event from any error type.
    pub fn error_from(e: impl Error + Send + Sync + 'static) -> Self {
        Event::Error(Arc::new(e))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Event::Error(_))
    }

    /// Returns the carried value, or `None` for an error event.
    pub fn value(&self) -> Option<&T> {
        match self {
            Event::Value(v) => Some(v),
            Event::Error(_) => None,
        }
    }

    /// Returns the carried error, or `None` for a value event.
    pub fn error(&self) -> Option<&SharedError> {
        match self {
            Event::Value(_) => None,
            Event::Error(e) => Some(e),
        }
    }

    pub fn into_result(self) -> Result<T, SharedError> {
        match self {
            Event::Value(v) => Ok(v),
            Event::Error(e) => Err(e),
        }
    }
}

impl<T, E> From<Result<T, E>> for Event<T>
where
    E: Error + Send + Sync + 'static,
{
    fn from(r: Result<T, E>) -> Self {
        match r {
            Ok(v) => Event::Value(v),
            Err(e) => Event::error_from(e),
        }
    }
}

impl Event<AnyValue> {
    /// Wraps `v` into a type-erased value event.
    pub fn any<V: Any + Send>(v: V) -> Self {
        Event::Value(Box::new(v))
    }

    /// Recovers the concrete payload type.
    ///
    /// Error events convert unconditionally. A value event whose payload is not
    /// a `U` is handed back unchanged in `Err`, so a wrong guess about the payload
    /// type never panics.
    pub fn downcast<U: Any>(self) -> Result<Event<U>, Self> {
        match self {
            Event::Value(v) => match v.downcast::<U>() {
                Ok(u) => Ok(Event::Value(*u)),
                Err(v) => Err(Event::Value(v)),
            },
            Event::Error(e) => Ok(Event::Error(e)),
        }
    }
}
