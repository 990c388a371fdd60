use crate::SharedError;

/// Receiver side of a stream: reacts to values, to a failure and to completion.
///
/// The engine unwraps each [`Event`](crate::Event) at dispatch, so `next` gets the
/// value carried by a value event and `error` gets the failure carried by an
/// error event.
pub trait Observer {
    type NextFnType;

    fn next(&mut self, _: Self::NextFnType);
    fn complete(&mut self);
    fn error(&mut self, _: SharedError);
}
