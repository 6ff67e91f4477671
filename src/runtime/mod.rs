//! Long-lived award service: a single-writer command loop that owns the
//! roster and the contact list and runs computations off the async threads.

/// Event stream types emitted by the service.
pub mod events;
/// Handle and command loop implementation.
pub mod handle;
