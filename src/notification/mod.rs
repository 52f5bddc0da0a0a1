// Waiting on asynchronous Cloud API tasks
pub mod waiter;

#[cfg(test)]
#[path = "waiter_tests.rs"]
mod waiter_tests;

pub use waiter::NotificationWaiter;
