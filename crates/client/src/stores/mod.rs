//! Client-side state stores.
//!
//! Both stores are synchronous and therefore atomic with respect to the
//! event loop: no two mutations of the same store can interleave
//! mid-operation. They are constructed with their dependencies rather than
//! reached through globals, so tests can use doubles and multiple
//! concurrent instances are possible.

pub mod cart;
pub mod orders;

pub use cart::CartStore;
pub use orders::OrderListStore;
