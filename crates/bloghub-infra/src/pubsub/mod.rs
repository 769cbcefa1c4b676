//! Push channel implementations.

mod memory;

pub use memory::InMemoryPushChannel;
