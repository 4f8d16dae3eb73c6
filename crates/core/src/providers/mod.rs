pub mod loader;
pub mod priority;
pub mod provider;
pub mod registry;
pub mod store;

pub use loader::*;
pub use priority::*;
pub use provider::*;
pub use registry::*;
pub use store::*;
