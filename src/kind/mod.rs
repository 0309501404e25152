pub mod registry;

pub use registry::KindRegistry;
