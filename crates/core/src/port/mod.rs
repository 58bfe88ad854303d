// Port Layer - Interfaces for caller-supplied behavior

pub mod processor;

// Re-exports
pub use processor::Processor;
