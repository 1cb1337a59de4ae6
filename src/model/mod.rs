//src/model/mod.rs
pub mod earth;

// Re-exports for cleaner imports
pub use earth::Earth;
