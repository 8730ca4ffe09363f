// All core functionality is in resumate-core
// This CLI acts as a thin wrapper around the core library

// CLI-specific modules
pub mod data_dir;

// Re-export core types for convenience
pub use resumate_core::*;

// Re-export CLI utilities
pub use data_dir::DataDir;
