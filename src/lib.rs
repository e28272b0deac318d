// Module declarations for the library's core components
pub mod config; // Configuration management
pub mod error; // Error handling and types
pub mod prelude; // Common imports and types
pub mod sitop; // SITOP Solar 2000 protocol implementation
