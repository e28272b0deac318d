pub mod frame; // Wire frame codec
pub mod replay; // Capture dump replay store
