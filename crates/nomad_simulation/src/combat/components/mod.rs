//! Combat components

pub mod surface;
pub mod weapon;


// Re-export all components
pub use surface::*;
pub use weapon::*;
