//! Type definitions

pub mod import;
pub mod layout;
pub mod person;

pub use import::*;
pub use layout::*;
pub use person::*;
