//! Business logic services

pub mod assembler;
pub mod cells;
pub mod codes;
pub mod dates;
pub mod duplicates;
pub mod grid;
pub mod names;
pub mod person_import;
pub mod phone_merge;
pub mod stats;
pub mod store;
