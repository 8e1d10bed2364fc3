//! Virtual machine trace tables and their algebraic extension.

pub mod extension;
pub mod table;
