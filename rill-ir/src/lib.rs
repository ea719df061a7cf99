#![forbid(unsafe_code)]

pub mod bytecode;
pub mod constant;
pub mod module;
pub mod types;

pub use bytecode::*;
pub use constant::*;
pub use module::*;
pub use types::*;
