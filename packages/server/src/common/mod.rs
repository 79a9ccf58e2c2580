//! Record types shared between the kernel seams and the domains.

pub mod memory;
pub mod text;
pub mod types;

pub use memory::*;
pub use text::*;
pub use types::*;
