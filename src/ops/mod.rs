//! Operations that look beyond the descriptor itself.

pub mod layout;

pub use layout::verify_layout;
