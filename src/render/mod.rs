//! Presentation adapters
//!
//! Rendering consumes the core's data structures; the core itself never
//! emits color or markup.

pub mod html;
pub mod text;
