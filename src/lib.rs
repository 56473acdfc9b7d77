//! Paige Turner
//!
//! A page-turning, page-reading gadget for an Echo device. Control
//! directives turn the page or ask for it to be read; a read runs OCR on a
//! remote machine and narrates the result back as paced `Read` events.

pub mod domain;
pub mod gadget;
pub mod infrastructure;

pub use gadget::Gadget;
