//! Block entities: the host-facing side of a chiseled block and an anvil.
//!
//! Both wrap their core aggregate in its shared lock so the host can edit
//! from the logic thread and tesselate elsewhere, and both persist through
//! an [`AttributeTree`](crate::AttributeTree).

pub mod anvil;
pub mod chisel;

pub use anvil::AnvilBlockEntity;
pub use chisel::{ChiselBlockEntity, ChiselOutcome};
