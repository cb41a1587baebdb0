//! Structural elements: nodes, members, supports and their properties.

mod member;
mod node;
mod properties;
mod support;

pub use member::{Member, Releases};
pub use node::Node;
pub use properties::{Material, Section};
pub use support::Support;
