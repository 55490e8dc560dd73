pub mod permissions;

pub use permissions::{authorize, PolicyError, Right, Role};
