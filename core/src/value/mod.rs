pub mod attribute;
pub mod wire;
