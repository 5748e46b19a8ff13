pub mod identity;
pub mod validate;
