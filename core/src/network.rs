pub mod dial;
pub mod tunnel;
