pub mod roster;
pub mod shift;
