pub mod companion;
pub mod filter;
pub mod place;
pub mod restaurant;
