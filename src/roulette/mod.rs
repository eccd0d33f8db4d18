pub mod catalog;
pub mod classifier;
pub mod companion;
pub mod filter;
pub mod selector;
pub mod session;
