pub mod calendar;
pub mod geo;
pub mod handler_404;
