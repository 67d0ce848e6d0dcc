pub mod charts;
pub mod classes;
pub mod core;
pub mod seats;
pub mod view;
