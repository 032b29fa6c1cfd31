//! Screen states and rendering

pub mod help;
pub mod main_menu;
pub mod responses;
pub mod tags;
