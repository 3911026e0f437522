pub mod bearing;
pub mod constants;
pub mod dms;
pub mod geodesy;
pub mod grid;
pub mod minutes;
pub mod models;
pub mod projection;
