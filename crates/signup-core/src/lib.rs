pub mod config;
pub mod doctor;
pub mod fields;
pub mod steps;
pub mod strength;
pub mod time;
pub mod validate;
