pub mod address;
pub mod bootstrap;
pub mod listener;
