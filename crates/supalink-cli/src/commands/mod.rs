pub mod apps;
pub mod common;
pub mod connection;
pub mod deep_link;
pub mod settings;
pub mod status;
