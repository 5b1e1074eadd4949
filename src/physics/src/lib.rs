pub mod config;
pub mod constraint;
pub mod controller_message;
pub mod error;
pub mod particle;
pub mod particle_group;
pub mod physical_model;
pub mod solver;
pub mod time_manager;
pub mod world;

pub use protocol::V3;
