/*
* Resources Hub
*/

/* --------------------------- Declare Modules -------------------------- */
pub mod config;
pub mod general_params;
pub mod movement_params;
pub mod param_packet;
pub mod sensor_resources;
pub mod storage;

pub use config::*;
pub use general_params::*;
pub use movement_params::*;
pub use param_packet::*;
pub use sensor_resources::*;
pub use storage::*;
