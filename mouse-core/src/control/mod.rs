/*
    Control Module
*/

/* --------------------------- Declare Modules -------------------------- */
pub mod cascade;
pub mod motion_profile;
pub mod moving_average;
pub mod pid_control;

pub use cascade::*;
pub use motion_profile::*;
pub use moving_average::*;
pub use pid_control::*;
