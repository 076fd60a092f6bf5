//! Maze solving and motion execution core of a micromouse.
//!
//! | Module         | Contents                                                       |
//! |----------------|----------------------------------------------------------------|
//! | [`maze`]       | Cell grid, flood fill, direction selection, persistence        |
//! | [`planner`]    | Movement kinds and the direction list to movement plan compiler |
//! | [`navigation`] | Per-tick motion executor, odometry, search explorer            |
//! | [`control`]    | PID controllers and the motor control cascade                  |
//! | [`sensors`]    | IR wall sensing and filtering                                  |
//! | [`resources`]  | Constants, kinematic tables, parameters, storage, handoff       |
//! | [`tick`]       | The 1 kHz control tick composing everything above              |
//!
//! The crate is `no_std`; everything is owned by the caller and passed into
//! [`tick::control_tick`] by reference.

#![cfg_attr(not(test), no_std)]

pub mod control;
pub mod maze;
pub mod navigation;
pub mod planner;
pub mod resources;
pub mod sensors;
pub mod tick;
