//! The Entity-Component-System (ECS) module.
//!
//! This module contains all the gameplay components, resources, and the
//! systems that run them each tick.

pub mod collision;
pub mod components;
pub mod ghost;
pub mod item;
pub mod movement;
pub mod player;
pub mod portal;
pub mod round;
pub mod timer;
