// Copyright @yucwang 2021

#![allow(dead_code)]

pub extern crate nalgebra as na;

pub mod core;
pub mod integrators;
pub mod lights;
pub mod math;
pub mod renderers;
pub mod sensors;
pub mod shapes;
pub mod textures;
