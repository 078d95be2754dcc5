// Copyright @yucwang 2021

pub mod bvh;
pub mod computation_node;
pub mod geometry;
pub mod integrator;
pub mod interaction;
pub mod intersector;
pub mod light;
pub mod material;
pub mod rng;
pub mod scene;
pub mod sensor;
