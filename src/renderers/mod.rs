// Copyright @yucwang 2021

pub mod framebuffer;
pub mod simple;
