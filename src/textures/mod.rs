// Copyright @yucwang 2026

pub mod texture_map;
