// src/models/mod.rs

pub mod attempt;
pub mod profile;
pub mod test;
