// src/handlers/mod.rs

pub mod admin;
pub mod assessment;
pub mod profile;
