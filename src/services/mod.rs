// src/services/mod.rs
pub mod calculations;
pub mod db;
