// src/lib.rs
pub mod config;
pub mod errors;
pub mod models;
pub mod service;
pub mod display;
pub mod form;
pub mod banner;
pub mod api;
