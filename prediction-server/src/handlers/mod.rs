//! HTTP handlers

pub mod health;
pub mod form;
pub mod model;
pub mod predict;
