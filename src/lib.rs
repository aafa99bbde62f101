//! V-Eats API - Backend for a food delivery marketplace
//!
//! This crate provides the REST API for V-Eats, enabling:
//! - Customer, restaurant and driver registration with code verification
//! - Restaurant and menu management for owners and staff
//! - Driver availability and staff review of restaurant and driver profiles

pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod error;
pub mod extract;
pub mod forms;
pub mod pagination;
pub mod permissions;
pub mod routes;
pub mod search;
pub mod services;
pub mod state;
pub mod utils;
