pub mod adapters;
pub mod config;
pub mod error;
pub mod password;
pub mod web;
