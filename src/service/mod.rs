pub mod config;
pub mod rates_service;
