// Domain module - Value types shared by every layer
pub mod command;
pub mod config;
pub mod error;
