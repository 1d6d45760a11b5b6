pub mod app;
pub mod bot;
pub mod common;
pub mod config;
pub mod docs;
pub mod modules;
pub mod routes;
pub mod state;
