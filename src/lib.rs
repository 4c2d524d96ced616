pub mod config;
pub mod controllers;
pub mod db;
pub mod dto;
pub mod entity;
pub mod error;
pub mod live;
pub mod maintenance;
pub mod models;
pub mod repository;
pub mod response;
pub mod routes;
pub mod services;
pub mod settings;
pub mod state;
pub mod store;
