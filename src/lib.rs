pub mod appwrite;
pub mod config;
pub mod models;
pub mod routes;
pub mod rules;
pub mod state;
pub mod store;
