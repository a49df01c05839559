pub mod config;
pub mod ticket;
pub mod ticket_repository;
