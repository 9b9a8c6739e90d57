//! TechSpace AI - Tech & Space News Curator
//!
//! This crate curates the freshest technology and space stories from
//! Google News topic searches and turns them into a short-form video
//! script package, served through a small web interface.

pub mod config;
pub mod curator;
pub mod fetcher;
pub mod generator;
pub mod models;
pub mod routes;
pub mod text;
