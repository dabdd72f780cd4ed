pub mod app;
pub mod batch;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod output;
pub mod rhea;
pub mod sparql;
pub mod table;
pub mod transform;
pub mod uniprot;
