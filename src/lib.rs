//! Wikipedia-backed question answering with retrieval-augmented generation.

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;

#[cfg(test)]
pub(crate) mod testing;
