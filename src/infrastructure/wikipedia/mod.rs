mod client;

pub use client::WikipediaClient;
