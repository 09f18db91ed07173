mod client;

pub use client::EvmClient;
