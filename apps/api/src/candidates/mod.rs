pub mod handlers;
pub mod models;
pub mod store;

#[cfg(test)]
pub mod memory;
