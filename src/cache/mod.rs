pub mod provider;
pub mod token;
pub mod token_store;
