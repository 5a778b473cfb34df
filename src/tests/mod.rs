mod common;

mod token_cache;
