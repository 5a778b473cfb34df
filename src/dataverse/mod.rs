pub mod action;
pub mod client;
pub mod form;
pub mod resource;
