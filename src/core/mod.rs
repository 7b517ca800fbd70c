pub mod errors;
pub mod interfaces;
pub mod matching;
pub mod models;
pub mod orchestrators;
