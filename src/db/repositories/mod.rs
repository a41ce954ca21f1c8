pub mod analytics;
pub mod association;
pub mod catalog;
pub mod movie;
pub mod worker;
