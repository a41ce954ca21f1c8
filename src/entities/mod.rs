pub mod prelude;

pub mod certificate;
pub mod genre;
pub mod movie;
pub mod movie_genre_association;
pub mod movie_metrics;
pub mod movie_worker_association;
pub mod role;
pub mod worker;
