pub use super::certificate::Entity as Certificate;
pub use super::genre::Entity as Genre;
pub use super::movie::Entity as Movie;
pub use super::movie_genre_association::Entity as MovieGenreAssociation;
pub use super::movie_metrics::Entity as MovieMetrics;
pub use super::movie_worker_association::Entity as MovieWorkerAssociation;
pub use super::role::Entity as Role;
pub use super::worker::Entity as Worker;
