pub mod posters;
pub mod providers;
pub mod recommendations;

pub use posters::{PosterCache, PosterSettings};
pub use recommendations::{rank_neighbors, RecommendationEngine};
