mod recommendation_engine;
mod recommendation_service;

pub use recommendation_engine::RecommendationEngine;
pub use recommendation_service::RecommendationService;
