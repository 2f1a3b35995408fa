mod recommendation;

pub use recommendation::{AiRecommendation, AnalysisRequest, RecommendationTarget};
