use crate::domain::recommendation::Recommendation;
use serde::{Deserialize, Serialize};

/// Shape the generative model is asked to emit for recommendations.
///
/// Items are accepted as long as they decode; scores and tickers are passed
/// through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmRecommendationList {
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

impl LlmRecommendationList {
    pub fn into_recommendations(self) -> Vec<Recommendation> {
        self.recommendations
    }
}
