use serde::{Deserialize, Serialize};

/// Number of questions served to a single questionnaire session.
pub const QUESTIONS_PER_SESSION: usize = 10;

/// A user's response to one yes/no question, in presentation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    pub question: String,
    pub answer: bool,
}
