pub mod contract;
pub mod questionnaire;
pub mod recommendation;
