pub mod label;
pub mod record;

pub use label::{LabelMap, Prediction, SentimentLabel};
pub use record::{PredictionRecord, MAX_LOGGED_TEXT_CHARS};
