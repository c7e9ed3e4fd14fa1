//! Boundary to the pretrained sentiment classifier.
//!
//! Tokenisation and inference happen outside this crate. Everything here talks to
//! the model through [`SentimentModel`].

use anyhow::Result;

mod command;

pub use command::CommandModel;

use crate::models::Prediction;

pub const MENTION_PLACEHOLDER: &str = "@user";
pub const URL_PLACEHOLDER: &str = "http";

pub trait SentimentModel {
    /// Class probabilities for `text`. Implementations apply [`preprocess`] first.
    fn predict(&self, text: &str) -> Result<Prediction>;
}

/// Replace user mentions and links with fixed placeholders.
///
/// Tokens are split on single spaces so the original spacing survives.
pub fn preprocess(text: &str) -> String {
    text.split(' ')
        .map(|token| {
            if token.starts_with('@') && token.len() > 1 {
                MENTION_PLACEHOLDER
            } else if token.starts_with("http") {
                URL_PLACEHOLDER
            } else {
                token
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
