//! Pretrained word embeddings and the tokenizer that feeds them.
//!
//! [`StaticWordVectors::load`] reads word2vec models in either the binary
//! layout published with the GoogleNews vectors or the plain-text layout
//! (word2vec `.txt`, GloVe), optionally compressed. [`Tokenizer`] splits
//! review text into the lowercase tokens those models are keyed by.

pub mod error;
mod tokenize;
mod vectors;
mod word2vec;

pub use crate::tokenize::Tokenizer;
pub use crate::vectors::{StaticWordVectors, WordVectors};
