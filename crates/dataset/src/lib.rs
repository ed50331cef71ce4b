//! Turning labelled reviews into numeric batches and persisting them.
//!
//! - [`SentimentReviews`] lists the positive and negative reviews of one
//!   corpus split; [`SentimentIterator`] embeds them into [`Batch`]es.
//! - [`Batch::save`]/[`Batch::load`] serialize a batch to a single file.
//! - [`DatasetWriter`] drains a batch iterator into `dataset-<i>.bin` files.

mod batch;
pub mod error;
mod sentiment;
mod tensor;
mod writer;

pub use crate::batch::Batch;
pub use crate::sentiment::{Review, Sentiment, SentimentIterator, SentimentReviews, Split};
pub use crate::tensor::Tensor;
pub use crate::writer::{DatasetWriter, PROGRESS_INTERVAL, batch_file_name};
