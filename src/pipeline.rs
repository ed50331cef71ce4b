use crate::acquire::{CorpusState, ensure_corpus, ensure_model};
use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use presave_config::Config;
use presave_dataset::{DatasetWriter, SentimentIterator, SentimentReviews, Split};
use presave_embed::{StaticWordVectors, WordVectors};
use presave_fetch::{Confirm, Fetcher};
use std::path::Path;
use tracing::instrument;

/// What a completed run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub corpus: CorpusState,
    pub test_batches: usize,
    pub train_batches: usize,
}

/// Run every step in order: model, corpus, vectors, then the test and train
/// datasets. Any failure aborts the run.
#[instrument(skip_all)]
pub fn run(config: &Config, fetcher: &(impl Fetcher + ?Sized), confirm: &(impl Confirm + ?Sized)) -> Result<Summary> {
    let model = ensure_model(&config.model, fetcher, confirm).or_raise(|| ErrorKind::Model)?;
    let corpus = ensure_corpus(&config.corpus, fetcher).or_raise(|| ErrorKind::Corpus)?;
    let vectors = StaticWordVectors::load(&model).or_raise(|| ErrorKind::Vectors(model.clone()))?;

    let extracted = config.corpus.extracted_path();
    tracing::info!("Saving test data...");
    let test_batches = save_split(config, &extracted, &vectors, Split::Test, &config.output.test)?;
    tracing::info!("Saving train data...");
    let train_batches = save_split(config, &extracted, &vectors, Split::Train, &config.output.train)?;

    Ok(Summary {
        corpus,
        test_batches,
        train_batches,
    })
}

fn save_split(
    config: &Config,
    corpus: &Path,
    vectors: &(impl WordVectors + ?Sized),
    split: Split,
    output: &Path,
) -> Result<usize> {
    let reviews = SentimentReviews::open(corpus, split).or_raise(|| ErrorKind::Dataset(split))?;
    tracing::info!(%split, reviews = reviews.len(), "Embedding reviews");
    let batches = SentimentIterator::new(reviews, vectors, config.batch_size, config.max_length)
        .or_raise(|| ErrorKind::Dataset(split))?;
    DatasetWriter::new(output).write_all(batches).or_raise(|| ErrorKind::Dataset(split))
}
