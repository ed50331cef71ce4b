use crate::batch::Batch;
use crate::error::{ErrorKind, Result};
use crate::tensor::Tensor;
use derive_more::Display;
use presave_embed::{Tokenizer, WordVectors};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Which half of the corpus to read.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Split {
    #[display("train")]
    Train,
    #[display("test")]
    Test,
}

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentiment {
    #[display("pos")]
    Positive,
    #[display("neg")]
    Negative,
}
impl Sentiment {
    /// Position of this class in the one-hot label axis.
    pub fn label_index(&self) -> usize {
        match self {
            Self::Positive => 0,
            Self::Negative => 1,
        }
    }
}

/// A single labelled review file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Review {
    pub path: PathBuf,
    pub sentiment: Sentiment,
}

/// The reviews of one corpus split, in the order they will be batched.
///
/// Positive and negative reviews alternate (`pos[0]`, `neg[0]`, `pos[1]`,
/// ...) so every batch is roughly balanced; whichever class has more reviews
/// contributes the remainder at the end.
#[derive(Debug, Clone, Default)]
pub struct SentimentReviews {
    reviews: Vec<Review>,
}

impl SentimentReviews {
    /// List `<corpus>/<split>/pos` and `<corpus>/<split>/neg`.
    #[instrument(skip(corpus), fields(corpus = %corpus.as_ref().display()))]
    pub fn open(corpus: impl AsRef<Path>, split: Split) -> Result<Self> {
        let root = corpus.as_ref().join(split.to_string());
        let positive = list_reviews(&root, Sentiment::Positive)?;
        let negative = list_reviews(&root, Sentiment::Negative)?;
        tracing::debug!(positive = positive.len(), negative = negative.len(), "Listed reviews");
        Ok(Self::interleave(positive, negative))
    }

    fn interleave(positive: Vec<Review>, negative: Vec<Review>) -> Self {
        let mut reviews = Vec::with_capacity(positive.len() + negative.len());
        let mut positive = positive.into_iter();
        let mut negative = negative.into_iter();
        loop {
            match (positive.next(), negative.next()) {
                (None, None) => break,
                (p, n) => reviews.extend(p.into_iter().chain(n)),
            }
        }
        Self { reviews }
    }

    pub fn len(&self) -> usize {
        self.reviews.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reviews.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Review> {
        self.reviews.iter()
    }
}

impl IntoIterator for SentimentReviews {
    type Item = Review;
    type IntoIter = std::vec::IntoIter<Review>;
    fn into_iter(self) -> Self::IntoIter {
        self.reviews.into_iter()
    }
}

fn list_reviews(root: &Path, sentiment: Sentiment) -> Result<Vec<Review>> {
    let directory = root.join(sentiment.to_string());
    let mut reviews = Vec::new();
    for entry in fs::read_dir(&directory).map_err(|e| ErrorKind::from_io(e, &directory))? {
        let entry = entry.map_err(|e| ErrorKind::from_io(e, &directory))?;
        let file_type = entry.file_type().map_err(|e| ErrorKind::from_io(e, &entry.path()))?;
        if file_type.is_file() {
            reviews.push(Review {
                path: entry.path(),
                sentiment,
            });
        }
    }
    reviews.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(reviews)
}

/// Embeds reviews into fixed-size [`Batch`]es.
///
/// Each review is tokenized and every token without a vector is dropped. A
/// batch is as long as its longest review, capped at `truncate_length`, and
/// never shorter than one step. The label is placed at the last real time
/// step of each review (step zero for a review with no known words). Only
/// the final batch may hold fewer than `batch_size` examples.
pub struct SentimentIterator<'a, V: WordVectors + ?Sized> {
    reviews: std::vec::IntoIter<Review>,
    vectors: &'a V,
    tokenizer: Tokenizer,
    batch_size: usize,
    truncate_length: usize,
    produced: usize,
}

impl<'a, V: WordVectors + ?Sized> SentimentIterator<'a, V> {
    pub fn new(reviews: SentimentReviews, vectors: &'a V, batch_size: usize, truncate_length: usize) -> Result<Self> {
        if batch_size == 0 {
            exn::bail!(ErrorKind::InvalidParameter("batch size must be at least 1"));
        }
        if truncate_length == 0 {
            exn::bail!(ErrorKind::InvalidParameter("truncate length must be at least 1"));
        }
        Ok(Self {
            reviews: reviews.into_iter(),
            vectors,
            tokenizer: Tokenizer,
            batch_size,
            truncate_length,
            produced: 0,
        })
    }

    fn embed(&self, review: &Review) -> Result<Vec<&'a [f32]>> {
        let bytes = fs::read(&review.path).map_err(|e| ErrorKind::from_io(e, &review.path))?;
        let text = String::from_utf8_lossy(&bytes);
        let vectors: &'a V = self.vectors;
        Ok(self.tokenizer.tokenize(&text).iter().filter_map(|token| vectors.vector(token)).collect())
    }

    fn next_batch(&mut self, reviews: Vec<Review>) -> Result<Batch> {
        let embedded = reviews.iter().map(|review| self.embed(review)).collect::<Result<Vec<_>>>()?;
        let longest = embedded.iter().map(Vec::len).max().unwrap_or(0);
        let length = longest.min(self.truncate_length).max(1);
        let (examples, dimensions) = (reviews.len(), self.vectors.dimensions());

        let mut batch = Batch {
            features: Tensor::zeros(&[examples, dimensions, length]),
            labels: Tensor::zeros(&[examples, 2, length]),
            features_mask: Tensor::zeros(&[examples, length]),
            labels_mask: Tensor::zeros(&[examples, length]),
        };
        for (i, (review, tokens)) in reviews.iter().zip(&embedded).enumerate() {
            let steps = tokens.len().min(length);
            for (t, vector) in tokens.iter().take(steps).enumerate() {
                for (d, value) in vector.iter().enumerate() {
                    set(&mut batch.features, &[i, d, t], *value);
                }
                set(&mut batch.features_mask, &[i, t], 1.0);
            }
            let last = steps.max(1) - 1;
            set(&mut batch.labels, &[i, review.sentiment.label_index(), last], 1.0);
            set(&mut batch.labels_mask, &[i, last], 1.0);
        }
        Ok(batch)
    }
}

// Indices are always derived from the tensor's own shape.
fn set(tensor: &mut Tensor, index: &[usize], value: f32) {
    if let Some(slot) = tensor.get_mut(index) {
        *slot = value;
    }
}

impl<V: WordVectors + ?Sized> Iterator for SentimentIterator<'_, V> {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        let reviews: Vec<Review> = self.reviews.by_ref().take(self.batch_size).collect();
        if reviews.is_empty() {
            return None;
        }
        self.produced += 1;
        tracing::trace!(batch = self.produced, examples = reviews.len(), "Embedding batch");
        Some(self.next_batch(reviews))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let batches = self.reviews.len().div_ceil(self.batch_size);
        (batches, Some(batches))
    }
}
