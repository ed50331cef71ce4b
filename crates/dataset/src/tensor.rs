use serde::{Deserialize, Serialize};

/// A dense, row-major `f32` array of arbitrary rank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tensor {
    shape: Vec<usize>,
    data: Vec<f32>,
}

impl Tensor {
    pub fn zeros(shape: &[usize]) -> Self {
        Self {
            shape: shape.to_vec(),
            data: vec![0.0; shape.iter().product()],
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn get(&self, index: &[usize]) -> Option<f32> {
        self.offset(index).map(|i| self.data[i])
    }

    pub fn get_mut(&mut self, index: &[usize]) -> Option<&mut f32> {
        self.offset(index).map(|i| &mut self.data[i])
    }

    fn offset(&self, index: &[usize]) -> Option<usize> {
        if index.len() != self.shape.len() || index.iter().zip(&self.shape).any(|(i, n)| i >= n) {
            return None;
        }
        Some(index.iter().zip(&self.shape).fold(0, |acc, (i, n)| acc * n + i))
    }
}
