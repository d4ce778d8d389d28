use std::sync::Arc;

use crate::error::{EmbeddingError, EmbeddingResult};
use crate::models::{EmbeddingVector, GradientDescentConfig, UpdateRule};

/// Produces updated embeddings from paired (embedding, gradient) inputs.
///
/// `apply` either returns one updated embedding per input pair or an error
/// message, which the service surfaces as an internal error. Tags and weights
/// pass through unchanged; only the vector components move.
#[cfg_attr(test, mockall::automock)]
pub trait GradientOptimizer: Send + Sync {
    fn apply(
        &self,
        embeddings: &[EmbeddingVector],
        gradients: &[EmbeddingVector],
    ) -> Result<Vec<EmbeddingVector>, String>;
}

/// Plain stochastic gradient descent: `v ← v − learning_rate · g`.
pub struct SgdOptimizer {
    embedding_dimension: usize,
    learning_rate: f32,
}

impl SgdOptimizer {
    pub fn new(embedding_dimension: usize, learning_rate: f32) -> Self {
        Self {
            embedding_dimension,
            learning_rate,
        }
    }
}

impl GradientOptimizer for SgdOptimizer {
    fn apply(
        &self,
        embeddings: &[EmbeddingVector],
        gradients: &[EmbeddingVector],
    ) -> Result<Vec<EmbeddingVector>, String> {
        if embeddings.len() != gradients.len() {
            return Err(format!(
                "mismatched embedding and gradient counts: {} v.s. {}",
                embeddings.len(),
                gradients.len()
            ));
        }

        embeddings
            .iter()
            .zip(gradients)
            .map(|(embedding, gradient)| {
                if embedding.values.len() != self.embedding_dimension {
                    return Err(format!(
                        "embedding dimension is {}, expected {}",
                        embedding.values.len(),
                        self.embedding_dimension
                    ));
                }
                if gradient.values.len() != self.embedding_dimension {
                    return Err(format!(
                        "gradient dimension is {}, expected {}",
                        gradient.values.len(),
                        self.embedding_dimension
                    ));
                }
                let values = embedding
                    .values
                    .iter()
                    .zip(&gradient.values)
                    .map(|(value, grad)| value - self.learning_rate * grad)
                    .collect();
                Ok(EmbeddingVector {
                    tag: embedding.tag.clone(),
                    values,
                    weight: embedding.weight,
                })
            })
            .collect()
    }
}

/// Instantiate the optimizer a gradient descent configuration names.
pub fn make_optimizer(
    embedding_dimension: usize,
    config: &GradientDescentConfig,
) -> EmbeddingResult<Arc<dyn GradientOptimizer>> {
    if embedding_dimension == 0 || !(config.learning_rate > 0.0) {
        return Err(EmbeddingError::OptimizerCreation);
    }
    match config.rule {
        UpdateRule::Sgd => Ok(Arc::new(SgdOptimizer::new(
            embedding_dimension,
            config.learning_rate,
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sgd_config(learning_rate: f32) -> GradientDescentConfig {
        GradientDescentConfig {
            learning_rate,
            rule: UpdateRule::Sgd,
        }
    }

    #[test]
    fn test_sgd_moves_against_gradient() {
        let optimizer = SgdOptimizer::new(2, 0.1);
        let embeddings = vec![EmbeddingVector::zeros(2)];
        let gradients = vec![EmbeddingVector::with_values(vec![1.0, 2.0])];

        let updated = optimizer.apply(&embeddings, &gradients).unwrap();
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].values, vec![-0.1, -0.2]);
    }

    #[test]
    fn test_sgd_preserves_tag_and_weight() {
        let optimizer = SgdOptimizer::new(2, 0.5);
        let embeddings = vec![EmbeddingVector {
            tag: "key1".to_string(),
            values: vec![1.0, 1.0],
            weight: 3.0,
        }];
        let gradients = vec![EmbeddingVector::with_values(vec![2.0, 0.0])];

        let updated = optimizer.apply(&embeddings, &gradients).unwrap();
        assert_eq!(updated[0].tag, "key1");
        assert_eq!(updated[0].weight, 3.0);
        assert_eq!(updated[0].values, vec![0.0, 1.0]);
    }

    #[test]
    fn test_sgd_rejects_count_mismatch() {
        let optimizer = SgdOptimizer::new(2, 0.1);
        let embeddings = vec![EmbeddingVector::zeros(2), EmbeddingVector::zeros(2)];
        let gradients = vec![EmbeddingVector::with_values(vec![1.0, 2.0])];

        let result = optimizer.apply(&embeddings, &gradients);
        assert!(result.unwrap_err().contains("2 v.s. 1"));
    }

    #[test]
    fn test_sgd_rejects_dimension_mismatch() {
        let optimizer = SgdOptimizer::new(2, 0.1);
        let embeddings = vec![EmbeddingVector::zeros(2)];
        let gradients = vec![EmbeddingVector::with_values(vec![1.0, 2.0, 3.0])];

        assert!(optimizer.apply(&embeddings, &gradients).is_err());
    }

    #[test]
    fn test_factory_validation() {
        assert!(make_optimizer(2, &sgd_config(0.1)).is_ok());
        assert!(matches!(
            make_optimizer(2, &sgd_config(0.0)),
            Err(EmbeddingError::OptimizerCreation)
        ));
        assert!(matches!(
            make_optimizer(2, &sgd_config(-0.5)),
            Err(EmbeddingError::OptimizerCreation)
        ));
        assert!(matches!(
            make_optimizer(0, &sgd_config(0.1)),
            Err(EmbeddingError::OptimizerCreation)
        ));
    }
}
