use serde::{Deserialize, Serialize};
use validator::Validate;

/// The padding sentinel: the empty key never names a real entry. It always
/// reads back as the zero vector and writes targeting it are dropped, which
/// lets callers pad variable-length batches into rectangular shapes.
pub fn is_padding_key(key: &str) -> bool {
    key.is_empty()
}

/// One embedding entry.
///
/// `tag` is a diagnostic label (set to the key when the entry is created by a
/// lazy lookup) and `weight` counts how many lazy lookups have served the
/// entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingVector {
    pub tag: String,
    pub values: Vec<f32>,
    pub weight: f32,
}

impl EmbeddingVector {
    /// The all-zero vector returned for padding keys and missing positions.
    pub fn zeros(dimension: usize) -> Self {
        Self {
            tag: String::new(),
            values: vec![0.0; dimension],
            weight: 0.0,
        }
    }

    /// An untagged, unweighted vector holding the given components.
    pub fn with_values(values: Vec<f32>) -> Self {
        Self {
            tag: String::new(),
            values,
            weight: 0.0,
        }
    }

    pub fn dimension(&self) -> usize {
        self.values.len()
    }
}

/// How a lazy lookup initializes an entry it has never seen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InitializerConfig {
    #[default]
    Zero,
    Constant(f32),
}

impl InitializerConfig {
    /// Build the initial entry for `key`. The caller increments the weight.
    pub fn initial_entry(&self, key: &str, dimension: usize) -> EmbeddingVector {
        let values = match self {
            InitializerConfig::Zero => vec![0.0; dimension],
            InitializerConfig::Constant(value) => vec![*value; dimension],
        };
        EmbeddingVector {
            tag: key.to_string(),
            values,
            weight: 0.0,
        }
    }
}

/// Which storage backend backs a session's knowledge bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageConfig {
    #[default]
    InMemory,
}

/// Storage backend plus initialization policy of one knowledge bank.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KnowledgeBankConfig {
    pub initializer: InitializerConfig,
    pub storage: StorageConfig,
}

/// Numeric update rule applied by gradient updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UpdateRule {
    #[default]
    Sgd,
}

/// Optimizer configuration; present only for sessions that take gradients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientDescentConfig {
    pub learning_rate: f32,
    pub rule: UpdateRule,
}

/// Full configuration of one embedding session. The (name, config) pair
/// defines the session identity, so every field participates in handle
/// derivation.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct DynamicEmbeddingConfig {
    #[validate(range(min = 1))]
    pub embedding_dimension: usize,
    pub knowledge_bank: KnowledgeBankConfig,
    pub gradient_descent: Option<GradientDescentConfig>,
}

impl DynamicEmbeddingConfig {
    /// An in-memory, zero-initialized session without an optimizer.
    pub fn new(embedding_dimension: usize) -> Self {
        Self {
            embedding_dimension,
            knowledge_bank: KnowledgeBankConfig::default(),
            gradient_descent: None,
        }
    }

    /// Enable SGD gradient updates with the given learning rate.
    pub fn with_sgd(mut self, learning_rate: f32) -> Self {
        self.gradient_descent = Some(GradientDescentConfig {
            learning_rate,
            rule: UpdateRule::Sgd,
        });
        self
    }
}
