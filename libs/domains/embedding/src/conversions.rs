//! Conversions between `embedding.v1` protos and domain models.
//!
//! Config conversions are fallible: a proto missing its knowledge bank
//! section, initializer or storage selection cannot build a bank, and a
//! gradient descent section without an update rule cannot build an optimizer.

use rpc::embedding::v1 as pb;

use crate::error::{EmbeddingError, EmbeddingResult};
use crate::models::{
    DynamicEmbeddingConfig, EmbeddingVector, GradientDescentConfig, InitializerConfig,
    KnowledgeBankConfig, StorageConfig, UpdateRule,
};

impl From<pb::EmbeddingVector> for EmbeddingVector {
    fn from(proto: pb::EmbeddingVector) -> Self {
        Self {
            tag: proto.tag,
            values: proto.value,
            weight: proto.weight,
        }
    }
}

impl From<EmbeddingVector> for pb::EmbeddingVector {
    fn from(vector: EmbeddingVector) -> Self {
        Self {
            tag: vector.tag,
            value: vector.values,
            weight: vector.weight,
        }
    }
}

impl TryFrom<pb::DynamicEmbeddingConfig> for DynamicEmbeddingConfig {
    type Error = EmbeddingError;

    fn try_from(proto: pb::DynamicEmbeddingConfig) -> EmbeddingResult<Self> {
        let bank = proto
            .knowledge_bank_config
            .ok_or(EmbeddingError::BankCreation)?;

        let initializer = match bank.initializer.and_then(|initializer| initializer.kind) {
            Some(pb::initializer::Kind::Zero(_)) => InitializerConfig::Zero,
            Some(pb::initializer::Kind::Constant(constant)) => {
                InitializerConfig::Constant(constant.value)
            }
            None => return Err(EmbeddingError::BankCreation),
        };

        let storage = match bank.storage {
            Some(pb::knowledge_bank_config::Storage::InMemory(_)) => StorageConfig::InMemory,
            None => return Err(EmbeddingError::BankCreation),
        };

        let gradient_descent = match proto.gradient_descent_config {
            Some(gd) => {
                let rule = match gd.rule {
                    Some(pb::gradient_descent_config::Rule::Sgd(_)) => UpdateRule::Sgd,
                    None => return Err(EmbeddingError::OptimizerCreation),
                };
                Some(GradientDescentConfig {
                    learning_rate: gd.learning_rate,
                    rule,
                })
            }
            None => None,
        };

        Ok(Self {
            embedding_dimension: proto.embedding_dimension as usize,
            knowledge_bank: KnowledgeBankConfig {
                initializer,
                storage,
            },
            gradient_descent,
        })
    }
}

/// Convert an optional proto config; absence is a bank construction failure.
pub fn config_from_proto(
    proto: Option<pb::DynamicEmbeddingConfig>,
) -> EmbeddingResult<DynamicEmbeddingConfig> {
    proto.ok_or(EmbeddingError::BankCreation)?.try_into()
}

impl From<DynamicEmbeddingConfig> for pb::DynamicEmbeddingConfig {
    fn from(config: DynamicEmbeddingConfig) -> Self {
        Self {
            embedding_dimension: config.embedding_dimension as u32,
            knowledge_bank_config: Some(pb::KnowledgeBankConfig {
                initializer: Some(pb::Initializer {
                    kind: Some(match config.knowledge_bank.initializer {
                        InitializerConfig::Zero => {
                            pb::initializer::Kind::Zero(pb::ZeroInitializer {})
                        }
                        InitializerConfig::Constant(value) => {
                            pb::initializer::Kind::Constant(pb::ConstantInitializer { value })
                        }
                    }),
                }),
                storage: Some(match config.knowledge_bank.storage {
                    StorageConfig::InMemory => pb::knowledge_bank_config::Storage::InMemory(
                        pb::InMemoryKnowledgeBankConfig {},
                    ),
                }),
            }),
            gradient_descent_config: config.gradient_descent.map(|gd| {
                pb::GradientDescentConfig {
                    learning_rate: gd.learning_rate,
                    rule: Some(match gd.rule {
                        UpdateRule::Sgd => pb::gradient_descent_config::Rule::Sgd(pb::SgdConfig {}),
                    }),
                }
            }),
        }
    }
}
