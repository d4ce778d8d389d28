use prost::Message;
use rpc::embedding::v1 as pb;

use crate::conversions::config_from_proto;
use crate::error::{EmbeddingError, EmbeddingResult};
use crate::models::DynamicEmbeddingConfig;

/// Derive the session handle for a (name, configuration) pair.
///
/// The handle is the hex encoding of the deterministically serialized
/// StartSession request, so it is a pure function of its inputs: equal pairs
/// share a session, differing configurations get independent sessions, and a
/// service that has never seen the handle can decode it and rebuild the
/// session from scratch.
pub fn derive_session_handle(name: &str, config: &DynamicEmbeddingConfig) -> String {
    encode_session_handle(&pb::StartSessionRequest {
        name: name.to_string(),
        config: Some(config.clone().into()),
    })
}

/// Hex-encode an already-built StartSession request into a handle.
pub fn encode_session_handle(request: &pb::StartSessionRequest) -> String {
    hex::encode(request.encode_to_vec())
}

/// Decode a handle back into the (name, configuration) pair that minted it.
pub fn decode_session_handle(handle: &str) -> EmbeddingResult<(String, DynamicEmbeddingConfig)> {
    let bytes = hex::decode(handle)
        .map_err(|e| EmbeddingError::InvalidSessionHandle(e.to_string()))?;
    let request = pb::StartSessionRequest::decode(bytes.as_slice())
        .map_err(|e| EmbeddingError::InvalidSessionHandle(e.to_string()))?;
    let config = config_from_proto(request.config)?;
    Ok((request.name, config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_is_deterministic() {
        let config = DynamicEmbeddingConfig::new(2);
        let first = derive_session_handle("emb", &config);
        let second = derive_session_handle("emb", &config);
        assert_eq!(first, second);
        assert!(!first.is_empty());
    }

    #[test]
    fn test_distinct_names_give_distinct_handles() {
        let config = DynamicEmbeddingConfig::new(2);
        assert_ne!(
            derive_session_handle("emb1", &config),
            derive_session_handle("emb2", &config)
        );
    }

    #[test]
    fn test_distinct_configs_give_distinct_handles() {
        let plain = DynamicEmbeddingConfig::new(2);
        let with_sgd = DynamicEmbeddingConfig::new(2).with_sgd(0.1);
        assert_ne!(
            derive_session_handle("emb", &plain),
            derive_session_handle("emb", &with_sgd)
        );
        assert_ne!(
            derive_session_handle("emb", &plain),
            derive_session_handle("emb", &DynamicEmbeddingConfig::new(3))
        );
    }

    #[test]
    fn test_handle_round_trip() {
        let config = DynamicEmbeddingConfig::new(2).with_sgd(0.1);
        let handle = derive_session_handle("emb", &config);
        let (name, decoded) = decode_session_handle(&handle).unwrap();
        assert_eq!(name, "emb");
        assert_eq!(decoded, config);
    }

    #[test]
    fn test_handle_rejects_bad_hex() {
        let result = decode_session_handle("not hex at all!");
        assert!(matches!(
            result,
            Err(EmbeddingError::InvalidSessionHandle(_))
        ));
    }

    #[test]
    fn test_handle_rejects_missing_config() {
        // A handle encoding a request without a config decodes, but the
        // config conversion fails.
        let handle = encode_session_handle(&pb::StartSessionRequest {
            name: "emb".to_string(),
            config: None,
        });
        let result = decode_session_handle(&handle);
        assert!(matches!(result, Err(EmbeddingError::BankCreation)));
    }
}
