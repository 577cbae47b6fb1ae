use serde::{Deserialize, Serialize};

/// Generation and retrieval knobs sent with every chat query.
///
/// Expected ranges are documented, not enforced: the engine is the final
/// arbiter, and callers may deliberately probe out-of-domain values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParameters {
    /// Maximum number of tokens to generate
    pub n_predict: u32,
    /// Sampling temperature, expected range [0, 2]
    pub temperature: f32,
    /// Candidate-token cutoff for sampling
    pub top_k: u32,
    /// Number of documents retrieved per query
    pub rag_k: u32,
    /// Minimum similarity to keep a retrieved document, expected range [0, 1]
    pub rag_sim_threshold: f32,
}

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            n_predict: 512,
            temperature: 0.7,
            top_k: 40,
            rag_k: 3,
            rag_sim_threshold: 0.3,
        }
    }
}

/// Partial update to [`GenerationParameters`].
///
/// Fields absent from an update retain their previous value; fields present
/// always overwrite. A field of the wrong type fails deserialization, which
/// rejects the whole update before any state changes.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ParameterUpdate {
    pub n_predict: Option<u32>,
    pub temperature: Option<f32>,
    pub top_k: Option<u32>,
    pub rag_k: Option<u32>,
    pub rag_sim_threshold: Option<f32>,
}

impl GenerationParameters {
    /// Apply a partial update over this set, returning the merged result.
    pub fn merged(self, update: ParameterUpdate) -> Self {
        Self {
            n_predict: update.n_predict.unwrap_or(self.n_predict),
            temperature: update.temperature.unwrap_or(self.temperature),
            top_k: update.top_k.unwrap_or(self.top_k),
            rag_k: update.rag_k.unwrap_or(self.rag_k),
            rag_sim_threshold: update.rag_sim_threshold.unwrap_or(self.rag_sim_threshold),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = GenerationParameters::default();
        assert_eq!(params.n_predict, 512);
        assert_eq!(params.temperature, 0.7);
        assert_eq!(params.top_k, 40);
        assert_eq!(params.rag_k, 3);
        assert_eq!(params.rag_sim_threshold, 0.3);
    }

    #[test]
    fn test_merged_overwrites_present_fields() {
        let update: ParameterUpdate =
            serde_json::from_str(r#"{"n_predict": 128, "temperature": 1.2}"#).unwrap();
        let merged = GenerationParameters::default().merged(update);
        assert_eq!(merged.n_predict, 128);
        assert_eq!(merged.temperature, 1.2);
        // Absent fields keep previous values
        assert_eq!(merged.top_k, 40);
        assert_eq!(merged.rag_k, 3);
        assert_eq!(merged.rag_sim_threshold, 0.3);
    }

    #[test]
    fn test_merged_empty_update_is_identity() {
        let current = GenerationParameters {
            n_predict: 64,
            temperature: 0.1,
            top_k: 5,
            rag_k: 7,
            rag_sim_threshold: 0.9,
        };
        assert_eq!(current.merged(ParameterUpdate::default()), current);
    }

    #[test]
    fn test_out_of_domain_values_accepted() {
        // No range clamping: negative temperature and threshold > 1 pass through
        let update: ParameterUpdate =
            serde_json::from_str(r#"{"temperature": -0.5, "rag_sim_threshold": 3.0}"#).unwrap();
        let merged = GenerationParameters::default().merged(update);
        assert_eq!(merged.temperature, -0.5);
        assert_eq!(merged.rag_sim_threshold, 3.0);
    }

    #[test]
    fn test_non_numeric_field_rejects_whole_update() {
        let result = serde_json::from_str::<ParameterUpdate>(r#"{"n_predict": "lots"}"#);
        assert!(result.is_err());
    }
}
