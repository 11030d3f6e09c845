//! Model capability descriptors
//!
//! Azure AI model inference endpoints serve many model families behind one
//! wire format, so the client cannot discover what a deployment supports.
//! Callers describe the deployed model with a [`ModelInfo`] and the client
//! validates requests against it before anything goes over the network.

use crate::error::LlmError;

/// Model family label.
///
/// The family controls response post-processing: the `R1` reasoning family
/// interleaves `<think>...</think>` regions with its visible output, which
/// the client extracts into [`ChatResponse::thinking`](crate::types::ChatResponse).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelFamily {
    /// DeepSeek-R1 style reasoning models
    R1,
    /// Family not known to this crate; carries the original label
    Other(String),
    /// No family information available
    Unknown,
}

impl ModelFamily {
    /// Parse a family label. Unrecognized labels map to `Other`.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "r1" | "deepseek-r1" => Self::R1,
            "unknown" => Self::Unknown,
            _ => Self::Other(name.to_string()),
        }
    }

    /// Whether responses of this family carry inline `<think>` regions.
    pub fn is_reasoning(&self) -> bool {
        matches!(self, Self::R1)
    }
}

impl std::fmt::Display for ModelFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::R1 => write!(f, "r1"),
            Self::Other(name) => write!(f, "{name}"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Capability descriptor for the deployed model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    /// Whether the model can be asked for JSON output
    pub json_output: bool,
    /// Whether the model supports tool/function calling
    pub function_calling: bool,
    /// Whether the model accepts image input
    pub vision: bool,
    /// Whether the model supports structured (schema-constrained) output
    pub structured_output: bool,
    /// Model family label
    pub family: ModelFamily,
}

impl ModelInfo {
    /// Create a builder for a model descriptor.
    pub fn builder() -> ModelInfoBuilder {
        ModelInfoBuilder::default()
    }
}

/// Builder for [`ModelInfo`].
///
/// `family` is the one required field; `build` fails without it.
#[derive(Debug, Clone, Default)]
pub struct ModelInfoBuilder {
    json_output: bool,
    function_calling: bool,
    vision: bool,
    structured_output: bool,
    family: Option<ModelFamily>,
}

impl ModelInfoBuilder {
    /// Set JSON output support
    pub fn json_output(mut self, supported: bool) -> Self {
        self.json_output = supported;
        self
    }

    /// Set tool/function calling support
    pub fn function_calling(mut self, supported: bool) -> Self {
        self.function_calling = supported;
        self
    }

    /// Set image input support
    pub fn vision(mut self, supported: bool) -> Self {
        self.vision = supported;
        self
    }

    /// Set structured output support
    pub fn structured_output(mut self, supported: bool) -> Self {
        self.structured_output = supported;
        self
    }

    /// Set the model family
    pub fn family(mut self, family: ModelFamily) -> Self {
        self.family = Some(family);
        self
    }

    /// Build the descriptor.
    pub fn build(self) -> Result<ModelInfo, LlmError> {
        let family = self.family.ok_or_else(|| {
            LlmError::ConfigurationError(
                "Missing required field 'family' in model_info".to_string(),
            )
        })?;

        Ok(ModelInfo {
            json_output: self.json_output,
            function_calling: self.function_calling,
            vision: self.vision,
            structured_output: self.structured_output,
            family,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_family() {
        let err = ModelInfo::builder()
            .function_calling(true)
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("Missing required field 'family'"));
    }

    #[test]
    fn test_builder_with_family() {
        let info = ModelInfo::builder()
            .vision(true)
            .family(ModelFamily::Unknown)
            .build()
            .unwrap();
        assert!(info.vision);
        assert!(!info.function_calling);
        assert_eq!(info.family, ModelFamily::Unknown);
    }

    #[test]
    fn test_family_from_name() {
        assert_eq!(ModelFamily::from_name("r1"), ModelFamily::R1);
        assert_eq!(ModelFamily::from_name("R1"), ModelFamily::R1);
        assert_eq!(ModelFamily::from_name("unknown"), ModelFamily::Unknown);
        assert_eq!(
            ModelFamily::from_name("gpt-4o"),
            ModelFamily::Other("gpt-4o".to_string())
        );
        assert!(ModelFamily::R1.is_reasoning());
        assert!(!ModelFamily::Unknown.is_reasoning());
    }
}
