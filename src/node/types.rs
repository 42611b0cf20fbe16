//! Request and output types for the generation node.

use crate::tensor::ImageTensor;

/// Default model identifier used when the host does not supply one.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image-preview";

/// Framing hint controlling the instruction wrapped around the prompt.
///
/// This is a prompt-level hint forwarded to the remote model, not a local
/// image-processing operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AspectRatio {
    /// No framing constraint.
    #[default]
    Free,
    /// Wide rectangular output, width greater than height.
    Landscape,
    /// Tall rectangular output, height greater than width.
    Portrait,
    /// Square output, width equal to height.
    Square,
}

impl AspectRatio {
    /// Wraps the literal prompt in the framing instruction for this ratio.
    pub fn framed_prompt(&self, prompt: &str) -> String {
        match self {
            Self::Free => format!("Create a detailed image of: {prompt}."),
            Self::Landscape => format!(
                "Generate the image as a wide rectangular image where width is greater than height. Create a detailed image of: {prompt}."
            ),
            Self::Portrait => format!(
                "Generate the image as a tall rectangular image where height is greater than width. Create a detailed image of: {prompt}."
            ),
            Self::Square => format!(
                "Generate the image as a square image where width equals height. Create a detailed image of: {prompt}."
            ),
        }
    }

    /// Returns the ratio name for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::Landscape => "landscape",
            Self::Portrait => "portrait",
            Self::Square => "square",
        }
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A request to generate one image.
///
/// All fields are read once per call; the node keeps no state between calls.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// The text prompt describing the desired image.
    pub prompt: String,
    /// API key sent in the `x-goog-api-key` header.
    pub api_key: String,
    /// Base URL of the API. Empty selects the built-in default endpoint.
    pub base_url: String,
    /// Model identifier inserted into the endpoint path.
    pub model: String,
    /// Framing hint applied to the prompt.
    pub aspect_ratio: AspectRatio,
    /// Sampling temperature in `[0, 2]`.
    pub temperature: f32,
    /// Generation seed. 0 requests a fresh random seed for the call.
    pub seed: u32,
    /// Ordered reference images used as visual guidance, at most eight.
    pub reference_images: Vec<ImageTensor>,
}

impl GenerationRequest {
    /// Creates a request with the given prompt and API key.
    pub fn new(prompt: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            api_key: api_key.into(),
            base_url: String::new(),
            model: DEFAULT_MODEL.to_string(),
            aspect_ratio: AspectRatio::default(),
            temperature: 1.0,
            seed: 0,
            reference_images: Vec::new(),
        }
    }

    /// Sets the base URL. A trailing slash is stripped at dispatch time.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the model identifier.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the framing hint.
    pub fn with_aspect_ratio(mut self, aspect_ratio: AspectRatio) -> Self {
        self.aspect_ratio = aspect_ratio;
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the generation seed. 0 means randomize per call.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    /// Appends a reference image. Order is preserved on the wire.
    pub fn with_reference_image(mut self, image: ImageTensor) -> Self {
        self.reference_images.push(image);
        self
    }
}

/// Metadata about a completed generation call.
#[derive(Debug, Clone, Default)]
pub struct GenerationMetadata {
    /// Model identifier used for the call.
    pub model: String,
    /// Seed actually sent, after zero-seed randomization.
    pub seed: u32,
    /// Wall-clock duration of the call in milliseconds.
    pub duration_ms: u64,
}

/// The outcome of a generation call: exactly one image plus status text.
#[derive(Debug, Clone)]
#[must_use = "generated output should be handed back to the host"]
pub struct GenerationOutput {
    /// Generated image as a single-frame batch tensor, values in `[0, 1]`.
    pub image: ImageTensor,
    /// Text accumulated from the response, or a default success message.
    pub status: String,
    /// Call metadata.
    pub metadata: GenerationMetadata,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framed_prompt_templates() {
        assert_eq!(
            AspectRatio::Free.framed_prompt("a cat"),
            "Create a detailed image of: a cat."
        );
        assert_eq!(
            AspectRatio::Landscape.framed_prompt("a cat"),
            "Generate the image as a wide rectangular image where width is greater than height. Create a detailed image of: a cat."
        );
        assert_eq!(
            AspectRatio::Portrait.framed_prompt("a cat"),
            "Generate the image as a tall rectangular image where height is greater than width. Create a detailed image of: a cat."
        );
        assert_eq!(
            AspectRatio::Square.framed_prompt("a cat"),
            "Generate the image as a square image where width equals height. Create a detailed image of: a cat."
        );
    }

    #[test]
    fn test_aspect_ratio_display() {
        assert_eq!(AspectRatio::Free.to_string(), "free");
        assert_eq!(AspectRatio::Landscape.to_string(), "landscape");
        assert_eq!(AspectRatio::default(), AspectRatio::Free);
    }

    #[test]
    fn test_request_defaults() {
        let request = GenerationRequest::new("a cat", "key-1234567890");
        assert_eq!(request.model, DEFAULT_MODEL);
        assert!(request.base_url.is_empty());
        assert_eq!(request.aspect_ratio, AspectRatio::Free);
        assert_eq!(request.temperature, 1.0);
        assert_eq!(request.seed, 0);
        assert!(request.reference_images.is_empty());
    }

    #[test]
    fn test_request_builder_chaining() {
        let image = ImageTensor::from_frame(1, 1, vec![0.0, 0.5, 1.0]).unwrap();
        let request = GenerationRequest::new("a cat", "key-1234567890")
            .with_base_url("https://example.test/")
            .with_model("custom-image-model")
            .with_aspect_ratio(AspectRatio::Portrait)
            .with_temperature(0.4)
            .with_seed(1234)
            .with_reference_image(image);

        assert_eq!(request.base_url, "https://example.test/");
        assert_eq!(request.model, "custom-image-model");
        assert_eq!(request.aspect_ratio, AspectRatio::Portrait);
        assert_eq!(request.temperature, 0.4);
        assert_eq!(request.seed, 1234);
        assert_eq!(request.reference_images.len(), 1);
    }
}
