//! The image generation node: request types and the synchronous client.

mod client;
mod types;

pub use client::{
    ImageGenerationClient, ImageGenerationClientBuilder, DEFAULT_BASE_URL, DEFAULT_TIMEOUT,
    MAX_REFERENCE_IMAGES,
};
pub use types::{
    AspectRatio, GenerationMetadata, GenerationOutput, GenerationRequest, DEFAULT_MODEL,
};
