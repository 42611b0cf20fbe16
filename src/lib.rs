#![warn(missing_docs)]
//! Image generation node for visual node-graph hosts.
//!
//! This crate implements a single host node: it takes a text prompt plus up
//! to eight optional reference images, forwards them to a remote generative
//! image API speaking the `generateContent` wire format, and converts the
//! text/image response back into the host's tensor representation
//! (`batch x height x width x 3`, `f32` in `[0, 1]`) plus a status string.
//!
//! The call is fully synchronous and blocking with a 60-second timeout.
//! There is no retry, no streaming and no state kept between calls; the
//! host owns scheduling and may drive the client from multiple threads.
//!
//! # Quick Start
//!
//! ```no_run
//! use imgen::{AspectRatio, GenerationRequest, ImageGenerationClient};
//!
//! fn main() -> imgen::Result<()> {
//!     let client = ImageGenerationClient::new()?;
//!     let request = GenerationRequest::new("A golden retriever puppy", "my-api-key-123")
//!         .with_aspect_ratio(AspectRatio::Landscape);
//!     let output = client.generate(&request)?;
//!     println!(
//!         "{} ({}x{})",
//!         output.status,
//!         output.image.width(),
//!         output.image.height()
//!     );
//!     Ok(())
//! }
//! ```

mod error;
pub mod node;
pub mod tensor;

pub use error::{ImgenError, Result};
pub use node::{
    AspectRatio, GenerationMetadata, GenerationOutput, GenerationRequest, ImageGenerationClient,
    ImageGenerationClientBuilder,
};
pub use tensor::ImageTensor;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::{ImgenError, Result};
    pub use crate::node::{AspectRatio, GenerationRequest, ImageGenerationClient};
    pub use crate::tensor::ImageTensor;
}
