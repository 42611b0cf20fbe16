//! Synchronous client for the `generateContent` image endpoint.

use crate::error::{ImgenError, Result};
use crate::node::types::{GenerationMetadata, GenerationOutput, GenerationRequest};
use crate::tensor::ImageTensor;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Endpoint used when the request does not name a base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.yoboxapp.com/gemini";

/// Network timeout applied to a single generation call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Maximum number of reference images accepted per request.
pub const MAX_REFERENCE_IMAGES: usize = 8;

const API_KEY_HEADER: &str = "x-goog-api-key";
const MIN_API_KEY_LEN: usize = 10;
const PNG_MIME: &str = "image/png";
const DEFAULT_SUCCESS_STATUS: &str = "Image generated successfully.";

type SeedSource = Box<dyn Fn() -> u32 + Send + Sync>;

/// Builder for [`ImageGenerationClient`].
pub struct ImageGenerationClientBuilder {
    timeout: Duration,
    seed_source: SeedSource,
}

impl ImageGenerationClientBuilder {
    /// Creates a builder with the default timeout and seed source.
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            seed_source: Box::new(random_seed),
        }
    }

    /// Overrides the network timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Replaces the source of seeds drawn when a request passes seed 0.
    pub fn seed_source(mut self, source: impl Fn() -> u32 + Send + Sync + 'static) -> Self {
        self.seed_source = Box::new(source);
        self
    }

    /// Builds the client.
    pub fn build(self) -> Result<ImageGenerationClient> {
        let http = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()?;
        Ok(ImageGenerationClient {
            http,
            seed_source: self.seed_source,
        })
    }
}

impl Default for ImageGenerationClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Synchronous image generation client.
///
/// One call performs exactly one outbound POST and either returns one image
/// plus status text or fails. The client holds no mutable state between
/// calls; the host may invoke it from multiple threads.
pub struct ImageGenerationClient {
    http: reqwest::blocking::Client,
    seed_source: SeedSource,
}

impl ImageGenerationClient {
    /// Creates a new `ImageGenerationClientBuilder`.
    pub fn builder() -> ImageGenerationClientBuilder {
        ImageGenerationClientBuilder::new()
    }

    /// Creates a client with default settings.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Generates one image from the given request.
    ///
    /// Blocks for at most the configured timeout. Input validation runs
    /// before any network access.
    pub fn generate(&self, request: &GenerationRequest) -> Result<GenerationOutput> {
        let start = Instant::now();

        if request.api_key.len() < MIN_API_KEY_LEN {
            return Err(ImgenError::InvalidCredentials);
        }
        if request.reference_images.len() > MAX_REFERENCE_IMAGES {
            return Err(ImgenError::InvalidRequest(format!(
                "at most {MAX_REFERENCE_IMAGES} reference images are accepted, got {}",
                request.reference_images.len()
            )));
        }

        let seed = resolve_seed(request.seed, self.seed_source.as_ref());
        let body = build_request_body(request, seed)?;
        let url = endpoint_url(&request.base_url, &request.model);

        debug!(
            url = %url,
            model = %request.model,
            seed,
            parts = body.contents[0].parts.len(),
            "dispatching generation request"
        );

        let response = self
            .http
            .post(&url)
            .header(API_KEY_HEADER, &request.api_key)
            .json(&body)
            .send()?;

        let status = response.status().as_u16();
        let text = response.text()?;
        let text = check_status(status, text)?;

        let (image, status_text) = parse_success_body(&text)?;
        let metadata = GenerationMetadata {
            model: request.model.clone(),
            seed,
            duration_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            model = %metadata.model,
            duration_ms = metadata.duration_ms,
            height = image.height(),
            width = image.width(),
            "image generated"
        );

        Ok(GenerationOutput {
            image,
            status: status_text,
            metadata,
        })
    }
}

/// Draws a seed uniformly from `[1, 2^31 - 1)`.
fn random_seed() -> u32 {
    use rand::Rng;
    rand::thread_rng().gen_range(1u32..2_147_483_647)
}

fn resolve_seed<F: Fn() -> u32 + ?Sized>(requested: u32, source: &F) -> u32 {
    if requested == 0 {
        source()
    } else {
        requested
    }
}

fn endpoint_url(base_url: &str, model: &str) -> String {
    let base = if base_url.is_empty() {
        DEFAULT_BASE_URL
    } else {
        base_url
    };
    let base = base.trim_end_matches('/');
    format!("{base}/v1beta/models/{model}:generateContent")
}

fn build_request_body(request: &GenerationRequest, seed: u32) -> Result<GenerateContentBody> {
    let mut prompt = request.aspect_ratio.framed_prompt(&request.prompt);

    let mut image_parts = Vec::with_capacity(request.reference_images.len());
    for (i, tensor) in request.reference_images.iter().enumerate() {
        let data = encode_reference_png(tensor).map_err(|e| ImgenError::ImageEncoding {
            index: i + 1,
            reason: e.to_string(),
        })?;
        image_parts.push(RequestPart::InlineData {
            inline_data: InlineData {
                mime_type: PNG_MIME.to_string(),
                data,
            },
        });
    }

    match image_parts.len() {
        0 => {}
        1 => prompt.push_str(" Use this reference image as guidance."),
        n => prompt.push_str(&format!(" Use these {n} reference images as guidance.")),
    }

    let mut parts = Vec::with_capacity(image_parts.len() + 1);
    parts.push(RequestPart::Text { text: prompt });
    parts.extend(image_parts);

    Ok(GenerateContentBody {
        contents: vec![Content {
            role: "user".to_string(),
            parts,
        }],
        generation_config: GenerationConfig {
            temperature: request.temperature,
            seed,
            response_modalities: vec!["Text".to_string(), "Image".to_string()],
        },
    })
}

/// Renders the first frame of `tensor` as PNG and base64-encodes it.
fn encode_reference_png(tensor: &ImageTensor) -> std::result::Result<String, image::ImageError> {
    let mut png = Vec::new();
    image::DynamicImage::ImageRgb8(tensor.to_rgb_image())
        .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)?;
    Ok(BASE64.encode(&png))
}

fn check_status(status: u16, body: String) -> Result<String> {
    if status != 200 {
        return Err(ImgenError::Api { status, body });
    }
    Ok(body)
}

/// Walks the response parts in order: text accumulates into the status
/// string, the first inline image wins and any later parts are ignored.
fn parse_success_body(body: &str) -> Result<(ImageTensor, String)> {
    let response: GenerateContentResponse = serde_json::from_str(body)?;

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or(ImgenError::EmptyResponse)?;
    let content = candidate.content.ok_or(ImgenError::EmptyResponse)?;

    let mut status = String::new();
    for part in content.parts {
        match part {
            ResponsePart::Text { text } => status.push_str(&text),
            ResponsePart::InlineData { inline_data } => {
                let bytes = BASE64.decode(inline_data.data)?;
                let image = ImageTensor::from_encoded(&bytes)?;
                let status = if status.is_empty() {
                    DEFAULT_SUCCESS_STATUS.to_string()
                } else {
                    status
                };
                return Ok((image, status));
            }
            ResponsePart::Other(_) => {}
        }
    }

    if status.is_empty() {
        Err(ImgenError::EmptyResponse)
    } else {
        Err(ImgenError::TextOnly(status))
    }
}

// Wire format for the generateContent endpoint. `generationConfig` is
// camelCase but `response_modalities` inside it is snake_case; both follow
// the endpoint as deployed, not a single naming convention.

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentBody {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    seed: u32,
    response_modalities: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

/// Variant order matters: a part carrying both `text` and `inlineData`
/// counts as text, matching how parts are walked upstream.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ResponsePart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Other(serde_json::Value),
}
