//! Constants used throughout the notes core crate.
//!
//! Fixed model settings and the markers and defaults of the extraction schema live here so the
//! prompt, the extractor and the table shaping agree on them.

/// Default base URL of the hosted OpenAI-compatible chat completions API.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Model identifier sent with every completion request.
pub const DEFAULT_MODEL: &str = "mixtral-8x7b-32768";

/// Sampling temperature sent with every completion request.
pub const DEFAULT_TEMPERATURE: f32 = 0.0;

/// Retries after the first failed attempt of a completion request.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Initial backoff before the first retry; doubled for each later retry.
pub const INITIAL_BACKOFF_MS: u64 = 500;

/// Upper bound on a single backoff delay.
pub const MAX_BACKOFF_MS: u64 = 8_000;

/// Marker opening the fenced JSON block in a model reply.
pub const JSON_FENCE_OPEN: &str = "```json";

/// Marker closing any fenced block.
pub const FENCE_CLOSE: &str = "```";

/// Status shown when the model reply carries no status.
pub const STATUS_NOT_AVAILABLE: &str = "Not Available";

/// Placeholder for a medication field missing from the model reply.
pub const FIELD_NOT_AVAILABLE: &str = "N/A";

/// Key of the ordered-tests list inside the services object.
pub const TESTS_KEY: &str = "tests";

/// Category given to services data that is not keyed by category.
pub const SERVICES_CATEGORY: &str = "services";
