//! Typed client for the Stability AI REST API.
//!
//! ```no_run
//! use stabilityai::{StabilityClient, StabilityConfig, TextToImageRequest, TuningOptions};
//!
//! # async fn run() -> stabilityai::Result<()> {
//! let client = StabilityClient::new(StabilityConfig::new("sk-..."));
//! let request = TextToImageRequest::from_prompt("A lighthouse on a cliff")
//!     .with_dimensions(1024, 1024)
//!     .with_steps(30);
//!
//! for artifact in client.generate_from_text(&request, "stable-diffusion-xl-1024-v1-0").await? {
//!     artifact.save(format!("{}.png", artifact.seed))?;
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod multipart;
pub mod response;
pub mod stability;
pub mod transport;

pub use config::StabilityConfig;
pub use error::{Result, StabilityError};
pub use models::*;
pub use multipart::MultipartForm;
pub use stability::{EngineClient, GenerationClient, StabilityClient, UserClient};
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
