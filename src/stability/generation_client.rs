use crate::{
    error::{Result, StabilityError},
    logger,
    models::{GenerationResponse, ImageResponse, ImageToImageRequest, TextToImageRequest},
    multipart::random_boundary,
    stability::api_client::ApiClient,
};
use reqwest::{
    header::{HeaderValue, CONTENT_TYPE},
    Method,
};

#[derive(Clone)]
pub struct GenerationClient {
    api: ApiClient,
}

impl GenerationClient {
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Generates images from text prompts; returns the response artifacts.
    pub async fn text_to_image(
        &self,
        request: &TextToImageRequest,
        engine_id: &str,
    ) -> Result<Vec<ImageResponse>> {
        let path = generation_path(engine_id, "text-to-image")?;
        let body = serde_json::to_vec(request)
            .map_err(|e| StabilityError::EncodingError(e.to_string()))?;

        // Generation latency is unbounded, so no per-call timeout.
        let mut http_request = self.api.prepare(Method::POST, &path, None)?;
        http_request
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        http_request.body = Some(body);

        log::debug!(
            "text-to-image: {} prompt(s), engine {}",
            request.text_prompts.len(),
            engine_id
        );
        let _timer = logger::timer(&format!("text-to-image on {}", engine_id));
        let response: GenerationResponse = self.api.execute(http_request).await?;
        Ok(response.artifacts)
    }

    /// Generates images from an init image plus prompts, sent as
    /// `multipart/form-data` with a boundary unique to this call.
    pub async fn image_to_image(
        &self,
        request: &ImageToImageRequest,
        engine_id: &str,
    ) -> Result<Vec<ImageResponse>> {
        let path = generation_path(engine_id, "image-to-image")?;
        let form = request.multipart_form(random_boundary());
        let body = form.encode()?;
        let content_type = HeaderValue::from_str(&form.content_type())
            .map_err(|e| StabilityError::EncodingError(e.to_string()))?;

        let mut http_request = self.api.prepare(Method::POST, &path, None)?;
        http_request.headers.insert(CONTENT_TYPE, content_type);
        http_request.body = Some(body);

        log::debug!(
            "image-to-image: mode {}, {} part(s), boundary {}",
            request.mode.as_str(),
            form.len(),
            form.boundary()
        );
        let _timer = logger::timer(&format!("image-to-image on {}", engine_id));
        let response: GenerationResponse = self.api.execute(http_request).await?;
        Ok(response.artifacts)
    }
}

fn generation_path(engine_id: &str, operation: &str) -> Result<String> {
    if matches!(engine_id, "" | "." | "..") || engine_id.contains(['/', '?', '#']) {
        return Err(StabilityError::ConfigError(format!(
            "invalid engine id: {:?}",
            engine_id
        )));
    }
    Ok(format!("/v1/generation/{}/{}", engine_id, operation))
}
