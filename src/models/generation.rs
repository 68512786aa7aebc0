use crate::{
    models::presets::{ClipGuidancePreset, Sampler, StylePreset},
    multipart::MultipartForm,
};
use serde::{Deserialize, Serialize};
use std::fmt;

pub const INIT_IMAGE_FILE_NAME: &str = "init_image.png";
pub const INIT_IMAGE_MIME_TYPE: &str = "image/png";

/// One weighted prompt fragment. Negative weights act as negative prompts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPrompt {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f32>,
}

impl TextPrompt {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            weight: None,
        }
    }

    pub fn with_weight(mut self, weight: f32) -> Self {
        self.weight = Some(weight);
        self
    }
}

/// Tuning fields shared by every generation request.
///
/// Values are passed through untouched; the server validates ranges
/// (cfg_scale 0..=35, samples 1..=10, steps 10..=150).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GenerationParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cfg_scale: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clip_guidance_preset: Option<ClipGuidancePreset>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sampler: Option<Sampler>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub samples: Option<u32>,
    /// 0 or absent asks the server for a random seed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style_preset: Option<StylePreset>,
}

impl GenerationParams {
    /// Appends the present fields in their fixed wire order.
    pub fn append_to<'a>(&self, form: MultipartForm<'a>) -> MultipartForm<'a> {
        form.optional_text("cfg_scale", self.cfg_scale)
            .optional_text("clip_guidance_preset", self.clip_guidance_preset)
            .optional_text("sampler", self.sampler)
            .optional_text("samples", self.samples)
            .optional_text("seed", self.seed)
            .optional_text("steps", self.steps)
            .optional_text("style_preset", self.style_preset)
    }
}

/// Chained setters for the shared tuning fields. Last write wins.
pub trait TuningOptions: Sized {
    fn params(&self) -> &GenerationParams;
    fn params_mut(&mut self) -> &mut GenerationParams;

    fn with_cfg_scale(mut self, cfg_scale: u32) -> Self {
        self.params_mut().cfg_scale = Some(cfg_scale);
        self
    }

    fn with_clip_guidance_preset(mut self, preset: ClipGuidancePreset) -> Self {
        self.params_mut().clip_guidance_preset = Some(preset);
        self
    }

    fn with_sampler(mut self, sampler: Sampler) -> Self {
        self.params_mut().sampler = Some(sampler);
        self
    }

    fn with_samples(mut self, samples: u32) -> Self {
        self.params_mut().samples = Some(samples);
        self
    }

    fn with_seed(mut self, seed: u32) -> Self {
        self.params_mut().seed = Some(seed);
        self
    }

    fn with_steps(mut self, steps: u32) -> Self {
        self.params_mut().steps = Some(steps);
        self
    }

    fn with_style_preset(mut self, preset: StylePreset) -> Self {
        self.params_mut().style_preset = Some(preset);
        self
    }

    /// Replaces every tuning field at once, e.g. from a shared template.
    fn with_params(mut self, params: GenerationParams) -> Self {
        *self.params_mut() = params;
        self
    }
}

impl TuningOptions for GenerationParams {
    fn params(&self) -> &GenerationParams {
        self
    }

    fn params_mut(&mut self) -> &mut GenerationParams {
        self
    }
}

/// Body of `POST /v1/generation/{engine}/text-to-image`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextToImageRequest {
    /// Multiple of 64; engines bound `height * width`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    pub text_prompts: Vec<TextPrompt>,
    #[serde(flatten)]
    pub params: GenerationParams,
}

impl TextToImageRequest {
    pub fn new(text_prompts: Vec<TextPrompt>) -> Self {
        Self {
            height: None,
            width: None,
            text_prompts,
            params: GenerationParams::default(),
        }
    }

    /// Single unweighted prompt.
    pub fn from_prompt(text: impl Into<String>) -> Self {
        Self::new(vec![TextPrompt::new(text)])
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
}

impl TuningOptions for TextToImageRequest {
    fn params(&self) -> &GenerationParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut GenerationParams {
        &mut self.params
    }
}

/// How the init image constrains generation. The two modes never mix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InitImageMode {
    /// 0..=1; values near 1 stay close to the init image.
    ImageStrength { image_strength: Option<f32> },
    /// Fractions (0..=1) of the diffusion steps to skip at start and end.
    StepSchedule {
        step_schedule_start: Option<f32>,
        step_schedule_end: Option<f32>,
    },
}

impl InitImageMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InitImageMode::ImageStrength { .. } => "IMAGE_STRENGTH",
            InitImageMode::StepSchedule { .. } => "STEP_SCHEDULE",
        }
    }

    /// Start of the step schedule this mode amounts to (`1 - image_strength`).
    pub fn effective_step_schedule_start(&self) -> Option<f32> {
        match *self {
            InitImageMode::ImageStrength { image_strength } => image_strength.map(|s| 1.0 - s),
            InitImageMode::StepSchedule {
                step_schedule_start,
                ..
            } => step_schedule_start,
        }
    }

    fn append_to<'a>(&self, form: MultipartForm<'a>) -> MultipartForm<'a> {
        let form = form.text("init_image_mode", self.as_str());
        match *self {
            InitImageMode::ImageStrength { image_strength } => {
                form.optional_text("image_strength", image_strength)
            }
            InitImageMode::StepSchedule {
                step_schedule_start,
                step_schedule_end,
            } => form
                .optional_text("step_schedule_start", step_schedule_start)
                .optional_text("step_schedule_end", step_schedule_end),
        }
    }
}

/// Body of `POST /v1/generation/{engine}/image-to-image`, sent as multipart.
#[derive(Clone, PartialEq)]
pub struct ImageToImageRequest {
    pub text_prompts: Vec<TextPrompt>,
    /// Raw image bytes, sent as `init_image.png`.
    pub init_image: Vec<u8>,
    pub mode: InitImageMode,
    pub params: GenerationParams,
}

impl ImageToImageRequest {
    pub fn image_strength(
        text_prompts: Vec<TextPrompt>,
        init_image: impl Into<Vec<u8>>,
        image_strength: f32,
    ) -> Self {
        Self {
            text_prompts,
            init_image: init_image.into(),
            mode: InitImageMode::ImageStrength {
                image_strength: Some(image_strength),
            },
            params: GenerationParams::default(),
        }
    }

    pub fn step_schedule(
        text_prompts: Vec<TextPrompt>,
        init_image: impl Into<Vec<u8>>,
        step_schedule_start: f32,
        step_schedule_end: Option<f32>,
    ) -> Self {
        Self {
            text_prompts,
            init_image: init_image.into(),
            mode: InitImageMode::StepSchedule {
                step_schedule_start: Some(step_schedule_start),
                step_schedule_end,
            },
            params: GenerationParams::default(),
        }
    }

    /// Prompts, then the init image, then tuning fields, then the mode fields.
    pub fn multipart_form(&self, boundary: impl Into<String>) -> MultipartForm<'_> {
        let form = MultipartForm::new(boundary)
            .text_prompts("text_prompts", &self.text_prompts)
            .file(
                "init_image",
                INIT_IMAGE_FILE_NAME,
                INIT_IMAGE_MIME_TYPE,
                &self.init_image,
            );
        let form = self.params.append_to(form);
        self.mode.append_to(form)
    }
}

impl TuningOptions for ImageToImageRequest {
    fn params(&self) -> &GenerationParams {
        &self.params
    }

    fn params_mut(&mut self) -> &mut GenerationParams {
        &mut self.params
    }
}

impl fmt::Debug for ImageToImageRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageToImageRequest")
            .field("text_prompts", &self.text_prompts)
            .field("init_image", &format_args!("<{} bytes>", self.init_image.len()))
            .field("mode", &self.mode)
            .field("params", &self.params)
            .finish()
    }
}
