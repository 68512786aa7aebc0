//! `multipart/form-data` body encoding.
//!
//! Bodies are assembled by hand rather than through `reqwest::multipart` so the
//! boundary is caller-controlled and the produced bytes are deterministic for a
//! given boundary.

use crate::{
    error::{Result, StabilityError},
    models::TextPrompt,
};
use std::fmt;
use uuid::Uuid;

const CRLF: &[u8] = b"\r\n";
const MAX_BOUNDARY_LEN: usize = 70;

/// Fresh boundary token; unique per call.
pub fn random_boundary() -> String {
    format!("Boundary-{}", Uuid::new_v4())
}

#[derive(Debug, Clone)]
enum FormField<'a> {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        file_name: String,
        mime_type: String,
        data: &'a [u8],
    },
}

impl FormField<'_> {
    fn name(&self) -> &str {
        match self {
            FormField::Text { name, .. } | FormField::File { name, .. } => name,
        }
    }
}

/// Ordered list of form parts, encoded on demand with [`MultipartForm::encode`].
#[derive(Debug, Clone)]
pub struct MultipartForm<'a> {
    boundary: String,
    fields: Vec<FormField<'a>>,
}

impl<'a> MultipartForm<'a> {
    pub fn new(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            fields: Vec::new(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the `Content-Type` request header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    /// Adds a scalar part using the value's `Display` form.
    pub fn text(mut self, name: impl Into<String>, value: impl fmt::Display) -> Self {
        self.fields.push(FormField::Text {
            name: name.into(),
            value: value.to_string(),
        });
        self
    }

    /// Adds a scalar part only when `value` is present.
    pub fn optional_text<T: fmt::Display>(self, name: impl Into<String>, value: Option<T>) -> Self {
        match value {
            Some(value) => self.text(name, value),
            None => self,
        }
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime_type: impl Into<String>,
        data: &'a [u8],
    ) -> Self {
        self.fields.push(FormField::File {
            name: name.into(),
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            data,
        });
        self
    }

    /// Flattens prompts into `{name}[i][text]` and, when weighted,
    /// `{name}[i][weight]` parts, in input order.
    pub fn text_prompts(mut self, name: &str, prompts: &[TextPrompt]) -> Self {
        for (index, prompt) in prompts.iter().enumerate() {
            let prefix = format!("{}[{}]", name, index);
            self = self
                .text(format!("{}[text]", prefix), &prompt.text)
                .optional_text(format!("{}[weight]", prefix), prompt.weight);
        }
        self
    }

    /// Part names in emission order.
    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(FormField::name).collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        validate_boundary(&self.boundary)?;
        let delimiter = format!("--{}", self.boundary);

        let mut body = Vec::new();
        for field in &self.fields {
            body.extend_from_slice(delimiter.as_bytes());
            body.extend_from_slice(CRLF);

            match field {
                FormField::Text { name, value } => {
                    check_header_param("field name", name)?;
                    check_content(name, value.as_bytes(), &delimiter)?;

                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{}\"", name).as_bytes(),
                    );
                    body.extend_from_slice(CRLF);
                    body.extend_from_slice(CRLF);
                    body.extend_from_slice(value.as_bytes());
                }
                FormField::File {
                    name,
                    file_name,
                    mime_type,
                    data,
                } => {
                    check_header_param("field name", name)?;
                    check_header_param("file name", file_name)?;
                    check_header_param("content type", mime_type)?;
                    check_content(name, data, &delimiter)?;

                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"",
                            name, file_name
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(CRLF);
                    body.extend_from_slice(format!("Content-Type: {}", mime_type).as_bytes());
                    body.extend_from_slice(CRLF);
                    body.extend_from_slice(CRLF);
                    body.extend_from_slice(data);
                }
            }
            body.extend_from_slice(CRLF);
        }

        body.extend_from_slice(delimiter.as_bytes());
        body.extend_from_slice(b"--");
        body.extend_from_slice(CRLF);
        Ok(body)
    }
}

/// RFC 2046: 1 to 70 `bchars`, not ending in a space.
fn validate_boundary(boundary: &str) -> Result<()> {
    let valid_len = (1..=MAX_BOUNDARY_LEN).contains(&boundary.len());
    let valid_chars = boundary.chars().all(|c| {
        c.is_ascii_alphanumeric() || " '()+_,-./:=?".contains(c)
    });

    if !valid_len || !valid_chars || boundary.ends_with(' ') {
        return Err(StabilityError::EncodingError(format!(
            "invalid multipart boundary: {:?}",
            boundary
        )));
    }
    Ok(())
}

fn check_header_param(what: &str, value: &str) -> Result<()> {
    if value.contains(['"', '\r', '\n']) {
        return Err(StabilityError::EncodingError(format!(
            "{} cannot be placed in a part header: {:?}",
            what, value
        )));
    }
    Ok(())
}

fn check_content(name: &str, content: &[u8], delimiter: &str) -> Result<()> {
    let needle = delimiter.as_bytes();
    if content.len() >= needle.len() && content.windows(needle.len()).any(|w| w == needle) {
        return Err(StabilityError::EncodingError(format!(
            "content of part {:?} contains the multipart boundary",
            name
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn body_string(form: &MultipartForm) -> String {
        String::from_utf8(form.encode().unwrap()).unwrap()
    }

    #[test]
    fn test_exact_layout() {
        let image = [0x89u8, b'P', b'N', b'G'];
        let prompts = vec![TextPrompt::new("a lighthouse").with_weight(0.5)];
        let form = MultipartForm::new("XYZ")
            .text_prompts("text_prompts", &prompts)
            .file("init_image", "init_image.png", "image/png", &image)
            .text("cfg_scale", 7);

        let body = form.encode().unwrap();

        let mut expected = Vec::new();
        expected.extend_from_slice(
            b"--XYZ\r\nContent-Disposition: form-data; name=\"text_prompts[0][text]\"\r\n\r\na lighthouse\r\n",
        );
        expected.extend_from_slice(
            b"--XYZ\r\nContent-Disposition: form-data; name=\"text_prompts[0][weight]\"\r\n\r\n0.5\r\n",
        );
        expected.extend_from_slice(
            b"--XYZ\r\nContent-Disposition: form-data; name=\"init_image\"; filename=\"init_image.png\"\r\nContent-Type: image/png\r\n\r\n",
        );
        expected.extend_from_slice(&image);
        expected.extend_from_slice(b"\r\n");
        expected.extend_from_slice(
            b"--XYZ\r\nContent-Disposition: form-data; name=\"cfg_scale\"\r\n\r\n7\r\n",
        );
        expected.extend_from_slice(b"--XYZ--\r\n");

        assert_eq!(body, expected);
    }

    #[test]
    fn test_prompt_flattening_counts() {
        let prompts = vec![
            TextPrompt::new("first"),
            TextPrompt::new("second").with_weight(-1.0),
            TextPrompt::new("third"),
            TextPrompt::new("fourth").with_weight(0.25),
        ];
        let form = MultipartForm::new("b").text_prompts("text_prompts", &prompts);
        let names = form.field_names();

        let texts: Vec<&str> = names.iter().copied().filter(|n| n.ends_with("[text]")).collect();
        let weights: Vec<&str> = names.iter().copied().filter(|n| n.ends_with("[weight]")).collect();

        assert_eq!(
            texts,
            vec![
                "text_prompts[0][text]",
                "text_prompts[1][text]",
                "text_prompts[2][text]",
                "text_prompts[3][text]",
            ]
        );
        assert_eq!(weights, vec!["text_prompts[1][weight]", "text_prompts[3][weight]"]);
    }

    #[test]
    fn test_empty_prompts_emit_nothing() {
        let form = MultipartForm::new("b").text_prompts("text_prompts", &[]);
        assert!(form.is_empty());
        assert_eq!(body_string(&form), "--b--\r\n");
    }

    #[test]
    fn test_optional_text_omits_absent_values() {
        let form = MultipartForm::new("b")
            .optional_text("seed", None::<u32>)
            .optional_text("steps", Some(30));
        assert_eq!(form.field_names(), vec!["steps"]);
        let body = body_string(&form);
        assert!(!body.contains("name=\"seed\""));
        assert!(body.contains("name=\"steps\"\r\n\r\n30\r\n"));
    }

    #[test]
    fn test_binary_content_is_not_reencoded() {
        let data: Vec<u8> = (0..=255u8).collect();
        let form = MultipartForm::new("b").file("f", "f.bin", "application/octet-stream", &data);
        let body = form.encode().unwrap();
        assert!(body.windows(data.len()).any(|w| w == data.as_slice()));
    }

    #[test]
    fn test_invalid_boundary_is_encoding_error() {
        let too_long = "x".repeat(71);
        for boundary in ["", "has\"quote", "trailing ", too_long.as_str()] {
            let result = MultipartForm::new(boundary).text("a", "b").encode();
            assert!(matches!(result, Err(StabilityError::EncodingError(_))));
        }
    }

    #[test]
    fn test_content_containing_boundary_is_rejected() {
        let data = b"prefix\r\n--XYZ\r\nsuffix";
        let result = MultipartForm::new("XYZ")
            .file("init_image", "init_image.png", "image/png", data)
            .encode();
        assert!(matches!(result, Err(StabilityError::EncodingError(_))));
    }

    #[test]
    fn test_header_injection_is_rejected() {
        let result = MultipartForm::new("b").text("bad\"name", "v").encode();
        assert!(matches!(result, Err(StabilityError::EncodingError(_))));

        let result = MultipartForm::new("b")
            .file("f", "evil\r\nname.png", "image/png", b"x")
            .encode();
        assert!(matches!(result, Err(StabilityError::EncodingError(_))));
    }

    #[test]
    fn test_random_boundaries_are_unique_and_valid() {
        let boundaries: HashSet<String> = (0..1000).map(|_| random_boundary()).collect();
        assert_eq!(boundaries.len(), 1000);
        for boundary in &boundaries {
            assert!(validate_boundary(boundary).is_ok());
        }
    }

    #[test]
    fn test_content_type() {
        let form = MultipartForm::new("abc");
        assert_eq!(form.content_type(), "multipart/form-data; boundary=abc");
    }
}
