//! Study inputs: the radiograph itself and what the caller knows about it.

use std::fmt;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{RadiodraftError, Result};

const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Which kind of radiograph the study is.
///
/// Selects the findings and report prompt templates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageType {
    /// A single chest view (PA, AP, or AP portable).
    #[default]
    ChestSingle,
    /// A PA chest view paired with a lateral.
    ChestPaLateral,
    /// An extremity study.
    Limb,
}

impl ImageType {
    /// Parse a tag, falling back to [`ImageType::ChestSingle`] for anything
    /// unrecognised (including the legacy `chest` tag).
    pub fn parse_lenient(tag: &str) -> Self {
        match tag.trim().to_ascii_lowercase().as_str() {
            "chest_single" => ImageType::ChestSingle,
            "chest_pa_lateral" => ImageType::ChestPaLateral,
            "limb" => ImageType::Limb,
            _ => ImageType::ChestSingle,
        }
    }

    /// Wire tag of the variant.
    pub fn as_str(self) -> &'static str {
        match self {
            ImageType::ChestSingle => "chest_single",
            ImageType::ChestPaLateral => "chest_pa_lateral",
            ImageType::Limb => "limb",
        }
    }
}

impl fmt::Display for ImageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw radiograph bytes with a sniffed MIME type.
///
/// Only JPEG and PNG are accepted; anything else is rejected up front so
/// the pipeline never spends money on a payload the model cannot read.
#[derive(Clone, PartialEq, Eq)]
pub struct XrayImage {
    bytes: Vec<u8>,
    mime: &'static str,
}

impl XrayImage {
    /// Validate and wrap image bytes.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Result<Self> {
        let bytes = bytes.into();
        let mime = if bytes.starts_with(PNG_MAGIC) {
            "image/png"
        } else if bytes.starts_with(JPEG_MAGIC) {
            "image/jpeg"
        } else if bytes.is_empty() {
            return Err(RadiodraftError::UnsupportedImage {
                reason: "image is empty".into(),
            });
        } else {
            return Err(RadiodraftError::UnsupportedImage {
                reason: "only JPEG and PNG images are accepted".into(),
            });
        };
        Ok(Self { bytes, mime })
    }

    /// The MIME type (`image/jpeg` or `image/png`).
    pub fn mime(&self) -> &'static str {
        self.mime
    }

    /// The raw bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Encode as a `data:` URL for an image attachment.
    pub fn to_data_url(&self) -> String {
        let encoded = base64::engine::general_purpose::STANDARD.encode(&self.bytes);
        format!("data:{};base64,{encoded}", self.mime)
    }
}

impl fmt::Debug for XrayImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XrayImage")
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Everything the pipeline needs for one study.
#[derive(Debug, Clone)]
pub struct StudyRequest {
    /// The radiograph.
    pub image: XrayImage,
    /// Study type.
    pub image_type: ImageType,
    /// Patient age in years.
    pub patient_age: Option<u32>,
    /// Free-text clinical indication.
    pub clinical_indications: Option<String>,
    /// Projection hint, e.g. `PA`, `AP Portable`.
    pub view: Option<String>,
}

impl StudyRequest {
    /// A request with no optional context.
    pub fn new(image: XrayImage, image_type: ImageType) -> Self {
        Self {
            image,
            image_type,
            patient_age: None,
            clinical_indications: None,
            view: None,
        }
    }

    /// Attach a patient age. Zero is treated as unknown.
    pub fn with_patient_age(mut self, age: u32) -> Self {
        self.patient_age = (age > 0).then_some(age);
        self
    }

    /// Attach a clinical indication. Blank text is treated as absent.
    pub fn with_clinical_indications(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        self.clinical_indications = (!text.trim().is_empty()).then_some(text);
        self
    }

    /// Attach a projection hint.
    pub fn with_view(mut self, view: impl Into<String>) -> Self {
        self.view = Some(view.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn jpeg() -> Vec<u8> {
        vec![0xFF, 0xD8, 0xFF, 0xE0, 0x00, 0x10]
    }

    #[test]
    fn lenient_parse_known_tags() {
        assert_eq!(ImageType::parse_lenient("chest_single"), ImageType::ChestSingle);
        assert_eq!(
            ImageType::parse_lenient("CHEST_PA_LATERAL"),
            ImageType::ChestPaLateral
        );
        assert_eq!(ImageType::parse_lenient(" limb "), ImageType::Limb);
    }

    #[test]
    fn lenient_parse_falls_back_to_single_chest() {
        assert_eq!(ImageType::parse_lenient("chest"), ImageType::ChestSingle);
        assert_eq!(ImageType::parse_lenient("skull"), ImageType::ChestSingle);
        assert_eq!(ImageType::parse_lenient(""), ImageType::ChestSingle);
    }

    #[test]
    fn image_type_serde_tags() {
        let json = serde_json::to_string(&ImageType::ChestPaLateral).unwrap();
        assert_eq!(json, "\"chest_pa_lateral\"");
    }

    #[test]
    fn accepts_jpeg_and_png() {
        assert_eq!(XrayImage::from_bytes(jpeg()).unwrap().mime(), "image/jpeg");
        let mut png = PNG_MAGIC.to_vec();
        png.extend_from_slice(&[0, 0, 0, 13]);
        assert_eq!(XrayImage::from_bytes(png).unwrap().mime(), "image/png");
    }

    #[test]
    fn rejects_other_formats() {
        let err = XrayImage::from_bytes(b"GIF89a....".to_vec()).unwrap_err();
        assert!(matches!(err, RadiodraftError::UnsupportedImage { .. }));
        assert!(XrayImage::from_bytes(Vec::new()).is_err());
    }

    #[test]
    fn data_url_is_base64() {
        let img = XrayImage::from_bytes(jpeg()).unwrap();
        assert_eq!(img.to_data_url(), "data:image/jpeg;base64,/9j/4AAQ");
    }

    #[test]
    fn debug_omits_bytes() {
        let img = XrayImage::from_bytes(jpeg()).unwrap();
        let dbg = format!("{img:?}");
        assert!(dbg.contains("len: 6"));
        assert!(!dbg.contains("255"));
    }

    #[test]
    fn request_builders_drop_empty_context() {
        let img = XrayImage::from_bytes(jpeg()).unwrap();
        let req = StudyRequest::new(img, ImageType::Limb)
            .with_patient_age(0)
            .with_clinical_indications("  ")
            .with_view("AP");
        assert!(req.patient_age.is_none());
        assert!(req.clinical_indications.is_none());
        assert_eq!(req.view.as_deref(), Some("AP"));
    }
}
