//! HTTP client for the page suggestion service.
//!
//! One POST per request carrying the page as a base64 PNG. Responses are parsed into
//! [`CropMargins`] or a list of [`DetectedMask`] descriptors with every number clamped
//! to 0-100.

use std::io::Cursor;
use std::time::Duration;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::{ImageFormat, RgbaImage};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::config::DetectorSettings;
use crate::error::DetectorError;
use crate::masks::CropMargins;

use super::DetectionKind;

/// A mask suggested by the service, in page percent
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DetectedMask {
    #[serde(default)]
    pub x: f32,
    #[serde(default)]
    pub y: f32,
    #[serde(default)]
    pub width: f32,
    #[serde(default)]
    pub height: f32,
    #[serde(default)]
    pub color: Option<String>,
}

/// A source of margin and mask suggestions for a rendered page.
pub trait Detector: Send + Sync {
    fn suggest_margins(&self, page: &RgbaImage) -> Result<CropMargins, DetectorError>;
    fn suggest_masks(&self, page: &RgbaImage) -> Result<Vec<DetectedMask>, DetectorError>;
}

pub struct HttpDetector {
    agent: ureq::Agent,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpDetector {
    pub fn from_settings(settings: &DetectorSettings) -> Result<Self, DetectorError> {
        if !settings.is_configured() {
            return Err(DetectorError::NotConfigured);
        }
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
            .build();
        Ok(Self {
            agent,
            endpoint: settings.endpoint.trim().to_string(),
            api_key: settings.effective_key(),
        })
    }

    fn post(&self, kind: DetectionKind, page: &RgbaImage) -> Result<Value, DetectorError> {
        let body = request_body(kind, &encode_png(page)?);

        let mut request = self
            .agent
            .post(&self.endpoint)
            .set("User-Agent", "slidemask-detector");
        if let Some(key) = &self.api_key {
            request = request.set("Authorization", &format!("Bearer {}", key));
        }

        match request.send_json(body) {
            Ok(response) => response
                .into_json::<Value>()
                .map_err(DetectorError::InvalidResponse),
            Err(ureq::Error::Status(status, _)) => Err(DetectorError::Status { status }),
            Err(ureq::Error::Transport(transport)) => {
                if is_timeout(&transport) {
                    Err(DetectorError::Timeout)
                } else {
                    Err(DetectorError::Transport {
                        message: transport.to_string(),
                    })
                }
            }
        }
    }
}

impl Detector for HttpDetector {
    fn suggest_margins(&self, page: &RgbaImage) -> Result<CropMargins, DetectorError> {
        parse_margins_response(&self.post(DetectionKind::Margins, page)?)
    }

    fn suggest_masks(&self, page: &RgbaImage) -> Result<Vec<DetectedMask>, DetectorError> {
        parse_masks_response(&self.post(DetectionKind::Masks, page)?)
    }
}

fn is_timeout(transport: &ureq::Transport) -> bool {
    let mut source = std::error::Error::source(transport);
    while let Some(err) = source {
        if let Some(io) = err.downcast_ref::<std::io::Error>()
            && matches!(
                io.kind(),
                std::io::ErrorKind::TimedOut | std::io::ErrorKind::WouldBlock
            )
        {
            return true;
        }
        source = err.source();
    }
    transport.to_string().contains("timed out")
}

/// PNG-encode a page raster as base64
pub fn encode_png(page: &RgbaImage) -> Result<String, DetectorError> {
    let mut png = Cursor::new(Vec::new());
    page.write_to(&mut png, ImageFormat::Png)
        .map_err(DetectorError::Encode)?;
    Ok(BASE64.encode(png.into_inner()))
}

pub fn request_body(kind: DetectionKind, png_base64: &str) -> Value {
    json!({
        "task": kind.task_name(),
        "image": {
            "mime_type": "image/png",
            "data": png_base64,
        }
    })
}

fn invalid(message: &str) -> DetectorError {
    DetectorError::InvalidResponse(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        message.to_string(),
    ))
}

/// Clamp a percentage from the wire; non-finite values become 0
pub fn clamp_percent(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

pub fn parse_margins_response(value: &Value) -> Result<CropMargins, DetectorError> {
    let object = value
        .as_object()
        .ok_or_else(|| invalid("margins response is not an object"))?;
    let edge = |name: &str| {
        object
            .get(name)
            .and_then(Value::as_f64)
            .map(|v| clamp_percent(v as f32))
            .unwrap_or(0.0)
    };
    Ok(CropMargins::clamped(
        edge("top"),
        edge("bottom"),
        edge("left"),
        edge("right"),
    ))
}

pub fn parse_masks_response(value: &Value) -> Result<Vec<DetectedMask>, DetectorError> {
    let list = match value {
        Value::Array(items) => items,
        Value::Object(object) => match object.get("masks") {
            Some(Value::Array(items)) => items,
            Some(Value::Null) | None => return Ok(Vec::new()),
            Some(_) => return Err(invalid("\"masks\" is not an array")),
        },
        _ => return Err(invalid("masks response is neither a list nor an object")),
    };

    Ok(list
        .iter()
        .filter_map(|item| serde_json::from_value::<DetectedMask>(item.clone()).ok())
        .map(|mask| DetectedMask {
            x: clamp_percent(mask.x),
            y: clamp_percent(mask.y),
            width: clamp_percent(mask.width),
            height: clamp_percent(mask.height),
            color: mask.color,
        })
        .collect())
}
