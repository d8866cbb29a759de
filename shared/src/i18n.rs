//! Bilingual message table
//!
//! Every human-readable message the engine produces is looked up here by
//! key. Placeholders use `{name}` and are filled by [`render`].

use crate::types::{Language, LocalizedText};

/// Keys of all user-facing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKey {
    MalformedRequest,
    MissingField,
    InvalidField,
    AreaNotNumeric,
    AreaNotPositive,
    AreaOutOfRange,
    AreaTooSmall,
    UnknownUnit,
    UnsupportedConversion,
    NoRecommendation,
    DoseOutOfRange,
}

impl MessageKey {
    pub fn text(&self) -> LocalizedText {
        match self {
            MessageKey::MalformedRequest => LocalizedText::new(
                "Malformed request: expected a JSON object",
                "अमान्य अनुरोध: JSON ऑब्जेक्ट अपेक्षित है",
            ),
            MessageKey::MissingField => LocalizedText::new(
                "Missing required field: {field}",
                "आवश्यक फ़ील्ड अनुपलब्ध है: {field}",
            ),
            MessageKey::InvalidField => LocalizedText::new(
                "Invalid value for {field}",
                "{field} के लिए अमान्य मान",
            ),
            MessageKey::AreaNotNumeric => LocalizedText::new(
                "Area must be a number",
                "क्षेत्रफल एक संख्या होनी चाहिए",
            ),
            MessageKey::AreaNotPositive => LocalizedText::new(
                "Area must be a positive number",
                "क्षेत्रफल एक धनात्मक संख्या होनी चाहिए",
            ),
            MessageKey::AreaOutOfRange => LocalizedText::new(
                "Area is too large",
                "क्षेत्रफल बहुत बड़ा है",
            ),
            MessageKey::AreaTooSmall => LocalizedText::new(
                "Area is too small to calculate a dose",
                "खुराक की गणना के लिए क्षेत्रफल बहुत छोटा है",
            ),
            MessageKey::UnknownUnit => LocalizedText::new(
                "Unsupported unit for {field}: {value}",
                "{field} के लिए असमर्थित इकाई: {value}",
            ),
            MessageKey::UnsupportedConversion => LocalizedText::new(
                "Unsupported unit conversion from {from} to {to}",
                "{from} से {to} में इकाई रूपांतरण समर्थित नहीं है",
            ),
            MessageKey::NoRecommendation => LocalizedText::new(
                "No recommendation found for {crop} and {pest_disease}",
                "{crop} और {pest_disease} के लिए कोई सिफारिश नहीं मिली",
            ),
            MessageKey::DoseOutOfRange => LocalizedText::new(
                "Calculated dose is out of range",
                "गणना की गई खुराक सीमा से बाहर है",
            ),
        }
    }
}

/// Render a message in the requested language, substituting `{name}` placeholders
pub fn render(key: MessageKey, language: Language, args: &[(&str, &str)]) -> String {
    args.iter().fold(key.text().get(language).to_string(), |text, (name, value)| {
        text.replace(&format!("{{{}}}", name), value)
    })
}
