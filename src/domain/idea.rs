use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::domain::DomainError;

/// Type of content source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Text,
    Video,
    Audio,
    #[default]
    Unknown,
}

impl ContentType {
    /// Get the string tag for this content type.
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Text => "text",
            ContentType::Video => "video",
            ContentType::Audio => "audio",
            ContentType::Unknown => "unknown",
        }
    }

    /// Parse a string tag. Never fails: anything that is not an exact tag
    /// becomes `Unknown`.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "text" => ContentType::Text,
            "video" => ContentType::Video,
            "audio" => ContentType::Audio,
            _ => ContentType::Unknown,
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// Lenient on purpose: non-string tags and unrecognised strings decode to Unknown.
impl<'de> Deserialize<'de> for ContentType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(value.as_str().map(ContentType::parse).unwrap_or_default())
    }
}

// `null` reads as the empty value, the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// A content idea harvested from a text, video or audio source, together with
/// its scoring and classification metadata.
///
/// Round-trips through a plain JSON object with every field present, optional
/// fields as `null` and `source_type` as its lowercase tag. Fields missing
/// from the input, or `null` where a string or collection is expected, take
/// their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IdeaInspiration {
    /// Title or headline of the content.
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    /// Brief description or summary.
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    /// Main text: body text, subtitles or transcription.
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(deserialize_with = "null_as_default")]
    pub keywords: Vec<String>,
    pub source_type: ContentType,
    /// Source-specific metadata as string pairs (e.g. views="1000").
    #[serde(deserialize_with = "null_as_default")]
    pub metadata: BTreeMap<String, String>,
    pub source_id: Option<String>,
    pub source_url: Option<String>,
    pub source_created_by: Option<String>,
    pub source_created_at: Option<String>,
    pub score: Option<i64>,
    /// Primary category classification.
    pub category: Option<String>,
    /// Relevance scores for secondary categories, e.g. `true_crime -> 92`.
    #[serde(deserialize_with = "null_as_default")]
    pub subcategory_relevance: BTreeMap<String, i64>,
    /// Performance multipliers as percentages of base per context,
    /// e.g. `region:us -> 160`.
    #[serde(deserialize_with = "null_as_default")]
    pub contextual_category_scores: BTreeMap<String, i64>,
}

impl IdeaInspiration {
    /// Create an idea with only a title; everything else defaults.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Create an idea from an article or post.
    pub fn from_text(
        title: impl Into<String>,
        description: impl Into<String>,
        text_content: impl Into<String>,
    ) -> Self {
        Self::sourced(ContentType::Text, title, description, text_content)
    }

    /// Create an idea from a video; `subtitle_text` carries subtitles or a
    /// transcription.
    pub fn from_video(
        title: impl Into<String>,
        description: impl Into<String>,
        subtitle_text: impl Into<String>,
    ) -> Self {
        Self::sourced(ContentType::Video, title, description, subtitle_text)
    }

    /// Create an idea from audio content and its transcription.
    pub fn from_audio(
        title: impl Into<String>,
        description: impl Into<String>,
        transcription: impl Into<String>,
    ) -> Self {
        Self::sourced(ContentType::Audio, title, description, transcription)
    }

    fn sourced(
        source_type: ContentType,
        title: impl Into<String>,
        description: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            content: content.into(),
            source_type,
            ..Self::default()
        }
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_metadata(mut self, metadata: BTreeMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    pub fn with_source_url(mut self, source_url: impl Into<String>) -> Self {
        self.source_url = Some(source_url.into());
        self
    }

    pub fn with_source_created_by(mut self, created_by: impl Into<String>) -> Self {
        self.source_created_by = Some(created_by.into());
        self
    }

    pub fn with_source_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.source_created_at = Some(created_at.into());
        self
    }

    pub fn with_score(mut self, score: i64) -> Self {
        self.score = Some(score);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_subcategory_relevance(mut self, relevance: BTreeMap<String, i64>) -> Self {
        self.subcategory_relevance = relevance;
        self
    }

    pub fn with_contextual_category_scores(mut self, scores: BTreeMap<String, i64>) -> Self {
        self.contextual_category_scores = scores;
        self
    }

    /// Convert to a plain JSON object with every field present.
    pub fn to_map(&self) -> Result<Map<String, Value>, DomainError> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(DomainError::Serialization(format!(
                "expected an object, got {}",
                other
            ))),
        }
    }

    /// Build from a plain JSON object. Missing fields take their defaults and
    /// an unrecognised `source_type` becomes `Unknown`.
    pub fn from_map(map: &Map<String, Value>) -> Result<Self, DomainError> {
        Ok(serde_json::from_value(Value::Object(map.clone()))?)
    }

    pub fn to_json(&self) -> Result<String, DomainError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, DomainError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl std::fmt::Display for IdeaInspiration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let title: String = self.title.chars().take(50).collect();
        write!(
            f,
            "IdeaInspiration(title='{}...', source_type={}, keywords={} items)",
            title,
            self.source_type,
            self.keywords.len()
        )
    }
}
