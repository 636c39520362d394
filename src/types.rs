use serde::{Deserialize, Serialize};

/// Language details reported by the oracle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Language {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, rename = "type", skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub group: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub ace_mode: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_popular: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_unpopular: bool,
}

impl Language {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            ..Default::default()
        }
    }
}

/// A single file detection as returned by the oracle
///
/// Every `Detection` handed out by this crate is an owned value. Cloning it
/// also clones the nested [`Language`], so a caller can never reach shared
/// cache state through it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Detection {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub path: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub loc: u64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub sloc: u64,
    #[serde(default, rename = "type", skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub extname: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content_type: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub disposition: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_documentation: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_large: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_generated: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_text: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_image: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_binary: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_vendored: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_high_ratio_of_long_lines: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_viewable: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub is_safe_to_colorize: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
}

impl Detection {
    /// Name of the detected language, if any
    pub fn language_name(&self) -> Option<&str> {
        self.language.as_ref().map(|l| l.name.as_str())
    }
}

/// Outcome of classifying one file
///
/// When `is_excluded` is set `detection` is always `None`. When `success` is
/// false none of the flags carry meaning and `message` explains why.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detection: Option<Detection>,
    #[serde(default)]
    pub is_binary: bool,
    #[serde(default)]
    pub is_large: bool,
    #[serde(default)]
    pub is_excluded: bool,
    #[serde(default)]
    pub from_cache: bool,
}

impl ClassificationResult {
    /// A successful result carrying a detection
    pub fn detected(detection: Detection) -> Self {
        Self {
            success: true,
            detection: Some(detection),
            ..Default::default()
        }
    }

    /// A successful result for a file that should not be processed further
    pub fn excluded(is_binary: bool, is_large: bool) -> Self {
        Self {
            success: true,
            is_binary,
            is_large,
            is_excluded: true,
            ..Default::default()
        }
    }

    /// Language name of the carried detection, if any
    pub fn language_name(&self) -> Option<&str> {
        self.detection.as_ref().and_then(Detection::language_name)
    }
}

/// Response body of the network oracle
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OracleResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default)]
    pub results: Vec<Detection>,
}

/// One item of the network oracle request array
#[derive(Debug, Clone, Serialize)]
pub struct OracleRequestItem<'a> {
    pub name: &'a str,
    pub body: std::borrow::Cow<'a, str>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

fn is_zero(value: &u64) -> bool {
    *value == 0
}
