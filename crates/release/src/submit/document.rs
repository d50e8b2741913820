//! The submission document as it arrives from the release form.
//!
//! Every field is optional at this level so that a missing field is reported
//! as a validation message naming it, rather than as a parse failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub build_id: Option<i64>,
    pub name: Option<String>,
    pub short_desc: Option<String>,
    pub version: Option<String>,
    pub desc: Option<Article>,
    pub change_log: Option<Article>,
    pub license: Option<LicenseInput>,
    #[serde(default)]
    pub pre_release: bool,
    pub categories: Option<CategoriesInput>,
    pub keywords: Option<Vec<String>>,
    pub spoons: Option<Vec<SpoonInput>>,
    #[serde(default)]
    pub deps: Vec<DependencyInput>,
    pub perms: Option<Vec<u32>>,
    /// Parsed one by one so a bad entry can be reported by index
    #[serde(default)]
    pub reqr: Vec<Value>,
    #[serde(default)]
    pub as_draft: bool,
    /// Icon path relative to the project directory
    pub icon_name: Option<String>,
}

/// Human-authored text: description, changelog or custom license
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    /// `md` (default) or `txt`
    #[serde(rename = "type", default = "default_article_format")]
    pub format: String,
    #[serde(default)]
    pub text: String,
}

fn default_article_format() -> String {
    "md".to_string()
}

impl Article {
    pub fn markdown(text: impl Into<String>) -> Self {
        Self {
            format: default_article_format(),
            text: text.into(),
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            format: "txt".to_string(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LicenseInput {
    /// `none`, `custom`, or a license key such as `mit`
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Custom license text, required when `kind` is `custom`
    pub val: Option<Article>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoriesInput {
    pub major: Option<u32>,
    pub minor: Option<Vec<u32>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpoonInput {
    pub api: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependencyInput {
    pub name: Option<String>,
    /// A version constraint, or a release id when `name` is the self-release marker
    pub version: Option<Value>,
    /// `hard` or `soft`
    pub softness: Option<String>,
}

impl DependencyInput {
    /// The version field as a string, whether it was sent as text or a number
    pub fn version_string(&self) -> Option<String> {
        match self.version.as_ref()? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}
