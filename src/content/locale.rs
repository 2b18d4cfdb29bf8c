use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use serde::Deserialize;
use tracing::debug;

use crate::core::GoalTag;

use super::error::ContentError;
use super::format::NumberStyle;

const EMBEDDED: &[(&str, &str)] = &[
    ("en", include_str!("../../locales/en.json")),
    ("es", include_str!("../../locales/es.json")),
    ("pl", include_str!("../../locales/pl.json")),
];

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LocaleBundle {
    pub format: NumberStyle,
    pub goals: HashMap<String, String>,
    pub terms: HashMap<String, String>,
    pub templates: HashMap<String, String>,
}

impl LocaleBundle {
    pub fn from_json(locale: &str, json: &str) -> Result<Self, ContentError> {
        serde_json::from_str(json).map_err(|source| ContentError::InvalidBundle {
            locale: locale.to_string(),
            source,
        })
    }

    pub fn goal_label(&self, goal: GoalTag) -> Option<&str> {
        non_empty(self.goals.get(goal.as_str()))
    }

    pub fn template(&self, name: &str) -> Option<&str> {
        non_empty(self.templates.get(name))
    }

    pub fn term(&self, term: &str) -> Option<&str> {
        non_empty(self.terms.get(term))
    }
}

fn non_empty(value: Option<&String>) -> Option<&str> {
    value.map(String::as_str).filter(|s| !s.trim().is_empty())
}

pub trait LocaleResourceProvider {
    /// The resource set for `locale`, or `None` when that locale is not
    /// deployed. Errors mean a deployed resource could not be read.
    fn bundle(&self, locale: &str) -> Result<Option<Arc<LocaleBundle>>, ContentError>;

    fn goal_label(&self, locale: &str, goal: GoalTag) -> Result<Option<String>, ContentError> {
        Ok(self
            .bundle(locale)?
            .and_then(|b| b.goal_label(goal).map(str::to_string)))
    }

    fn template(&self, locale: &str, name: &str) -> Result<Option<String>, ContentError> {
        Ok(self
            .bundle(locale)?
            .and_then(|b| b.template(name).map(str::to_string)))
    }
}

impl<T: LocaleResourceProvider + ?Sized> LocaleResourceProvider for Arc<T> {
    fn bundle(&self, locale: &str) -> Result<Option<Arc<LocaleBundle>>, ContentError> {
        (**self).bundle(locale)
    }
}

impl<T: LocaleResourceProvider + ?Sized> LocaleResourceProvider for &T {
    fn bundle(&self, locale: &str) -> Result<Option<Arc<LocaleBundle>>, ContentError> {
        (**self).bundle(locale)
    }
}

pub fn normalize_locale(locale: &str) -> String {
    locale.trim().replace('_', "-").to_ascii_lowercase()
}

pub fn locale_candidates(locale: &str) -> Vec<String> {
    let normalized = normalize_locale(locale);
    let mut candidates = vec![normalized.clone()];
    if let Some((primary, _)) = normalized.split_once('-') {
        if !primary.is_empty() {
            candidates.push(primary.to_string());
        }
    }
    candidates
}

#[derive(Debug, Clone, Default)]
pub struct BundledLocales {
    bundles: HashMap<String, Arc<LocaleBundle>>,
}

impl BundledLocales {
    pub fn embedded() -> Result<Self, ContentError> {
        let mut locales = Self::default();
        for (locale, json) in EMBEDDED {
            locales.insert(locale, LocaleBundle::from_json(locale, json)?);
        }
        Ok(locales)
    }

    pub fn insert(&mut self, locale: &str, bundle: LocaleBundle) {
        self.bundles
            .insert(normalize_locale(locale), Arc::new(bundle));
    }

    pub fn locales(&self) -> Vec<&str> {
        let mut locales: Vec<&str> = self.bundles.keys().map(String::as_str).collect();
        locales.sort_unstable();
        locales
    }
}

impl LocaleResourceProvider for BundledLocales {
    fn bundle(&self, locale: &str) -> Result<Option<Arc<LocaleBundle>>, ContentError> {
        Ok(self.bundles.get(&normalize_locale(locale)).cloned())
    }
}

/// Reads `<dir>/<locale>.json` on first use and keeps the parsed bundle.
/// Nothing is ever evicted; restart the process to pick up new files.
#[derive(Debug)]
pub struct DirectoryLocales {
    dir: PathBuf,
    cache: RwLock<HashMap<String, Option<Arc<LocaleBundle>>>>,
}

impl DirectoryLocales {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: RwLock::new(HashMap::new()),
        }
    }

    fn load(&self, locale: &str) -> Result<Option<Arc<LocaleBundle>>, ContentError> {
        let path = self.dir.join(format!("{locale}.json"));
        if !path.is_file() {
            return Ok(None);
        }
        let json = fs::read_to_string(&path).map_err(|source| ContentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        debug!(locale, path = %path.display(), "loaded locale bundle");
        LocaleBundle::from_json(locale, &json).map(|b| Some(Arc::new(b)))
    }
}

fn is_safe_locale_code(locale: &str) -> bool {
    !locale.is_empty()
        && locale
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-')
}

impl LocaleResourceProvider for DirectoryLocales {
    fn bundle(&self, locale: &str) -> Result<Option<Arc<LocaleBundle>>, ContentError> {
        let locale = normalize_locale(locale);
        if !is_safe_locale_code(&locale) {
            return Ok(None);
        }

        if let Ok(cache) = self.cache.read() {
            if let Some(hit) = cache.get(&locale) {
                return Ok(hit.clone());
            }
        }

        let loaded = self.load(&locale)?;
        if let Ok(mut cache) = self.cache.write() {
            cache.entry(locale).or_insert_with(|| loaded.clone());
        }
        Ok(loaded)
    }
}
