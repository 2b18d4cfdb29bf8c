use thiserror::Error;

/// Failures that point at missing or broken deployment assets. Bad user data
/// never ends up here: it degrades or is rejected earlier.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("no locale resources for `{requested}` and no default `{default}` to fall back to")]
    MissingLocale { requested: String, default: String },

    #[error("template `{name}` is missing from locale `{locale}` and the default locale")]
    MissingTemplate { name: String, locale: String },

    #[error("invalid locale bundle `{locale}`: {source}")]
    InvalidBundle {
        locale: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read locale bundle {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
