mod assembler;
mod error;
mod format;
mod locale;
mod template;

pub use assembler::{
    AssemblerConfig, ContentAssembler, ContentSections, DEFAULT_LOCALE, ScenarioReport,
    SectionName,
};
pub use error::ContentError;
pub use format::{
    NumberStyle, ValueFormat, format_currency, format_for_key, format_percent, format_timeline,
};
pub use locale::{
    BundledLocales, DirectoryLocales, LocaleBundle, LocaleResourceProvider, locale_candidates,
    normalize_locale,
};
pub use template::{ParamValue, TemplateEngine, TemplateParameterSet, has_placeholders, populate};
