//! Feature flags and the string-keyed settings bag that resolves them.

use thiserror::Error;

use super::Reader;
use crate::value::{Map, Value};

/// Flags gating the reader's permissive behavior.
///
/// The default configuration is permissive mode: comments are accepted and
/// retained, any value may be the root, and duplicate keys are resolved
/// last-writer-wins. [`Features::strict`] flips every leniency off.
#[derive(Debug, Clone, Copy)]
#[allow(clippy::struct_excessive_bools)]
pub struct Features {
    /// Whether to accept `//` and `/* */` comments.
    ///
    /// # Default
    ///
    /// `true`
    pub allow_comments: bool,

    /// Whether to retain comments as annotations on the values they
    /// accompany. Forced off when `allow_comments` is off.
    ///
    /// # Default
    ///
    /// `true`
    pub collect_comments: bool,

    /// Whether the root value must be an array or an object.
    ///
    /// # Default
    ///
    /// `false`
    pub strict_root: bool,

    /// Whether an absent value between array delimiters (`[1,,3]`) reads as
    /// null.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_dropped_null_placeholders: bool,

    /// Whether bare numbers are accepted as object member names, keyed by
    /// their canonical string form.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_numeric_keys: bool,

    /// Whether `'...'` is accepted as a string literal.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_single_quotes: bool,

    /// Maximum logical recursion depth before the parse aborts with
    /// [`FatalError::StackLimitExceeded`].
    ///
    /// # Default
    ///
    /// `1000`
    ///
    /// [`FatalError::StackLimitExceeded`]: super::error::FatalError::StackLimitExceeded
    pub stack_limit: usize,

    /// Whether non-whitespace after the root value fails the parse.
    ///
    /// # Default
    ///
    /// `false`
    pub fail_if_extra: bool,

    /// Whether a repeated object key is an error instead of a replacement.
    ///
    /// # Default
    ///
    /// `false`
    pub reject_dup_keys: bool,

    /// Whether `NaN`, `Infinity`, and `-Infinity` are accepted as numbers.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_special_floats: bool,
}

impl Default for Features {
    fn default() -> Self {
        Self {
            allow_comments: true,
            collect_comments: true,
            strict_root: false,
            allow_dropped_null_placeholders: false,
            allow_numeric_keys: false,
            allow_single_quotes: false,
            stack_limit: 1000,
            fail_if_extra: false,
            reject_dup_keys: false,
            allow_special_floats: false,
        }
    }
}

impl Features {
    /// The strict preset: comments off, strict root, duplicate keys and
    /// trailing input rejected, no syntax extensions.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            allow_comments: false,
            collect_comments: true,
            strict_root: true,
            allow_dropped_null_placeholders: false,
            allow_numeric_keys: false,
            allow_single_quotes: false,
            stack_limit: 1000,
            fail_if_extra: true,
            reject_dup_keys: true,
            allow_special_floats: false,
        }
    }
}

/// The ten recognized settings keys, matched case-sensitively.
const SETTING_KEYS: [&str; 10] = [
    "collectComments",
    "allowComments",
    "strictRoot",
    "allowDroppedNullPlaceholders",
    "allowNumericKeys",
    "allowSingleQuotes",
    "stackLimit",
    "failIfExtra",
    "rejectDupKeys",
    "allowSpecialFloats",
];

/// Settings keys outside the recognized set, reported by
/// [`ReaderBuilder::validate`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized reader settings: {keys:?}")]
pub struct InvalidSettings {
    pub keys: Vec<String>,
}

/// String-keyed configuration bag resolving to [`Features`].
///
/// # Examples
///
/// ```
/// use jsonlax::{ReaderBuilder, Value};
///
/// let mut builder = ReaderBuilder::new();
/// builder.set("rejectDupKeys", true);
/// builder.validate().unwrap();
/// let mut reader = builder.build();
/// let mut root = Value::default();
/// assert!(!reader.parse(br#"{"k":1,"k":2}"#, &mut root).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct ReaderBuilder {
    settings: Map,
}

impl Default for ReaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReaderBuilder {
    /// A builder populated with the permissive defaults.
    #[must_use]
    pub fn new() -> Self {
        let mut settings = Map::new();
        settings.insert("collectComments".to_owned(), Value::from(true));
        settings.insert("allowComments".to_owned(), Value::from(true));
        settings.insert("strictRoot".to_owned(), Value::from(false));
        settings.insert(
            "allowDroppedNullPlaceholders".to_owned(),
            Value::from(false),
        );
        settings.insert("allowNumericKeys".to_owned(), Value::from(false));
        settings.insert("allowSingleQuotes".to_owned(), Value::from(false));
        settings.insert("stackLimit".to_owned(), Value::from(1000i64));
        settings.insert("failIfExtra".to_owned(), Value::from(false));
        settings.insert("rejectDupKeys".to_owned(), Value::from(false));
        settings.insert("allowSpecialFloats".to_owned(), Value::from(false));
        Self { settings }
    }

    /// A builder populated with the strict preset.
    #[must_use]
    pub fn strict() -> Self {
        let mut builder = Self::new();
        builder.set("allowComments", false);
        builder.set("strictRoot", true);
        builder.set("allowDroppedNullPlaceholders", false);
        builder.set("allowNumericKeys", false);
        builder.set("allowSingleQuotes", false);
        builder.set("stackLimit", 1000i64);
        builder.set("failIfExtra", true);
        builder.set("rejectDupKeys", true);
        builder.set("allowSpecialFloats", false);
        builder
    }

    /// Sets a settings key. Unknown keys are stored as-is and surface from
    /// [`validate`](Self::validate).
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Returns the current value of a settings key.
    #[must_use]
    pub fn setting(&self, key: &str) -> Option<&Value> {
        self.settings.get(key)
    }

    /// Reports every key outside the recognized set. Values are not
    /// validated.
    pub fn validate(&self) -> Result<(), InvalidSettings> {
        let keys: Vec<String> = self
            .settings
            .keys()
            .filter(|key| !SETTING_KEYS.contains(&key.as_str()))
            .cloned()
            .collect();
        if keys.is_empty() {
            Ok(())
        } else {
            Err(InvalidSettings { keys })
        }
    }

    /// Resolves the settings into a typed [`Features`]. Missing or
    /// mistyped entries fall back to their defaults.
    #[must_use]
    pub fn features(&self) -> Features {
        let flag = |key: &str, default: bool| {
            self.settings.get(key).and_then(Value::as_bool).unwrap_or(default)
        };
        Features {
            collect_comments: flag("collectComments", true),
            allow_comments: flag("allowComments", true),
            strict_root: flag("strictRoot", false),
            allow_dropped_null_placeholders: flag("allowDroppedNullPlaceholders", false),
            allow_numeric_keys: flag("allowNumericKeys", false),
            allow_single_quotes: flag("allowSingleQuotes", false),
            stack_limit: self
                .settings
                .get("stackLimit")
                .and_then(Value::as_i64)
                .map_or(1000, |limit| limit.max(0) as usize),
            fail_if_extra: flag("failIfExtra", false),
            reject_dup_keys: flag("rejectDupKeys", false),
            allow_special_floats: flag("allowSpecialFloats", false),
        }
    }

    /// Builds a [`Reader`] from the resolved features.
    #[must_use]
    pub fn build(&self) -> Reader {
        Reader::new(self.features())
    }
}

#[cfg(test)]
mod tests {
    use super::{Features, ReaderBuilder};

    #[test]
    fn defaults_are_permissive() {
        let features = Features::default();
        assert!(features.allow_comments);
        assert!(features.collect_comments);
        assert!(!features.strict_root);
        assert!(!features.reject_dup_keys);
        assert!(!features.fail_if_extra);
        assert_eq!(features.stack_limit, 1000);
    }

    #[test]
    fn strict_preset() {
        let features = Features::strict();
        assert!(!features.allow_comments);
        assert!(features.strict_root);
        assert!(features.fail_if_extra);
        assert!(features.reject_dup_keys);
        assert!(!features.allow_special_floats);
        assert_eq!(features.stack_limit, 1000);
    }

    #[test]
    fn builder_resolves_settings() {
        let mut builder = ReaderBuilder::new();
        builder.set("allowSingleQuotes", true);
        builder.set("stackLimit", 12i64);
        let features = builder.features();
        assert!(features.allow_single_quotes);
        assert_eq!(features.stack_limit, 12);
    }

    #[test]
    fn builder_strict_matches_typed_preset() {
        let strict = ReaderBuilder::strict().features();
        assert!(!strict.allow_comments);
        assert!(strict.strict_root);
        assert!(strict.fail_if_extra);
        assert!(strict.reject_dup_keys);
    }

    #[test]
    fn validate_flags_unknown_keys() {
        let mut builder = ReaderBuilder::new();
        builder.set("allowComments", false);
        assert!(builder.validate().is_ok());
        builder.set("allowGarbage", true);
        builder.set("zzz", 1i64);
        let err = builder.validate().unwrap_err();
        assert_eq!(err.keys, vec!["allowGarbage".to_owned(), "zzz".to_owned()]);
        assert!(err.to_string().contains("allowGarbage"));
    }

    #[test]
    fn negative_stack_limit_clamps_to_zero() {
        let mut builder = ReaderBuilder::new();
        builder.set("stackLimit", -5i64);
        assert_eq!(builder.features().stack_limit, 0);
    }
}
