//! Lookup key derivation from field names

use crate::discover::Tags;
use crate::Options;
use regex::Regex;
use std::sync::LazyLock;

static GATHER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("([^A-Z]+|[A-Z]+[^A-Z]+|[A-Z]+)").expect("gather pattern"));
static ACRONYM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("([A-Z]+)([A-Z][^A-Z]+)").expect("acronym pattern"));

/// Split a camel-cased identifier into words joined by underscores.
///
/// A word is a run of non-uppercase characters, an uppercase run followed by
/// non-uppercase characters, or a trailing uppercase run. A leading acronym
/// glued to a capitalized word is split in two, so `MyISCSIVolume` becomes
/// `My_ISCSI_Volume`. Case is preserved.
pub fn split_words(name: &str) -> String {
    let mut words = Vec::new();
    for word in GATHER.find_iter(name).map(|m| m.as_str()) {
        match ACRONYM.captures(word) {
            Some(caps) => {
                words.push(caps.get(1).map_or("", |m| m.as_str()));
                words.push(caps.get(2).map_or("", |m| m.as_str()));
            }
            None => words.push(word),
        }
    }

    if words.is_empty() {
        return name.to_string();
    }
    words.join("_")
}

/// Derive the fully qualified, upper-cased lookup key for a field.
pub(crate) fn derive_key(prefix: &str, name: &str, tags: &Tags, options: &Options) -> String {
    let mut key = if tags.split_words.unwrap_or(options.split_words) {
        split_words(name)
    } else {
        name.to_string()
    };

    if let Some(alt) = tags.alt.filter(|alt| !alt.is_empty()) {
        key = alt.to_string();
    }
    if !prefix.is_empty() {
        key = format!("{prefix}_{key}");
    }
    key.to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_acronym_then_word() {
        assert_eq!(split_words("MyISCSIVolume"), "My_ISCSI_Volume");
        assert_eq!(split_words("MyISCSIVolume").to_uppercase(), "MY_ISCSI_VOLUME");
    }

    #[test]
    fn test_split_camel_case() {
        assert_eq!(split_words("MultiWordVar"), "Multi_Word_Var");
        assert_eq!(split_words("multiWordVar"), "multi_Word_Var");
        assert_eq!(split_words("ServerURL"), "Server_URL");
        assert_eq!(split_words("ID"), "ID");
        assert_eq!(split_words("AutoSplitVar"), "Auto_Split_Var");
    }

    #[test]
    fn test_split_snake_case_is_unchanged() {
        assert_eq!(split_words("max_connections"), "max_connections");
        assert_eq!(split_words(""), "");
    }

    #[test]
    fn test_derive_key_plain() {
        let key = derive_key("", "port", &Tags::default(), &Options::default());
        assert_eq!(key, "PORT");
    }

    #[test]
    fn test_derive_key_prefix() {
        let key = derive_key("app", "port", &Tags::default(), &Options::default());
        assert_eq!(key, "APP_PORT");
    }

    #[test]
    fn test_derive_key_split_words_global() {
        let options = Options::new().split_words(true);
        let key = derive_key("APP", "MultiWordVar", &Tags::default(), &options);
        assert_eq!(key, "APP_MULTI_WORD_VAR");

        let key = derive_key("APP", "MultiWordVar", &Tags::default(), &Options::default());
        assert_eq!(key, "APP_MULTIWORDVAR");
    }

    #[test]
    fn test_derive_key_split_words_field_override() {
        let on = Tags {
            split_words: Some(true),
            ..Tags::default()
        };
        let off = Tags {
            split_words: Some(false),
            ..Tags::default()
        };
        let global = Options::new().split_words(true);

        assert_eq!(derive_key("", "AutoSplit", &on, &Options::default()), "AUTO_SPLIT");
        assert_eq!(derive_key("", "AutoSplit", &off, &global), "AUTOSPLIT");
    }

    #[test]
    fn test_derive_key_alt_overrides_name() {
        let tags = Tags {
            alt: Some("service_host"),
            split_words: Some(true),
            ..Tags::default()
        };
        assert_eq!(
            derive_key("app", "HostName", &tags, &Options::default()),
            "APP_SERVICE_HOST"
        );
    }
}
