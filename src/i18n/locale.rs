// SPDX-License-Identifier: MPL-2.0
//! The closed set of languages the front-end ships.

use std::fmt;
use std::str::FromStr;
use unic_langid::LanguageIdentifier;

/// A supported display language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub enum Locale {
    #[default]
    En,
    Hi,
    Kn,
    /// Tulu, written in Kannada script.
    Tu,
}

/// Returned when a tag does not name a supported language.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale: {0:?}")]
pub struct UnsupportedLocale(pub String);

impl Locale {
    /// Every supported locale, in language-picker order.
    pub const ALL: [Locale; 4] = [Locale::En, Locale::Hi, Locale::Kn, Locale::Tu];

    /// The fallback locale consulted when the active table misses a key.
    pub const DEFAULT: Locale = Locale::En;

    /// Short code used in asset file names and persisted settings.
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Hi => "hi",
            Locale::Kn => "kn",
            Locale::Tu => "tu",
        }
    }

    /// Name of the language written in that language, for pickers.
    pub fn native_name(self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Hi => "हिन्दी",
            Locale::Kn => "ಕನ್ನಡ",
            Locale::Tu => "ತುಳು",
        }
    }

    /// Language identifier handed to Fluent for plural and number rules.
    pub fn langid(self) -> LanguageIdentifier {
        match self {
            Locale::En => unic_langid::langid!("en"),
            Locale::Hi => unic_langid::langid!("hi"),
            Locale::Kn => unic_langid::langid!("kn"),
            // `tu` is not a registered subtag; Fluent gets the ISO 639-3 code
            Locale::Tu => unic_langid::langid!("tcy"),
        }
    }

    /// Maps a parsed language identifier onto a supported locale.
    ///
    /// Only the primary language subtag is considered, so `hi-IN` and
    /// `kn-Knda-IN` resolve like `hi` and `kn`.
    pub fn from_langid(langid: &LanguageIdentifier) -> Option<Locale> {
        match langid.language.as_str() {
            "en" => Some(Locale::En),
            "hi" => Some(Locale::Hi),
            "kn" => Some(Locale::Kn),
            "tu" | "tcy" => Some(Locale::Tu),
            _ => None,
        }
    }
}

impl FromStr for Locale {
    type Err = UnsupportedLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().replace('_', "-");
        // POSIX locales carry an encoding suffix (`hi_IN.UTF-8`)
        let tag = tag.split('.').next().unwrap_or_default();
        tag.parse::<LanguageIdentifier>()
            .ok()
            .as_ref()
            .and_then(Locale::from_langid)
            .ok_or_else(|| UnsupportedLocale(s.to_string()))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_from_str() {
        for locale in Locale::ALL {
            assert_eq!(locale.code().parse::<Locale>(), Ok(locale));
        }
    }

    #[test]
    fn region_and_case_variants_are_accepted() {
        assert_eq!("hi-IN".parse(), Ok(Locale::Hi));
        assert_eq!("KN".parse(), Ok(Locale::Kn));
        assert_eq!("en_US".parse(), Ok(Locale::En));
        assert_eq!("hi_IN.UTF-8".parse(), Ok(Locale::Hi));
        assert_eq!(" tu ".parse(), Ok(Locale::Tu));
    }

    #[test]
    fn iso_639_3_tulu_code_maps_to_tu() {
        assert_eq!("tcy".parse(), Ok(Locale::Tu));
        assert_eq!("tcy-IN".parse(), Ok(Locale::Tu));
    }

    #[test]
    fn unsupported_tags_are_rejected() {
        for tag in ["fr", "", "not a tag", "ta-IN"] {
            assert!(tag.parse::<Locale>().is_err(), "{tag:?} should be rejected");
        }
    }

    #[test]
    fn default_locale_is_english() {
        assert_eq!(Locale::default(), Locale::En);
        assert_eq!(Locale::DEFAULT, Locale::En);
        assert_eq!(Locale::DEFAULT.code(), crate::config::DEFAULT_LOCALE);
    }

    #[test]
    fn langid_maps_back_to_the_same_locale() {
        for locale in Locale::ALL {
            assert_eq!(Locale::from_langid(&locale.langid()), Some(locale));
        }
    }

    #[test]
    fn unsupported_locale_message_quotes_the_input() {
        let err = "fr-FR".parse::<Locale>().unwrap_err();
        assert_eq!(err, UnsupportedLocale("fr-FR".to_string()));
        assert_eq!(err.to_string(), "unsupported locale: \"fr-FR\"");
    }

    #[test]
    fn display_uses_short_code() {
        assert_eq!(Locale::Kn.to_string(), "kn");
    }
}
