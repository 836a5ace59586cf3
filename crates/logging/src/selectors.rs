//! crates/logging/src/selectors.rs
//! Debug selector parsing.

use std::collections::BTreeSet;

use serde::Serialize;

/// Selector token that enables every debug category.
pub const ALL_SELECTORS: &str = "*";

/// Debug categories enabled for the process.
///
/// Either every category is enabled (the `*` selector) or only the explicit
/// names in the set. An empty set with `all == false` opens no category, even
/// when the severity threshold is [`Severity::Debug`](crate::Severity::Debug).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct Selectors {
    all: bool,
    enabled: BTreeSet<String>,
}

impl Selectors {
    /// Selectors enabling every category.
    #[must_use]
    pub fn all() -> Self {
        Self {
            all: true,
            enabled: BTreeSet::new(),
        }
    }

    /// Builds the selector set from raw tokens.
    ///
    /// A `*` token anywhere enables every category. Otherwise each non-empty
    /// token is kept verbatim: no trimming and no case folding. Parsing never
    /// fails.
    ///
    /// # Examples
    ///
    /// ```
    /// use logging::Selectors;
    ///
    /// let selectors = Selectors::parse(["auth", "", "net", "auth"]);
    /// assert!(selectors.is_enabled("auth"));
    /// assert!(!selectors.is_enabled("publish"));
    /// assert_eq!(selectors.len(), 2);
    ///
    /// assert!(Selectors::parse(["net", "*"]).is_all());
    /// ```
    pub fn parse<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selectors = Self::default();
        for token in tokens {
            let token = token.as_ref();
            if token == ALL_SELECTORS {
                selectors.all = true;
            } else if !token.is_empty() {
                selectors.enabled.insert(token.to_owned());
            }
        }
        if selectors.all {
            selectors.enabled.clear();
        }
        selectors
    }

    /// Parses a comma-separated selector string such as `"auth,net"`.
    #[must_use]
    pub fn parse_csv(csv: &str) -> Self {
        Self::parse(csv.split(','))
    }

    /// Returns `true` when every category is enabled.
    #[must_use]
    pub const fn is_all(&self) -> bool {
        self.all
    }

    /// Returns `true` when no category is enabled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.all && self.enabled.is_empty()
    }

    /// Number of explicitly enabled categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.enabled.len()
    }

    /// Reports whether `category` is enabled.
    #[must_use]
    pub fn is_enabled(&self, category: &str) -> bool {
        self.all || self.enabled.contains(category)
    }

    /// Iterates over the explicitly enabled categories in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.enabled.iter().map(String::as_str)
    }
}

/// Splits a command-line selector string into its tokens, dropping empty
/// ones.
pub(crate) fn split_csv(csv: &str) -> Vec<String> {
    csv.split(',')
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
        .collect()
}
