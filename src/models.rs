//! Data models that flow through one pipeline invocation.
//!
//! - [`SourceFragment`]: the bounded text one source contributed
//! - [`FragmentSet`]: every fragment collected for one sign, in source
//!   registration order
//! - [`ForecastContext`]: optional caller-supplied facts about the user

use serde::{Deserialize, Serialize};

/// Text extracted from a single source page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFragment {
    /// Human-readable source label, e.g. `"Mail.ru"`.
    pub source: String,
    /// Normalized text, never longer than the configured fragment cap.
    pub text: String,
}

/// Ordered collection of fragments keyed by source name.
///
/// Order is insertion order, and the orchestrator inserts in registration
/// order, so rendering is stable no matter which request finished first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FragmentSet {
    fragments: Vec<SourceFragment>,
}

impl FragmentSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fragment, replacing the text of an existing entry for the
    /// same source in place.
    pub fn insert(&mut self, fragment: SourceFragment) {
        match self
            .fragments
            .iter_mut()
            .find(|existing| existing.source == fragment.source)
        {
            Some(existing) => existing.text = fragment.text,
            None => self.fragments.push(fragment),
        }
    }

    pub fn get(&self, source: &str) -> Option<&str> {
        self.fragments
            .iter()
            .find(|f| f.source == source)
            .map(|f| f.text.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SourceFragment> {
        self.fragments.iter()
    }

    pub fn sources(&self) -> impl Iterator<Item = &str> {
        self.fragments.iter().map(|f| f.source.as_str())
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

impl FromIterator<SourceFragment> for FragmentSet {
    fn from_iter<I: IntoIterator<Item = SourceFragment>>(iter: I) -> Self {
        let mut set = FragmentSet::new();
        for fragment in iter {
            set.insert(fragment);
        }
        set
    }
}

/// Caller-supplied context for personalizing the AI prompt.
///
/// Mirrors the payload the web and bot layers already hold: the user's
/// numerology matrix. Only the first of the `additional` numbers is used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastContext {
    #[serde(default)]
    pub matrix: Option<MatrixContext>,
}

/// The subset of the numerology matrix the forecast cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixContext {
    #[serde(default)]
    pub additional: Vec<i64>,
}

impl ForecastContext {
    /// Context carrying a single "first number of fate".
    pub fn with_fate_number(number: i64) -> Self {
        Self {
            matrix: Some(MatrixContext {
                additional: vec![number],
            }),
        }
    }

    pub fn first_fate_number(&self) -> Option<i64> {
        self.matrix.as_ref()?.additional.first().copied()
    }
}
