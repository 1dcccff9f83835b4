//! Pattern matcher for embedded references
//!
//! A reference appears inside free text in one of two lexical forms:
//!
//! - **Location form**: `/` followed by the longest run of path characters
//!   (`[A-Za-z0-9_.-/]`), not preceded by a word character
//! - **Symbolic form**: exactly 32 ASCII alphanumerics, not preceded by a
//!   word character and not followed by a path character
//!
//! Each form is recognized by its own [`Scanner`]. A [`Matcher`] runs its
//! scanners left to right over the text and yields non-overlapping,
//! leftmost-first matches. Scanning resumes strictly after the end of each
//! match, so a 32-character segment inside a location is consumed by the
//! location match and never reported on its own.
//!
//! Two scanners claiming the same start offset is an [`AmbiguousMatch`].
//! The standard scanners cannot collide (one requires a leading `/`, the
//! other an alphanumeric), but custom scanner sets can.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use strata_refs_core::{is_path_byte, is_word_byte, STABLE_ID_LENGTH};
use thiserror::Error;

/// Lexical form of a reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceForm {
    /// Hierarchical path, e.g. `/site/articles/hello-world`
    Location,
    /// Stable identifier, e.g. `a1b2c3d4e5f6a1b2c3d4e5f6a1b2c3d4`
    Symbolic,
}

impl fmt::Display for ReferenceForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReferenceForm::Location => write!(f, "location"),
            ReferenceForm::Symbolic => write!(f, "symbolic"),
        }
    }
}

/// One recognized reference span (byte offsets, end exclusive)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReferenceMatch {
    /// Offset of the first byte
    pub start: usize,
    /// Offset one past the last byte
    pub end: usize,
    /// Form of the reference
    pub form: ReferenceForm,
}

impl ReferenceMatch {
    /// The matched text
    pub fn as_str<'t>(&self, text: &'t str) -> &'t str {
        &text[self.start..self.end]
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no bytes
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Two scanners claimed the same start offset
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("ambiguous reference at byte {start}: claimed as both {first} and {second}")]
pub struct AmbiguousMatch {
    /// Offset both scanners matched at
    pub start: usize,
    /// Form of the first claiming scanner
    pub first: ReferenceForm,
    /// Form of the second claiming scanner
    pub second: ReferenceForm,
}

/// Recognizer for one reference form
///
/// Scanners work on bytes. Both standard grammars are pure ASCII, so a
/// match can never start or end inside a multi-byte character.
pub trait Scanner: fmt::Debug + Send + Sync {
    /// Form this scanner recognizes
    fn form(&self) -> ReferenceForm;

    /// End offset of a reference starting exactly at `start`, if there is one
    fn match_at(&self, text: &[u8], start: usize) -> Option<usize>;
}

/// Scanner for location-form references
#[derive(Debug, Clone, Copy, Default)]
pub struct LocationScanner;

impl Scanner for LocationScanner {
    fn form(&self) -> ReferenceForm {
        ReferenceForm::Location
    }

    fn match_at(&self, text: &[u8], start: usize) -> Option<usize> {
        if text.get(start) != Some(&b'/') {
            return None;
        }
        if start > 0 && is_word_byte(text[start - 1]) {
            return None;
        }
        let run = text[start + 1..]
            .iter()
            .take_while(|b| is_path_byte(**b))
            .count();
        if run == 0 {
            None
        } else {
            Some(start + 1 + run)
        }
    }
}

/// Scanner for symbolic-form references
#[derive(Debug, Clone, Copy, Default)]
pub struct SymbolicScanner;

impl Scanner for SymbolicScanner {
    fn form(&self) -> ReferenceForm {
        ReferenceForm::Symbolic
    }

    fn match_at(&self, text: &[u8], start: usize) -> Option<usize> {
        if start > 0 && is_word_byte(text[start - 1]) {
            return None;
        }
        let run = text[start..]
            .iter()
            .take_while(|b| b.is_ascii_alphanumeric())
            .count();
        if run != STABLE_ID_LENGTH {
            return None;
        }
        let end = start + run;
        match text.get(end) {
            Some(&next) if is_path_byte(next) => None,
            _ => Some(end),
        }
    }
}

static STANDARD: Lazy<Arc<Matcher>> = Lazy::new(|| Arc::new(Matcher::default()));

/// Ordered set of scanners
#[derive(Debug)]
pub struct Matcher {
    scanners: Vec<Box<dyn Scanner>>,
}

impl Matcher {
    /// Build a matcher over a custom scanner set
    pub fn new(scanners: Vec<Box<dyn Scanner>>) -> Self {
        Matcher { scanners }
    }

    /// The shared matcher with the location and symbolic scanners
    pub fn standard() -> Arc<Matcher> {
        Arc::clone(&STANDARD)
    }

    /// Scanners in the order they are tried
    pub fn scanners(&self) -> &[Box<dyn Scanner>] {
        &self.scanners
    }

    /// Lazily find references in `text`
    ///
    /// Iteration stops after yielding the first `AmbiguousMatch`.
    ///
    /// # Examples
    ///
    /// ```
    /// use strata_refs_rewrite::{Matcher, ReferenceForm};
    ///
    /// let text = "see /site/x and a1b2c3d4e5f6a1b2c3d4e5f6a1b2c3d4 too";
    /// let found: Vec<_> = Matcher::standard()
    ///     .find_iter(text)
    ///     .map(|m| m.unwrap())
    ///     .map(|m| (m.as_str(text), m.form))
    ///     .collect();
    /// assert_eq!(
    ///     found,
    ///     vec![
    ///         ("/site/x", ReferenceForm::Location),
    ///         ("a1b2c3d4e5f6a1b2c3d4e5f6a1b2c3d4", ReferenceForm::Symbolic),
    ///     ]
    /// );
    /// ```
    pub fn find_iter<'m, 't>(&'m self, text: &'t str) -> Matches<'m, 't> {
        Matches {
            scanners: &self.scanners,
            text: text.as_bytes(),
            pos: 0,
            done: false,
        }
    }

    /// Collect every reference in `text`
    pub fn find_all(&self, text: &str) -> Result<Vec<ReferenceMatch>, AmbiguousMatch> {
        self.find_iter(text).collect()
    }

    /// Form of `candidate` if the whole string is exactly one reference
    pub fn classify(&self, candidate: &str) -> Option<ReferenceForm> {
        let mut iter = self.find_iter(candidate);
        match (iter.next(), iter.next()) {
            (Some(Ok(m)), None) if m.start == 0 && m.end == candidate.len() => Some(m.form),
            _ => None,
        }
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Matcher::new(vec![Box::new(LocationScanner), Box::new(SymbolicScanner)])
    }
}

/// Iterator over the references in one string
#[derive(Debug)]
pub struct Matches<'m, 't> {
    scanners: &'m [Box<dyn Scanner>],
    text: &'t [u8],
    pos: usize,
    done: bool,
}

impl<'m, 't> Iterator for Matches<'m, 't> {
    type Item = Result<ReferenceMatch, AmbiguousMatch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        while self.pos < self.text.len() {
            let start = self.pos;
            let mut found: Option<ReferenceMatch> = None;
            for scanner in self.scanners {
                let Some(end) = scanner.match_at(self.text, start) else {
                    continue;
                };
                if let Some(prev) = found {
                    self.done = true;
                    return Some(Err(AmbiguousMatch {
                        start,
                        first: prev.form,
                        second: scanner.form(),
                    }));
                }
                found = Some(ReferenceMatch {
                    start,
                    end,
                    form: scanner.form(),
                });
            }
            if let Some(m) = found {
                self.pos = m.end;
                return Some(Ok(m));
            }
            self.pos += 1;
        }
        self.done = true;
        None
    }
}
