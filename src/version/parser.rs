//! Version string parsing
//!
//! Turns arbitrary version text into a [`ParsedVersion`] with a total order:
//! - numeric release segments compare as integers, missing segments count as zero
//! - release markers rank `dev < a < b < rc < (final) < post`
//! - numbers too large for `u64` still compare numerically, by digit count first
//! - text that does not start with a number degrades to a lexical key
//! - the empty string is a sentinel lower than every other version
//!
//! Grammar, applied after trimming, lowercasing and dropping a leading `v`:
//!
//! ```text
//! version := release [marker [number]] tail*
//! release := number+
//! marker  := dev | a | alpha | b | beta | c | rc | pre | preview | post | rev | r
//! tail    := number | word
//! ```
//!
//! Tokens are runs of ASCII digits or ASCII letters; every other character
//! separates tokens, so `1.0a1`, `1.0-a-1` and `1_0_a1` parse to the same value.

use serde::{Serialize, Serializer};
use std::cmp::Ordering;
use std::convert::Infallible;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// One component of a release, marker number or tail
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Numeric component, compared as an integer
    Number(u64),
    /// Digits too large for `u64`, leading zeros stripped
    Wide(String),
    /// Textual component, compared lexically (already lowercased)
    Text(String),
}

impl Segment {
    /// Numeric segment from a run of ASCII digits
    fn digits(token: &str) -> Self {
        match token.parse() {
            Ok(n) => Segment::Number(n),
            Err(_) => Segment::Wide(token.trim_start_matches('0').to_string()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Segment::Text(_) => 0,
            Segment::Number(_) => 1,
            Segment::Wide(_) => 2,
        }
    }
}

impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Segment::Number(a), Segment::Number(b)) => a.cmp(b),
            // no leading zeros, so longer means larger
            (Segment::Wide(a), Segment::Wide(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (Segment::Text(a), Segment::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Number(n) => write!(f, "{}", n),
            Segment::Wide(d) | Segment::Text(d) => write!(f, "{}", d),
        }
    }
}

/// Release phase, declared in precedence order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerKind {
    /// Development build (`dev`)
    Dev,
    /// Alpha pre-release (`a`, `alpha`)
    Alpha,
    /// Beta pre-release (`b`, `beta`)
    Beta,
    /// Release candidate (`rc`, `c`, `pre`, `preview`)
    Rc,
    /// No marker
    Final,
    /// Post-release (`post`, `rev`, `r`)
    Post,
}

impl MarkerKind {
    /// Recognise a marker word (input must be lowercase)
    pub fn from_word(word: &str) -> Option<Self> {
        match word {
            "dev" => Some(MarkerKind::Dev),
            "a" | "alpha" => Some(MarkerKind::Alpha),
            "b" | "beta" => Some(MarkerKind::Beta),
            "c" | "rc" | "pre" | "preview" => Some(MarkerKind::Rc),
            "post" | "rev" | "r" => Some(MarkerKind::Post),
            _ => None,
        }
    }

    /// Canonical spelling used in normalized output
    pub fn label(&self) -> &'static str {
        match self {
            MarkerKind::Dev => "dev",
            MarkerKind::Alpha => "a",
            MarkerKind::Beta => "b",
            MarkerKind::Rc => "rc",
            MarkerKind::Final => "",
            MarkerKind::Post => "post",
        }
    }

    /// dev, alpha, beta and rc are pre-releases
    pub fn is_prerelease(&self) -> bool {
        *self < MarkerKind::Final
    }
}

/// Marker kind plus its trailing number (`rc2` → `Rc`, 2)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Marker {
    pub kind: MarkerKind,
    pub number: Segment,
}

impl Marker {
    /// The implicit marker of a final release
    pub const FINAL: Marker = Marker {
        kind: MarkerKind::Final,
        number: Segment::Number(0),
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form {
    Sentinel,
    Lexical,
    Release,
}

/// A normalized, totally ordered version
///
/// Equality and hashing use the normalized value only; the raw string is
/// kept for display.
#[derive(Debug, Clone)]
pub struct ParsedVersion {
    release: Vec<Segment>,
    marker: Marker,
    tail: Vec<Segment>,
    form: Form,
    raw: String,
}

impl ParsedVersion {
    /// Parse any text into a version. Never fails.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::sentinel();
        }

        let lowered = trimmed.to_ascii_lowercase();
        let body = match lowered.strip_prefix('v') {
            Some(rest) if rest.starts_with(|c: char| c.is_ascii_digit()) => rest,
            _ => lowered.as_str(),
        };

        match parse_tokens(&tokenize(body)) {
            Some((release, marker, tail)) => Self {
                release,
                marker,
                tail,
                form: Form::Release,
                raw: trimmed.to_string(),
            },
            None => Self {
                release: vec![Segment::Text(lowered.clone())],
                marker: Marker::FINAL,
                tail: Vec::new(),
                form: Form::Lexical,
                raw: trimmed.to_string(),
            },
        }
    }

    /// The lowest possible version, produced by empty input
    pub fn sentinel() -> Self {
        Self {
            release: Vec::new(),
            marker: Marker::FINAL,
            tail: Vec::new(),
            form: Form::Sentinel,
            raw: String::new(),
        }
    }

    /// The original text, trimmed
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn release(&self) -> &[Segment] {
        &self.release
    }

    pub fn marker(&self) -> &Marker {
        &self.marker
    }

    pub fn tail(&self) -> &[Segment] {
        &self.tail
    }

    /// True for the empty-input sentinel
    pub fn is_sentinel(&self) -> bool {
        self.form == Form::Sentinel
    }

    /// True when the input did not follow the grammar and is ordered lexically
    pub fn is_lexical(&self) -> bool {
        self.form == Form::Lexical
    }

    pub fn is_prerelease(&self) -> bool {
        self.marker.kind.is_prerelease()
    }

    pub fn is_postrelease(&self) -> bool {
        self.marker.kind == MarkerKind::Post
    }

    /// Release segments joined by dots, without marker or tail
    pub fn base_version(&self) -> String {
        join_segments(&self.release)
    }

    /// Canonical rendering of the normalized value (e.g. `1.0rc1`, `2.1.post3`)
    pub fn normalized(&self) -> String {
        let mut out = self.base_version();
        match self.marker.kind {
            MarkerKind::Final => {}
            MarkerKind::Alpha | MarkerKind::Beta | MarkerKind::Rc => {
                out.push_str(self.marker.kind.label());
                out.push_str(&self.marker.number.to_string());
            }
            MarkerKind::Dev | MarkerKind::Post => {
                out.push('.');
                out.push_str(self.marker.kind.label());
                out.push_str(&self.marker.number.to_string());
            }
        }
        if !self.tail.is_empty() {
            out.push('.');
            out.push_str(&join_segments(&self.tail));
        }
        out
    }

    /// Release segments with trailing zeros removed, the identity used for hashing
    fn significant_release(&self) -> &[Segment] {
        let zero = Segment::Number(0);
        let end = self
            .release
            .iter()
            .rposition(|s| *s != zero)
            .map_or(0, |i| i + 1);
        &self.release[..end]
    }
}

/// Split into runs of ASCII digits or ASCII letters
fn tokenize(s: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start: Option<usize> = None;
    let mut digits = false;

    for (i, c) in s.char_indices() {
        let class = if c.is_ascii_digit() {
            Some(true)
        } else if c.is_ascii_alphabetic() {
            Some(false)
        } else {
            None
        };

        match (start, class) {
            (Some(st), Some(is_digit)) if is_digit != digits => {
                tokens.push(&s[st..i]);
                start = Some(i);
                digits = is_digit;
            }
            (Some(_), Some(_)) => {}
            (Some(st), None) => {
                tokens.push(&s[st..i]);
                start = None;
            }
            (None, Some(is_digit)) => {
                start = Some(i);
                digits = is_digit;
            }
            (None, None) => {}
        }
    }
    if let Some(st) = start {
        tokens.push(&s[st..]);
    }
    tokens
}

fn is_numeric(token: &str) -> bool {
    token.bytes().all(|b| b.is_ascii_digit())
}

fn segment(token: &str) -> Segment {
    if is_numeric(token) {
        Segment::digits(token)
    } else {
        Segment::Text(token.to_string())
    }
}

type Parts = (Vec<Segment>, Marker, Vec<Segment>);

/// Returns `None` when the tokens do not follow the grammar
fn parse_tokens(tokens: &[&str]) -> Option<Parts> {
    let mut rest = tokens;

    let mut release = Vec::new();
    while let Some((first, more)) = rest.split_first() {
        if !is_numeric(first) {
            break;
        }
        release.push(Segment::digits(first));
        rest = more;
    }
    if release.is_empty() {
        return None;
    }

    let mut marker = Marker::FINAL;
    if let Some((first, more)) = rest.split_first() {
        if let Some(kind) = MarkerKind::from_word(first) {
            rest = more;
            let mut number = Segment::Number(0);
            if let Some((n, more)) = rest.split_first() {
                if is_numeric(n) {
                    number = Segment::digits(n);
                    rest = more;
                }
            }
            marker = Marker { kind, number };
        }
    }

    let tail = rest.iter().map(|t| segment(t)).collect();

    Some((release, marker, tail))
}

fn join_segments(segments: &[Segment]) -> String {
    segments
        .iter()
        .map(|s| s.to_string())
        .collect::<Vec<_>>()
        .join(".")
}

fn compare_release(a: &[Segment], b: &[Segment]) -> Ordering {
    let zero = Segment::Number(0);
    let len = a.len().max(b.len());
    for i in 0..len {
        let left = a.get(i).unwrap_or(&zero);
        let right = b.get(i).unwrap_or(&zero);
        match left.cmp(right) {
            Ordering::Equal => continue,
            other => return other,
        }
    }
    Ordering::Equal
}

impl Ord for ParsedVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_sentinel(), other.is_sentinel()) {
            (true, true) => return Ordering::Equal,
            (true, false) => return Ordering::Less,
            (false, true) => return Ordering::Greater,
            (false, false) => {}
        }

        compare_release(&self.release, &other.release)
            .then_with(|| self.marker.cmp(&other.marker))
            .then_with(|| self.tail.cmp(&other.tail))
    }
}

impl PartialOrd for ParsedVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for ParsedVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ParsedVersion {}

impl Hash for ParsedVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.is_sentinel().hash(state);
        self.significant_release().hash(state);
        self.marker.hash(state);
        self.tail.hash(state);
    }
}

impl Default for ParsedVersion {
    fn default() -> Self {
        Self::sentinel()
    }
}

impl fmt::Display for ParsedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.raw)
    }
}

impl FromStr for ParsedVersion {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for ParsedVersion {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for ParsedVersion {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl Serialize for ParsedVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

/// Shorthand for [`ParsedVersion::parse`]
pub fn parse(raw: &str) -> ParsedVersion {
    ParsedVersion::parse(raw)
}
