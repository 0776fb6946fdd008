//! crates/logging/src/verbosity.rs
//! Per-call-site verbosity gating.
//!
//! A verbosity-gated call passes when the global level is at least the
//! requested level, or when the first override pattern matching the call
//! site's module allows it. The global check and the "any overrides?" check
//! are single atomic loads; only call sites that fail the global check while
//! overrides exist take the engine lock, and each site resolves its pattern
//! once before being served from a cache.
//!
//! Overrides can only raise verbosity for the files they match: a site is
//! enabled if either source enables it.

use std::fmt;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};

use globset::{GlobBuilder, GlobMatcher};
use rustc_hash::FxHashMap;

use crate::error::ConfigSyntaxError;

/// Identity of one verbosity-gated call site.
///
/// Created as a `static` by [`v!`](crate::v) so its address uniquely names
/// the site for the lifetime of the process.
#[derive(Debug)]
pub struct CallSite {
    file: &'static str,
    line: u32,
}

impl CallSite {
    /// Describes the call site at `file:line`.
    #[must_use]
    pub const fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }

    /// Source file as given at construction.
    #[must_use]
    pub const fn file(&self) -> &'static str {
        self.file
    }

    /// Source line.
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Module name used for pattern matching: the file's basename without
    /// its `.rs` extension.
    #[must_use]
    pub fn module(&self) -> &'static str {
        let base = crate::entry::basename(self.file);
        base.strip_suffix(".rs").unwrap_or(base)
    }

    fn key(&'static self) -> usize {
        std::ptr::from_ref(self) as usize
    }
}

#[derive(Clone, Debug)]
enum Matcher {
    Literal,
    Glob(GlobMatcher),
}

/// One `pattern=level` override.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "String", into = "String"))]
pub struct ModulePattern {
    pattern: String,
    level: i32,
    matcher: Matcher,
}

impl ModulePattern {
    /// Builds an override for modules matching `pattern`.
    ///
    /// Patterns without any of `\*?[]` compare literally; others are globs.
    pub fn new(pattern: impl Into<String>, level: i32) -> Result<Self, ConfigSyntaxError> {
        let pattern = pattern.into();
        let matcher = if is_literal(&pattern) {
            Matcher::Literal
        } else {
            let glob = GlobBuilder::new(&pattern)
                .literal_separator(true)
                .backslash_escape(true)
                .build()
                .map_err(|source| ConfigSyntaxError::Pattern {
                    pattern: pattern.clone(),
                    source,
                })?;
            Matcher::Glob(glob.compile_matcher())
        };
        Ok(Self {
            pattern,
            level,
            matcher,
        })
    }

    /// The pattern text.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The level granted to matching modules.
    #[must_use]
    pub const fn level(&self) -> i32 {
        self.level
    }

    /// Reports whether `module` matches this pattern.
    #[must_use]
    pub fn matches(&self, module: &str) -> bool {
        match &self.matcher {
            Matcher::Literal => self.pattern == module,
            Matcher::Glob(glob) => glob.is_match(module),
        }
    }
}

impl PartialEq for ModulePattern {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.level == other.level
    }
}

impl Eq for ModulePattern {}

impl fmt::Display for ModulePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.pattern, self.level)
    }
}

impl TryFrom<String> for ModulePattern {
    type Error = ConfigSyntaxError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let mut patterns = parse_vmodule(&value)?;
        match (patterns.pop(), patterns.is_empty()) {
            (Some(pattern), true) => Ok(pattern),
            _ => Err(ConfigSyntaxError::VmoduleSyntax),
        }
    }
}

impl From<ModulePattern> for String {
    fn from(pattern: ModulePattern) -> Self {
        pattern.to_string()
    }
}

fn is_literal(pattern: &str) -> bool {
    !pattern.contains(['\\', '*', '?', '[', ']'])
}

/// Parses an override list such as `server=2,net*=3`.
///
/// Empty items are ignored and `0` levels are dropped as no-ops.
pub fn parse_vmodule(value: &str) -> Result<Vec<ModulePattern>, ConfigSyntaxError> {
    let mut patterns = Vec::new();
    for item in value.split(',') {
        if item.is_empty() {
            continue;
        }
        let mut parts = item.split('=');
        let (Some(pattern), Some(level), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(ConfigSyntaxError::VmoduleSyntax);
        };
        if pattern.is_empty() || level.is_empty() {
            return Err(ConfigSyntaxError::VmoduleSyntax);
        }
        let level: i32 = level
            .parse()
            .map_err(|_| ConfigSyntaxError::VmoduleSyntax)?;
        if level < 0 {
            return Err(ConfigSyntaxError::NegativeVmoduleLevel);
        }
        if level == 0 {
            continue;
        }
        patterns.push(ModulePattern::new(pattern, level)?);
    }
    Ok(patterns)
}

/// Renders an override list back into `pattern=level,...` form.
#[must_use]
pub fn render_vmodule(patterns: &[ModulePattern]) -> String {
    patterns
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Ordered override list plus the per-call-site resolution cache.
///
/// Lives under the engine lock.
#[derive(Debug, Default)]
pub struct ModuleFilter {
    patterns: Vec<ModulePattern>,
    cache: FxHashMap<usize, i32>,
}

impl ModuleFilter {
    /// Current override list.
    #[must_use]
    pub fn patterns(&self) -> &[ModulePattern] {
        &self.patterns
    }

    /// Level granted to `site` by the first matching pattern, 0 if none.
    pub fn resolve(&mut self, site: &'static CallSite) -> i32 {
        let patterns = &self.patterns;
        *self.cache.entry(site.key()).or_insert_with(|| {
            let module = site.module();
            patterns
                .iter()
                .find(|pattern| pattern.matches(module))
                .map_or(0, ModulePattern::level)
        })
    }

    /// Number of call sites resolved since the last pattern change.
    #[must_use]
    pub fn cached_sites(&self) -> usize {
        self.cache.len()
    }

    fn replace(&mut self, patterns: Vec<ModulePattern>) {
        self.patterns = patterns;
        self.cache.clear();
    }
}

/// Outcome of the lock-free part of a verbosity check.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GateDecision {
    /// The global level admits the request.
    Enabled,
    /// No override could admit the request.
    Disabled,
    /// Overrides exist; the call site must be resolved under the lock.
    NeedsLookup,
}

/// Atomic state read on every verbosity check.
#[derive(Debug, Default)]
pub struct VerbosityGate {
    verbosity: AtomicI32,
    filter_len: AtomicUsize,
}

impl VerbosityGate {
    /// Creates a gate with verbosity 0 and no overrides.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            verbosity: AtomicI32::new(0),
            filter_len: AtomicUsize::new(0),
        }
    }

    /// Global verbosity level.
    #[must_use]
    pub fn verbosity(&self) -> i32 {
        self.verbosity.load(Ordering::Acquire)
    }

    /// Runs the two lock-free checks for `level`.
    #[must_use]
    pub fn quick_check(&self, level: i32) -> GateDecision {
        if self.verbosity.load(Ordering::Acquire) >= level {
            GateDecision::Enabled
        } else if self.filter_len.load(Ordering::Acquire) > 0 {
            GateDecision::NeedsLookup
        } else {
            GateDecision::Disabled
        }
    }

    /// Installs a new verbosity and optionally a new override list.
    ///
    /// Takes the filter by exclusive reference, which the engine only hands
    /// out while holding its lock. Both atomics pass through zero first so
    /// no concurrent check observes a half-installed state; a new override
    /// list discards every cached call-site resolution.
    pub fn reconfigure(
        &self,
        filter: &mut ModuleFilter,
        verbosity: i32,
        patterns: Option<Vec<ModulePattern>>,
    ) {
        self.verbosity.store(0, Ordering::Release);
        self.filter_len.store(0, Ordering::Release);

        if let Some(patterns) = patterns {
            filter.replace(patterns);
        }

        // Enable in the opposite order to the reads in `quick_check`.
        self.filter_len
            .store(filter.patterns.len(), Ordering::Release);
        self.verbosity.store(verbosity, Ordering::Release);
    }
}
