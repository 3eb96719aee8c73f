//! Native action identifiers and their canonical string form.

use std::borrow::Cow;
use std::fmt;
use std::hash::{Hash, Hasher};

/// The platform-native identifier of an intercepted action (a selector).
///
/// Observers never see a `Selector` directly: the dispatch entry point hands them
/// the canonical name returned by [`Selector::name`], so comparisons in observers
/// and tests are plain string equality.
///
/// # Examples
///
/// ```rust
/// use swizzle_registry::Selector;
///
/// let selector = Selector::new("buttonTapped:");
/// assert_eq!(selector.name(), "buttonTapped:");
/// assert_eq!(selector.to_string(), "buttonTapped:");
/// ```
#[derive(Debug, Clone)]
pub struct Selector(Cow<'static, str>);

impl Selector {
    /// Creates a selector from its native name.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Selector(name.into())
    }

    /// Creates a selector from a static name in const context.
    pub const fn from_static(name: &'static str) -> Self {
        Selector(Cow::Borrowed(name))
    }

    /// Canonical string form delivered to observers.
    ///
    /// Leading and trailing whitespace is not part of a selector name and is dropped.
    pub fn name(&self) -> &str {
        self.0.trim()
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&'static str> for Selector {
    fn from(name: &'static str) -> Self {
        Selector::from_static(name)
    }
}

impl From<String> for Selector {
    fn from(name: String) -> Self {
        Selector(Cow::Owned(name))
    }
}

impl PartialEq for Selector {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for Selector {}

impl Hash for Selector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name().hash(state);
    }
}

impl PartialEq<str> for Selector {
    fn eq(&self, other: &str) -> bool {
        self.name() == other
    }
}

impl PartialEq<&str> for Selector {
    fn eq(&self, other: &&str) -> bool {
        self.name() == *other
    }
}
