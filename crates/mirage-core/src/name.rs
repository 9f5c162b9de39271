use std::borrow::Borrow;
use std::fmt;

use lasso::{Rodeo, Spur};
use smol_str::SmolStr;

/// An immutable simple or qualified name.
///
/// Names are cheap to clone and compare by content, both against other names and against plain
/// strings.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Name(SmolStr);

impl Name {
    pub fn new(text: impl AsRef<str>) -> Self {
        Self(SmolStr::new(text.as_ref()))
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Content comparison against a plain string.
    #[inline]
    pub fn content_equals(&self, other: &str) -> bool {
        self.0 == other
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The last `.`-separated segment, e.g. `Entry` for `java.util.Map.Entry`.
    pub fn simple(&self) -> Name {
        match self.0.rfind('.') {
            Some(idx) => Name::new(&self.0[idx + 1..]),
            None => self.clone(),
        }
    }

    /// Everything before the last `.`, or `None` for an unqualified name.
    pub fn qualifier(&self) -> Option<Name> {
        self.0.rfind('.').map(|idx| Name::new(&self.0[..idx]))
    }

    /// Appends `segment` with a `.` separator (no separator when `self` is empty).
    pub fn child(&self, segment: &str) -> Name {
        if self.0.is_empty() {
            Name::new(segment)
        } else {
            Name::new(format!("{}.{}", self.0, segment))
        }
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({:?})", self.0.as_str())
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

impl Borrow<str> for Name {
    fn borrow(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<&str> for Name {
    fn from(value: &str) -> Self {
        Name::new(value)
    }
}

impl From<String> for Name {
    fn from(value: String) -> Self {
        Name(SmolStr::from(value))
    }
}

impl From<&String> for Name {
    fn from(value: &String) -> Self {
        Name::new(value)
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl PartialEq<Name> for str {
    fn eq(&self, other: &Name) -> bool {
        other.0 == self
    }
}

impl PartialEq<Name> for &str {
    fn eq(&self, other: &Name) -> bool {
        other.0 == *self
    }
}

/// An opaque interned token for a name stored in a [`NameTable`].
///
/// Tokens from the same table compare equal iff their texts are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NameId(Spur);

/// String interner handing out [`NameId`] tokens.
#[derive(Debug, Default)]
pub struct NameTable {
    rodeo: Rodeo,
}

impl NameTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, text: &str) -> NameId {
        NameId(self.rodeo.get_or_intern(text))
    }

    /// Returns the token for `text` without interning it.
    pub fn get(&self, text: &str) -> Option<NameId> {
        self.rodeo.get(text).map(NameId)
    }

    pub fn resolve(&self, id: NameId) -> &str {
        self.rodeo.resolve(&id.0)
    }

    pub fn name(&self, id: NameId) -> Name {
        Name::new(self.resolve(id))
    }

    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }
}
