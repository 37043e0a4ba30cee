//! Field selectors: partial projections of a JSON rendering.
//!
//! A selector is an ordered, duplicate-free list of pointers such as
//! `attributes,features/*/properties/connected`. The `*` wildcard may only
//! stand for a feature id (`features/*/...`); it is replaced by one concrete
//! path per feature of the thing being rendered, see
//! [`FieldSelector::expand`].

use crate::codec::JsonFieldDefinition;
use crate::{Error, JsonObject, JsonPointer};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use tracing::trace;

/// The wildcard segment.
pub const WILDCARD: &str = "*";

/// The root segment of the only collection a wildcard may range over.
pub const FEATURES_ROOT: &str = "features";

const PATH_SEPARATOR: char = '/';
const LIST_SEPARATOR: char = ',';
const GROUP_OPEN: char = '(';
const GROUP_CLOSE: char = ')';

/// An ordered, duplicate-free set of selected paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldSelector {
    pointers: Vec<JsonPointer>,
}

impl FieldSelector {
    /// Parses the comma-separated selector syntax.
    ///
    /// Each path may start with one `/`. `prefix(a,b/c)` groups expand to
    /// `prefix/a,prefix/b/c` and may nest.
    pub fn parse(selector: &str) -> Result<Self, Error> {
        let invalid = |reason: &str| Error::InvalidFieldSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        };

        let mut pointers = Vec::new();
        for path in expand_groups(selector).map_err(|reason| invalid(reason))? {
            pointers.push(parse_path(&path).map_err(|reason| invalid(reason))?);
        }
        Ok(Self::from_pointers(pointers))
    }

    /// Builds a selector from pointers, keeping the first of any duplicates.
    ///
    /// Pointers are taken as they are; wildcard placement is only validated
    /// by [`FieldSelector::parse`].
    pub fn from_pointers(pointers: impl IntoIterator<Item = JsonPointer>) -> Self {
        let mut unique: Vec<JsonPointer> = Vec::new();
        for pointer in pointers {
            if !unique.contains(&pointer) {
                unique.push(pointer);
            }
        }
        Self { pointers: unique }
    }

    #[must_use]
    pub fn pointers(&self) -> &[JsonPointer] {
        &self.pointers
    }

    pub fn iter(&self) -> impl Iterator<Item = &JsonPointer> {
        self.pointers.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pointers.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pointers.is_empty()
    }

    /// True if any path still carries the feature wildcard.
    #[must_use]
    pub fn has_wildcard(&self) -> bool {
        self.pointers.iter().any(is_wildcard_path)
    }

    /// Replaces every wildcard path with one path per key, in key order and
    /// at the wildcard path's position. Other paths are kept as they are.
    ///
    /// A key whose concrete path is already selected literally is skipped,
    /// so the literal keeps its position whatever the key set.
    pub fn expand<I>(&self, keys: I) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        if !self.has_wildcard() {
            return self.clone();
        }
        let keys: Vec<String> = keys.into_iter().map(|k| k.as_ref().to_string()).collect();

        let expanded = self.pointers.iter().flat_map(|pointer| {
            if is_wildcard_path(pointer) {
                keys.iter()
                    .map(|key| {
                        let mut segments = pointer.segments().to_vec();
                        segments[1].clone_from(key);
                        JsonPointer::from_segments(segments)
                    })
                    .filter(|concrete| !self.pointers.contains(concrete))
                    .collect::<Vec<_>>()
            } else {
                vec![pointer.clone()]
            }
        });
        let result = Self::from_pointers(expanded);
        trace!(
            selector = %self,
            keys = keys.len(),
            expanded = %result,
            "Expanded feature wildcard"
        );
        result
    }

    /// True if `pointer` is selected, is an ancestor of a selected path, or
    /// lies below a selected path.
    #[must_use]
    pub fn matches(&self, pointer: &JsonPointer) -> bool {
        self.pointers
            .iter()
            .any(|selected| selected.is_prefix_of(pointer) || pointer.is_prefix_of(selected))
    }

    /// A rendering predicate admitting the top-level fields this selector
    /// touches.
    pub fn to_predicate(&self) -> impl Fn(&JsonFieldDefinition) -> bool + '_ {
        move |definition: &JsonFieldDefinition| self.matches(&definition.pointer())
    }

    /// Copies the selected parts of `object` into a new object.
    ///
    /// Selected paths missing from `object` are skipped; present ones are
    /// nested under their ancestors, in selector order.
    #[must_use]
    pub fn project(&self, object: &JsonObject) -> JsonObject {
        let mut projected = JsonObject::new();
        for pointer in &self.pointers {
            if let Some(value) = pointer.get_in(object) {
                pointer.set_in(&mut projected, value.clone());
            }
        }
        projected
    }
}

fn is_wildcard_path(pointer: &JsonPointer) -> bool {
    pointer.first() == Some(FEATURES_ROOT)
        && pointer.segments().get(1).map(String::as_str) == Some(WILDCARD)
}

/// Splits on top-level commas and flattens `prefix(...)` groups into plain
/// paths.
fn expand_groups(input: &str) -> Result<Vec<String>, &'static str> {
    let mut paths = Vec::new();
    for item in split_top_level(input)? {
        match item.find(GROUP_OPEN) {
            None => paths.push(item.to_string()),
            Some(open) => {
                let close = matching_close(item, open)?;
                if close + 1 != item.len() {
                    return Err("unexpected characters after ')'");
                }
                let prefix = &item[..open];
                let inner = &item[open + 1..close];
                for suffix in expand_groups(inner)? {
                    if prefix.is_empty() {
                        paths.push(suffix);
                    } else {
                        paths.push(format!("{prefix}{PATH_SEPARATOR}{suffix}"));
                    }
                }
            }
        }
    }
    Ok(paths)
}

fn split_top_level(input: &str) -> Result<Vec<&str>, &'static str> {
    let mut items = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, c) in input.char_indices() {
        match c {
            GROUP_OPEN => depth += 1,
            GROUP_CLOSE => depth = depth.checked_sub(1).ok_or("unbalanced ')'")?,
            LIST_SEPARATOR if depth == 0 => {
                items.push(&input[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err("unbalanced '('");
    }
    items.push(&input[start..]);
    Ok(items)
}

fn matching_close(item: &str, open: usize) -> Result<usize, &'static str> {
    let mut depth = 0usize;
    for (idx, c) in item[open..].char_indices() {
        match c {
            GROUP_OPEN => depth += 1,
            GROUP_CLOSE => {
                depth -= 1;
                if depth == 0 {
                    return Ok(open + idx);
                }
            }
            _ => {}
        }
    }
    Err("unbalanced '('")
}

fn parse_path(path: &str) -> Result<JsonPointer, &'static str> {
    let body = path.strip_prefix(PATH_SEPARATOR).unwrap_or(path);
    if body.is_empty() {
        return Err("empty path");
    }
    if body.ends_with(PATH_SEPARATOR) {
        return Err("trailing '/'");
    }
    let segments: Vec<String> = body.split(PATH_SEPARATOR).map(str::to_string).collect();
    if segments.iter().any(String::is_empty) {
        return Err("empty path segment");
    }
    let pointer = JsonPointer::from_segments(segments);
    let wildcards = pointer.segments().iter().filter(|s| *s == WILDCARD).count();
    if wildcards > 0 && !(wildcards == 1 && is_wildcard_path(&pointer)) {
        return Err("'*' is only allowed as the feature id in 'features/*'");
    }
    Ok(pointer)
}

impl fmt::Display for FieldSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, pointer) in self.pointers.iter().enumerate() {
            if idx > 0 {
                write!(f, "{LIST_SEPARATOR}")?;
            }
            f.write_str(&pointer.segments().join("/"))?;
        }
        Ok(())
    }
}

impl FromStr for FieldSelector {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for FieldSelector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FieldSelector {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
