//! A representation of a JSON Pointer with associated operations, as per RFC 6901
//!
//! Pointers are the paths used to navigate decoded documents. Each component is either a
//! member name or an array index.
use std::{fmt::Display, ops::Add, str::FromStr};

/// Each pointer is a series of segments delineated by a separator char
const PATH_SEPARATOR: char = '/';
/// As per the RFC, we need to encode any tilde characters as ~0
const ENCODED_TILDE: &str = "~0";
/// As per the RFC, we need to encode any slash characters as ~1
const ENCODED_SLASH: &str = "~1";

/// Each pointer is made of one of two different component types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JsonPointerComponent {
    /// A named element within a pointer
    Name(String),
    /// An indexed element within a pointer
    Index(usize),
}

impl Display for JsonPointerComponent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Name(s) => write!(
                f,
                "{}",
                &s.replace('~', ENCODED_TILDE).replace('/', ENCODED_SLASH)
            ),
            Self::Index(i) => write!(f, "{}", i),
        }
    }
}

impl From<&str> for JsonPointerComponent {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<usize> for JsonPointerComponent {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

/// A structure representing a complete pointer, comprising multiple [JsonPointerComponent]s.
/// The empty pointer refers to the root of a document.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct JsonPointer {
    /// The components that go together to make up the pointer
    components: Vec<JsonPointerComponent>,
}

/// Build a [JsonPointer] from a list of names and indexes, e.g. `pointer!["periods", 2]`
#[macro_export]
macro_rules! pointer {
    ($($c : expr),* $(,)?) => {{
        #[allow(unused_mut)]
        let mut pointer = $crate::pointer::JsonPointer::default();
        $(pointer.push($c);)*
        pointer
    }};
}

impl JsonPointer {
    /// Returns the number of [JsonPointerComponent]s within the pointer
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Checks whether the pointer is the empty (root) pointer
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// The components of the pointer, in order
    pub fn components(&self) -> &[JsonPointerComponent] {
        &self.components
    }

    /// Push a new component (a name or an index) onto the end of the pointer
    pub fn push<C: Into<JsonPointerComponent>>(&mut self, component: C) {
        self.components.push(component.into())
    }

    /// Push a whole bunch of names onto the end of the path in order
    pub fn push_names(&mut self, names: &[&str]) {
        names.iter().for_each(|n| self.push_name(n.to_string()))
    }

    /// Push a new [JsonPointerComponent::Name] onto the end of the pointer
    pub fn push_name(&mut self, name: String) {
        self.components.push(JsonPointerComponent::Name(name))
    }

    /// Push a new [JsonPointerComponent::Index] onto the end of the pointer
    pub fn push_index(&mut self, index: usize) {
        self.components.push(JsonPointerComponent::Index(index))
    }

    /// Pop the last component off the back of the pointer
    pub fn pop(&mut self) -> Option<JsonPointerComponent> {
        self.components.pop()
    }

    /// A new pointer with `component` appended
    pub fn child<C: Into<JsonPointerComponent>>(&self, component: C) -> JsonPointer {
        let mut child = self.clone();
        child.push(component);
        child
    }

    /// Checks whether a pointer matches another pointer
    pub fn matches(&self, rhs: &JsonPointer) -> bool {
        self.as_str() == rhs.as_str()
    }

    /// Serialise the pointer into a string representation that's compliant with RFC 6901
    pub fn as_str(&self) -> String {
        self.components
            .iter()
            .map(|c| format!("{}{}", PATH_SEPARATOR, c))
            .collect()
    }
}

impl Display for JsonPointer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Add<&JsonPointer> for JsonPointer {
    type Output = Self;

    /// Concatenate two [JsonPointer] instances.
    fn add(mut self, rhs: &JsonPointer) -> Self {
        self.components.extend(rhs.components.iter().cloned());
        self
    }
}

/// Canonical decimal segments (no sign, no leading zeros) are treated as indexes
fn parse_segment(segment: &str) -> JsonPointerComponent {
    let canonical = !segment.is_empty()
        && segment.bytes().all(|b| b.is_ascii_digit())
        && (segment == "0" || !segment.starts_with('0'));
    if canonical {
        if let Ok(index) = segment.parse::<usize>() {
            return JsonPointerComponent::Index(index);
        }
    }
    JsonPointerComponent::Name(
        segment
            .replace(ENCODED_SLASH, "/")
            .replace(ENCODED_TILDE, "~"),
    )
}

impl FromStr for JsonPointer {
    type Err = String;

    /// Parse the RFC 6901 textual form, e.g. `/properties/periods/2`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(JsonPointer::default());
        }
        let Some(rest) = s.strip_prefix(PATH_SEPARATOR) else {
            return Err(format!("pointer '{}' must be empty or start with '/'", s));
        };
        let mut pointer = JsonPointer::default();
        for segment in rest.split(PATH_SEPARATOR) {
            let mut chars = segment.chars();
            while let Some(c) = chars.next() {
                if c == '~' && !matches!(chars.next(), Some('0' | '1')) {
                    return Err(format!("pointer '{}' contains an invalid '~' escape", s));
                }
            }
            pointer.components.push(parse_segment(segment));
        }
        Ok(pointer)
    }
}

#[cfg(test)]
mod tests {
    use super::{JsonPointer, JsonPointerComponent};

    #[test]
    fn an_empty_pointer_should_be_represented_by_an_empty_string() {
        let s = JsonPointer::default().as_str();
        assert_eq!(s, "")
    }

    #[test]
    fn pointers_should_serialise_correctly() {
        let mut s = JsonPointer::default();
        s.push_names(&["a", "b"]);
        assert_eq!("/a/b", s.as_str())
    }

    #[test]
    fn pointers_should_serialise_with_escapes_correctly() {
        let mut s = JsonPointer::default();
        s.push_names(&["a/b", "c~d"]);
        s.push_index(3);
        assert_eq!("/a~1b/c~0d/3", s.as_str())
    }

    #[test]
    fn popping_all_components_should_result_in_empty_pointer() {
        let mut s = JsonPointer::default();
        s.push_names(&["a", "b", "c"]);
        s.pop();
        assert_eq!("/a/b", s.as_str());
        s.pop();
        s.pop();
        assert_eq!("", s.as_str());
        assert!(s.is_empty());
    }

    #[test]
    fn pointers_should_match() {
        let s = pointer!["b", 9usize];
        let mut t = JsonPointer::default();
        t.push_name("b".to_string());
        t.push_index(9);
        assert!(s.matches(&t));
        assert_eq!(s, t);
    }

    #[test]
    fn pointers_should_parse_from_rfc_6901_text() {
        let p: JsonPointer = "/properties/periods/2/a~1b~0c".parse().unwrap();
        assert_eq!(
            p.components(),
            [
                JsonPointerComponent::Name("properties".to_string()),
                JsonPointerComponent::Name("periods".to_string()),
                JsonPointerComponent::Index(2),
                JsonPointerComponent::Name("a/b~c".to_string()),
            ]
        );
        assert_eq!(p.to_string(), "/properties/periods/2/a~1b~0c");
    }

    #[test]
    fn non_canonical_numbers_should_parse_as_names() {
        let p: JsonPointer = "/01/-1/".parse().unwrap();
        assert_eq!(
            p.components(),
            [
                JsonPointerComponent::Name("01".to_string()),
                JsonPointerComponent::Name("-1".to_string()),
                JsonPointerComponent::Name("".to_string()),
            ]
        );
    }

    #[test]
    fn malformed_pointers_should_be_rejected() {
        assert!("properties".parse::<JsonPointer>().is_err());
        assert!("/a~2".parse::<JsonPointer>().is_err());
        assert!("/a~".parse::<JsonPointer>().is_err());
        assert!("".parse::<JsonPointer>().unwrap().is_empty());
    }

    #[test]
    fn pointers_should_concatenate() {
        let base = pointer!["properties"];
        let joined = base + &pointer!["periods", 3usize];
        assert_eq!(joined.as_str(), "/properties/periods/3");
        assert_eq!(joined.child("name").len(), 4);
    }
}
