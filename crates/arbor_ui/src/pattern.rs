//! # Selector Patterns
//!
//! ```text
//! path    := segment (' ' segment)*
//! segment := atom+
//! atom    := '*' | '#' name | '.' name | ':' (first | last | odd | even)
//! ```
//!
//! A path matches a box when its last segment matches the box and every
//! earlier segment matches some ancestor, in order. Ids compare against the
//! box label, tags against the box's tag list.

use std::str::FromStr;

use crate::error::{UiError, UiResult};

/// Specificity of a pattern: (id count, tag and pseudo count).
///
/// Ordering is lexicographic, so more ids always win and tags break ties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Specificity {
    /// Number of `#id` atoms.
    pub id: u32,
    /// Number of `.tag` and `:pseudo` atoms.
    pub tag: u32,
}

impl Specificity {
    /// Creates a specificity pair.
    #[must_use]
    pub const fn new(id: u32, tag: u32) -> Self {
        Self { id, tag }
    }
}

impl std::ops::Add for Specificity {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self::new(self.id + rhs.id, self.tag + rhs.tag)
    }
}

/// One atomic selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `*`
    Any,
    /// `#name`, compared against the box label.
    Id(String),
    /// `.name`, looked up in the box's tags.
    Tag(String),
    /// `:first`
    First,
    /// `:last`
    Last,
    /// `:odd`, zero-based index 1, 3, 5...
    Odd,
    /// `:even`, zero-based index 0, 2, 4...
    Even,
}

/// Where a box sits among its siblings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiblingPosition {
    /// Index in the parent's child list.
    pub index: usize,
    /// Length of the parent's child list.
    pub count: usize,
}

/// A whitespace-free run of atoms; all of them must hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    selectors: Vec<Selector>,
    specificity: Specificity,
}

impl Segment {
    /// The atoms of this segment.
    #[must_use]
    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }

    /// Specificity of this segment alone.
    #[must_use]
    pub const fn specificity(&self) -> Specificity {
        self.specificity
    }

    /// Returns true if every atom holds for the box.
    ///
    /// `position` is `None` for a box without a parent, which matches none
    /// of the positional pseudo selectors.
    #[must_use]
    pub fn matches(&self, label: &str, tags: &[String], position: Option<SiblingPosition>) -> bool {
        self.selectors.iter().all(|selector| match selector {
            Selector::Any => true,
            Selector::Id(name) => label == name,
            Selector::Tag(name) => tags.iter().any(|t| t == name),
            Selector::First => position.is_some_and(|p| p.index == 0),
            Selector::Last => position.is_some_and(|p| p.index + 1 == p.count),
            Selector::Odd => position.is_some_and(|p| p.index % 2 == 1),
            Selector::Even => position.is_some_and(|p| p.index % 2 == 0),
        })
    }

    fn parse(chunk: &str) -> UiResult<Self> {
        let mut selectors = Vec::new();
        let mut specificity = Specificity::default();
        let mut rest = chunk;

        while let Some(c) = rest.chars().next() {
            rest = &rest[c.len_utf8()..];

            let selector = match c {
                '*' => Selector::Any,
                '#' => {
                    specificity.id += 1;
                    let (name, tail) = take_name(rest)?;
                    rest = tail;
                    Selector::Id(name.to_owned())
                }
                '.' => {
                    specificity.tag += 1;
                    let (name, tail) = take_name(rest)?;
                    rest = tail;
                    Selector::Tag(name.to_owned())
                }
                ':' => {
                    specificity.tag += 1;
                    let (selector, len) = if rest.starts_with("first") {
                        (Selector::First, 5)
                    } else if rest.starts_with("last") {
                        (Selector::Last, 4)
                    } else if rest.starts_with("odd") {
                        (Selector::Odd, 3)
                    } else if rest.starts_with("even") {
                        (Selector::Even, 4)
                    } else {
                        tracing::error!("invalid pseudo tag in selector [{}]", chunk);
                        return Err(UiError::InvalidPseudo(rest.to_owned()));
                    };
                    rest = &rest[len..];
                    selector
                }
                _ => {
                    tracing::error!("invalid selector [{}]", chunk);
                    return Err(UiError::InvalidSelector(format!("{c}{rest}")));
                }
            };

            selectors.push(selector);
        }

        Ok(Self { selectors, specificity })
    }
}

/// Splits a selector name off the front of `rest`.
fn take_name(rest: &str) -> UiResult<(&str, &str)> {
    let n = rest.find(&['#', '.', ':', ' '][..]).unwrap_or(rest.len());
    if n == 0 {
        tracing::error!("expected selector name at [{}]", rest);
        return Err(UiError::ExpectedSelectorName(rest.to_owned()));
    }
    Ok(rest.split_at(n))
}

/// A parsed selector path.
///
/// # Example
///
/// ```rust
/// use arbor_ui::pattern::{Pattern, Specificity};
///
/// let p: Pattern = "#sidebar .button:last".parse().unwrap();
/// assert_eq!(p.len(), 2);
/// assert_eq!(p.specificity(), Specificity::new(1, 2));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    segments: Vec<Segment>,
    specificity: Specificity,
}

impl Pattern {
    /// Parses a pattern.
    ///
    /// # Errors
    ///
    /// Fails on an unknown atom, an unknown pseudo tag, a missing name
    /// after `#` or `.`, or an empty pattern.
    pub fn parse(text: &str) -> UiResult<Self> {
        let segments = text
            .split(' ')
            .filter(|chunk| !chunk.is_empty())
            .map(Segment::parse)
            .collect::<UiResult<Vec<_>>>()?;

        if segments.is_empty() {
            tracing::error!("empty selector pattern");
            return Err(UiError::EmptyPattern);
        }

        let specificity = segments
            .iter()
            .fold(Specificity::default(), |acc, s| acc + s.specificity);

        Ok(Self { segments, specificity })
    }

    /// Specificity of the whole path.
    #[must_use]
    pub const fn specificity(&self) -> Specificity {
        self.specificity
    }

    /// The path segments, outermost first.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Segment at `index`, if any.
    #[must_use]
    pub fn segment(&self, index: usize) -> Option<&Segment> {
        self.segments.get(index)
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Always false for a parsed pattern.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl FromStr for Pattern {
    type Err = UiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
