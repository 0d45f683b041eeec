//! # Style Cascade
//!
//! Resolves each box's target style from the rules declared in its
//! ancestors and itself, then blends the live style toward it.
//!
//! ## Algorithm
//!
//! ```text
//! visit(box, active):
//!     restore = len(active)
//!     active += box.rules (head = 0)
//!     for rule in active[..stop]          stop = len after the push
//!         if rule.segment[head] matches box
//!             last segment  -> apply where specificity >= recorded
//!             otherwise     -> push (rule, head + 1) for descendants
//!     visit(child, active) for each child
//!     truncate(active, restore)
//!     animate(box.style -> box.next_style)
//! ```
//!
//! Rules derived at a box are only tested from its children down, and the
//! truncation keeps them out of the box's siblings.

use arbor_core::{ArenaRef, FrameArena};

use crate::animation::animate_style;
use crate::pattern::{Pattern, Specificity};
use crate::style::{Attr, StyleMask, UiStyle};
use crate::tree::{BoxId, BoxStore, UiBox};

/// A selector bound to the attributes it overrides.
///
/// Rules live in a frame arena and are declared again every pass.
#[derive(Debug, Clone)]
pub struct StyleRule {
    /// Path the rule matches.
    pub pattern: Pattern,
    /// Attribute values; only the masked ones are applied.
    pub style: UiStyle,
    /// Attributes this rule sets.
    pub mask: StyleMask,
}

impl StyleRule {
    /// Creates a rule that sets nothing yet.
    #[must_use]
    pub fn new(pattern: Pattern) -> Self {
        Self {
            pattern,
            style: UiStyle::DEFAULT,
            mask: StyleMask::empty(),
        }
    }
}

/// A rule in flight, with the index of its next unmatched segment.
#[derive(Debug, Clone, Copy)]
struct ActiveRule {
    rule: ArenaRef<StyleRule>,
    head: usize,
}

/// Resolves and animates the whole tree rooted at the first declared box.
pub fn cascade(store: &mut BoxStore, rules: &FrameArena<StyleRule>, dt: f32) {
    let Some(root) = store.root() else {
        return;
    };
    let mut active = Vec::with_capacity(rules.len());
    visit(store, rules, root, &mut active, dt);
}

fn visit(
    store: &mut BoxStore,
    rules: &FrameArena<StyleRule>,
    id: BoxId,
    active: &mut Vec<ActiveRule>,
    dt: f32,
) {
    let restore = active.len();
    active.extend(store[id].rules.iter().map(|&rule| ActiveRule { rule, head: 0 }));
    let stop_at = active.len();

    let position = store.sibling_position(id);
    let mut recorded = [Specificity::default(); Attr::COUNT];

    for k in 0..stop_at {
        let entry = active[k];
        let Some(rule) = rules.get(entry.rule) else {
            continue;
        };
        let Some(segment) = rule.pattern.segment(entry.head) else {
            continue;
        };

        let node = &store[id];
        if !segment.matches(&node.label, &node.tags, position) {
            continue;
        }

        if entry.head + 1 < rule.pattern.len() {
            active.push(ActiveRule { rule: entry.rule, head: entry.head + 1 });
            continue;
        }

        let specificity = rule.pattern.specificity();
        let node = &mut store[id];
        for attr in Attr::ALL {
            let slot = &mut recorded[attr.index()];
            if rule.mask.contains(attr.mask()) && specificity >= *slot {
                node.next_style.copy_attr(&rule.style, attr);
                *slot = specificity;
            }
        }
    }

    for k in 0..store[id].children.len() {
        let child = store[id].children[k];
        visit(store, rules, child, active, dt);
    }

    active.truncate(restore);

    let UiBox { style, next_style, .. } = &mut store[id];
    animate_style(style, next_style, dt);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Color, StyleValue};
    use crate::tree::BoxFlags;

    fn rule(rules: &mut FrameArena<StyleRule>, text: &str, attr: Attr, value: impl Into<StyleValue>) -> ArenaRef<StyleRule> {
        let mut r = StyleRule::new(text.parse().unwrap());
        r.style.set(attr, value.into()).unwrap();
        r.mask |= attr.mask();
        rules.alloc(r)
    }

    fn open(store: &mut BoxStore, label: &str, tags: &[&str]) -> BoxId {
        let id = store.begin_box(BoxFlags::empty(), label).unwrap();
        store[id].tags.extend(tags.iter().map(|t| (*t).to_owned()));
        id
    }

    #[test]
    fn test_id_beats_tag_regardless_of_order() {
        let red = Color::rgb(1.0, 0.0, 0.0);
        let blue = Color::rgb(0.0, 0.0, 1.0);

        for id_first in [true, false] {
            let mut rules = FrameArena::new();
            let mut store = BoxStore::new();
            store.begin_pass();
            let root = open(&mut store, "root", &[]);
            let by_id = rule(&mut rules, "#x.a", Attr::BgColor, red);
            let by_tag = rule(&mut rules, ".a", Attr::BgColor, blue);
            if id_first {
                store[root].rules.extend([by_id, by_tag]);
            } else {
                store[root].rules.extend([by_tag, by_id]);
            }
            let x = open(&mut store, "x", &["a"]);
            store.end_box().unwrap();
            store.end_box().unwrap();

            cascade(&mut store, &rules, 0.016);
            assert_eq!(store[x].next_style.bg_color, red);
            assert_eq!(store[x].style.bg_color, red);
        }
    }

    #[test]
    fn test_path_needs_matching_ancestor() {
        let mut rules = FrameArena::new();
        let mut store = BoxStore::new();
        store.begin_pass();
        let root = open(&mut store, "root", &[]);
        let r = rule(&mut rules, ".panel .item", Attr::Spacing, 9.0_f32);
        store[root].rules.push(r);

        open(&mut store, "panel", &["panel"]);
        let inside = open(&mut store, "in", &["item"]);
        store.end_box().unwrap();
        store.end_box().unwrap();
        let outside = open(&mut store, "out", &["item"]);
        store.end_box().unwrap();
        store.end_box().unwrap();

        cascade(&mut store, &rules, 0.016);
        assert_eq!(store[inside].style.spacing, 9.0);
        assert_eq!(store[outside].style.spacing, 0.0);
    }

    #[test]
    fn test_derived_rule_does_not_reach_siblings() {
        let mut rules = FrameArena::new();
        let mut store = BoxStore::new();
        store.begin_pass();
        let root = open(&mut store, "root", &[]);
        let r = rule(&mut rules, ".a .a", Attr::Spacing, 3.0_f32);
        store[root].rules.push(r);

        let first = open(&mut store, "first", &["a"]);
        store.end_box().unwrap();
        let second = open(&mut store, "second", &["a"]);
        store.end_box().unwrap();
        store.end_box().unwrap();

        cascade(&mut store, &rules, 0.016);
        assert_eq!(store[first].style.spacing, 0.0);
        assert_eq!(store[second].style.spacing, 0.0);
    }

    #[test]
    fn test_rule_matches_its_own_box() {
        let mut rules = FrameArena::new();
        let mut store = BoxStore::new();
        store.begin_pass();
        let root = open(&mut store, "root", &["button"]);
        let r = rule(&mut rules, ".button", Attr::Spacing, 2.0_f32);
        store[root].rules.push(r);
        store.end_box().unwrap();

        cascade(&mut store, &rules, 0.016);
        assert_eq!(store[root].style.spacing, 2.0);
    }

    #[test]
    fn test_positional_selector() {
        let mut rules = FrameArena::new();
        let mut store = BoxStore::new();
        store.begin_pass();
        let root = open(&mut store, "root", &[]);
        let r = rule(&mut rules, "*:last", Attr::Spacing, 5.0_f32);
        store[root].rules.push(r);
        let a = open(&mut store, "a", &[]);
        store.end_box().unwrap();
        let b = open(&mut store, "b", &[]);
        store.end_box().unwrap();
        store.end_box().unwrap();

        cascade(&mut store, &rules, 0.016);
        assert_eq!(store[root].style.spacing, 0.0);
        assert_eq!(store[a].style.spacing, 0.0);
        assert_eq!(store[b].style.spacing, 5.0);
    }
}
