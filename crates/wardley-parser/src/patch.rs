//! Surgical edits of map source.
//!
//! Moving an element on the canvas rewrites exactly one coordinate bracket.
//! The edit is located on the prepared source, so commented-out declarations
//! and pipeline bodies are never touched, and applied to the original bytes,
//! so comments, spacing and line endings everywhere else survive unchanged.

use std::ops::Range;

use log::debug;

use crate::{
    error::DiagnosticCollector,
    extract::{evolve_maturity_token, strip_keyword},
    source::{PreparedSource, SourceLine},
};

/// Keywords whose statements are `<keyword> <name> [<visibility>, <maturity>]`.
const POSITIONED_KEYWORDS: [&str; 5] = [
    "component",
    "anchor",
    "submap",
    "accelerator",
    "deaccelerator",
];

/// Rewrites the coordinates of the first statement declaring `name`.
///
/// Components, anchors, submaps and (de)accelerators match on their exact
/// name. Notes match when their text contains `name`. Only the interior of
/// the first `[ ... ]` after the name changes, to `"{visibility:.2},
/// {maturity:.2}"`. Returns `None` when no statement matches.
///
/// # Example
///
/// ```
/// # use wardley_parser::patch::update_position;
/// let source = "component Cup [0.73, 0.78] label [19, -4] // mug\r\nCup->Tea\r\n";
/// let patched = update_position(source, "Cup", 0.5, 0.25).unwrap();
/// assert_eq!(patched, "component Cup [0.50, 0.25] label [19, -4] // mug\r\nCup->Tea\r\n");
/// assert_eq!(update_position(source, "Tea", 0.5, 0.25), None);
/// ```
pub fn update_position(text: &str, name: &str, visibility: f64, maturity: f64) -> Option<String> {
    let replacement = format!("{visibility:.2}, {maturity:.2}");
    let (line, range) = find_in_lines(text, |line| position_bracket(line.blanked(), name))?;
    debug!(name, line; "Patched element position");
    Some(splice(text, range, &replacement))
}

/// Rewrites the maturity of the `evolve` statement for `name`.
///
/// `name` matches either `evolve <name> <m>` or `evolve <name>-><new> <m>`.
/// The rewritten token is the last numeric token before the first clause
/// keyword (`label`, `url`, `inertia` or a `(` decorator), the same token the
/// extractor reads. Numbers earlier in the line belong to the name, so
/// `evolve Web 2.0 0.8` rewrites `0.8`. Integer tokens such as `1` count as
/// numbers and are rewritten in the usual two-decimal form.
///
/// # Example
///
/// ```
/// # use wardley_parser::patch::update_evolve_maturity;
/// let source = "evolve Kettle->Electric Kettle 0.62 label [16, 5]";
/// assert_eq!(
///     update_evolve_maturity(source, "Kettle", 0.7).as_deref(),
///     Some("evolve Kettle->Electric Kettle 0.70 label [16, 5]"),
/// );
/// ```
pub fn update_evolve_maturity(text: &str, name: &str, maturity: f64) -> Option<String> {
    let replacement = format!("{maturity:.2}");
    let (line, range) = find_in_lines(text, |line| evolve_token(line.blanked(), name))?;
    debug!(name, line; "Patched evolve maturity");
    Some(splice(text, range, &replacement))
}

/// Like [`update_position`], but hands the source back unchanged when no
/// statement declares `name`.
pub fn apply_position_edit(source: &str, name: &str, visibility: f64, maturity: f64) -> String {
    update_position(source, name, visibility, maturity).unwrap_or_else(|| source.to_string())
}

/// Finds the first line for which `locate` yields a range, returning the
/// line number and the range rebased onto `text`.
fn find_in_lines(
    text: &str,
    locate: impl Fn(&SourceLine) -> Option<Range<usize>>,
) -> Option<(usize, Range<usize>)> {
    let mut diagnostics = DiagnosticCollector::new();
    let prepared = PreparedSource::prepare(text, &mut diagnostics);
    prepared.lines().iter().find_map(|line| {
        let start = line.span().start();
        locate(line).map(|range| (line.number(), start + range.start..start + range.end))
    })
}

fn splice(text: &str, range: Range<usize>, replacement: &str) -> String {
    let mut out = String::with_capacity(text.len() + replacement.len());
    out.push_str(&text[..range.start]);
    out.push_str(replacement);
    out.push_str(&text[range.end..]);
    out
}

/// Range of the bracket interior in a line declaring `name`.
fn position_bracket(line: &str, name: &str) -> Option<Range<usize>> {
    let after_name = POSITIONED_KEYWORDS
        .iter()
        .find_map(|keyword| {
            let rest = strip_keyword(line, keyword)?.trim_start();
            let after = rest.strip_prefix(name)?;
            after.trim_start().starts_with('[').then_some(after)
        })
        .or_else(|| {
            let rest = strip_keyword(line, "note")?;
            let open = rest.find('[')?;
            rest[..open].contains(name).then_some(&rest[open..])
        })?;

    let offset = line.len() - after_name.len();
    let open = offset + after_name.find('[')?;
    let close = open + line[open..].find(']')?;
    Some(open + 1..close)
}

/// Range of the maturity token in an `evolve` line for `name`.
fn evolve_token(line: &str, name: &str) -> Option<Range<usize>> {
    let rest = strip_keyword(line, "evolve")?;
    let token = evolve_maturity_token(rest)?;
    let head = rest[..token.start].trim();
    let evolved = head.split_once("->").map_or(head, |(evolved, _)| evolved.trim());
    if evolved != name {
        return None;
    }
    let offset = line.len() - rest.len();
    Some(offset + token.start..offset + token.end)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    const TEA_SHOP: &str = "title Tea Shop\r\n\
        anchor Business [0.95, 0.63]\r\n\
        // component Cup [0.10, 0.10]\r\n\
        component Cup of Tea [0.79, 0.61] label [19, -4]\r\n\
        component Cup [0.73, 0.78]\r\n\
        note +a generally rising market [0.31, 0.53]\r\n\
        pipeline Kettle {\r\n\
        \x20 component Cup [0.50]\r\n\
        }\r\n\
        evolve Kettle->Electric Kettle 0.62 label [16, 5]\r\n\
        Cup->Tea\r\n";

    #[test]
    fn test_exact_name_and_boundary() {
        let patched = update_position(TEA_SHOP, "Cup", 0.5, 0.25).unwrap();
        assert!(patched.contains("component Cup [0.50, 0.25]\r\n"));
        assert!(patched.contains("component Cup of Tea [0.79, 0.61] label [19, -4]"));
        assert!(patched.contains("// component Cup [0.10, 0.10]"));
        assert!(patched.contains("  component Cup [0.50]\r\n"));
        assert_eq!(patched.len(), TEA_SHOP.len());
    }

    #[test]
    fn test_name_with_spaces() {
        let patched = update_position(TEA_SHOP, "Cup of Tea", 0.123, 0.987).unwrap();
        assert!(patched.contains("component Cup of Tea [0.12, 0.99] label [19, -4]"));
    }

    #[test]
    fn test_anchor_and_note() {
        let patched = update_position(TEA_SHOP, "Business", 0.9, 0.6).unwrap();
        assert!(patched.contains("anchor Business [0.90, 0.60]"));

        let patched = update_position(TEA_SHOP, "rising market", 0.3, 0.5).unwrap();
        assert!(patched.contains("note +a generally rising market [0.30, 0.50]"));
    }

    #[test]
    fn test_touching_bracket() {
        let patched = update_position("accelerator Open Source[0.5,0.6]", "Open Source", 0.1, 0.2);
        assert_eq!(patched.as_deref(), Some("accelerator Open Source[0.10, 0.20]"));
    }

    #[test]
    fn test_no_match() {
        assert_eq!(update_position(TEA_SHOP, "Kettle", 0.5, 0.5), None);
        assert_eq!(update_position(TEA_SHOP, "Cu", 0.5, 0.5), None);
        assert_eq!(update_position("component Cup", "Cup", 0.5, 0.5), None);
        assert_eq!(apply_position_edit(TEA_SHOP, "Kettle", 0.5, 0.5), TEA_SHOP);
    }

    #[test]
    fn test_evolve_maturity() {
        let patched = update_evolve_maturity(TEA_SHOP, "Kettle", 0.7).unwrap();
        assert!(patched.contains("evolve Kettle->Electric Kettle 0.70 label [16, 5]\r\n"));

        let patched = update_evolve_maturity("evolve Web 2.0 0.8 (market)", "Web 2.0", 0.9);
        assert_eq!(patched.as_deref(), Some("evolve Web 2.0 0.90 (market)"));

        let patched = update_evolve_maturity("evolve Kettle 1 label [16, 5]", "Kettle", 0.85);
        assert_eq!(patched.as_deref(), Some("evolve Kettle 0.85 label [16, 5]"));

        assert_eq!(update_evolve_maturity(TEA_SHOP, "Electric Kettle", 0.7), None);
        assert_eq!(update_evolve_maturity(TEA_SHOP, "Cup", 0.7), None);
    }

    proptest! {
        #[test]
        fn prop_patch_touches_only_target_line(
            v in 0.0f64..1.0,
            m in 0.0f64..1.0,
        ) {
            let patched = update_position(TEA_SHOP, "Cup", v, m).unwrap();
            let before: Vec<&str> = TEA_SHOP.split("\r\n").collect();
            let after: Vec<&str> = patched.split("\r\n").collect();
            prop_assert_eq!(before.len(), after.len());
            let changed: Vec<usize> = (0..before.len()).filter(|&i| before[i] != after[i]).collect();
            prop_assert!(changed.len() <= 1);
            if let Some(&i) = changed.first() {
                prop_assert_eq!(i, 4);
            }
        }

        #[test]
        fn prop_patch_is_idempotent(v in 0.0f64..1.0, m in 0.0f64..1.0) {
            let once = update_position(TEA_SHOP, "Cup", v, m).unwrap();
            let twice = update_position(&once, "Cup", v, m).unwrap();
            prop_assert_eq!(once, twice);
        }
    }
}
