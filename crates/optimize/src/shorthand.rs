//! Shorthand merging
//!
//! When a rule sets every longhand of a shorthand exactly once, the
//! longhands are replaced by one shorthand declaration.

use cssforge_css::syntax::split_top_level_commas;
use cssforge_tree::{Document, NodeId, Queryable, TreeResult};

/// A shorthand and its longhands in serialization order. Each longhand
/// carries the separator written before its value.
#[derive(Debug)]
pub struct Shorthand {
    pub name: &'static str,
    pub longhands: &'static [(&'static str, &'static str)],
}

pub static SHORTHANDS: &[Shorthand] = &[
    Shorthand {
        name: "margin",
        longhands: &[
            ("margin-top", ""),
            ("margin-right", " "),
            ("margin-bottom", " "),
            ("margin-left", " "),
        ],
    },
    Shorthand {
        name: "padding",
        longhands: &[
            ("padding-top", ""),
            ("padding-right", " "),
            ("padding-bottom", " "),
            ("padding-left", " "),
        ],
    },
    Shorthand {
        name: "border-width",
        longhands: &[
            ("border-top-width", ""),
            ("border-right-width", " "),
            ("border-bottom-width", " "),
            ("border-left-width", " "),
        ],
    },
    Shorthand {
        name: "border-radius",
        longhands: &[
            ("border-top-left-radius", ""),
            ("border-top-right-radius", " "),
            ("border-bottom-right-radius", " "),
            ("border-bottom-left-radius", " "),
        ],
    },
    Shorthand {
        name: "list-style",
        longhands: &[
            ("list-style-type", ""),
            ("list-style-position", " "),
            ("list-style-image", " "),
        ],
    },
    Shorthand {
        name: "font",
        longhands: &[
            ("font-style", ""),
            ("font-variant", " "),
            ("font-weight", " "),
            ("font-size", " "),
            ("line-height", "/"),
            ("font-family", " "),
        ],
    },
    Shorthand {
        name: "background",
        longhands: &[
            ("background-color", ""),
            ("background-image", " "),
            ("background-repeat", " "),
            ("background-attachment", " "),
            ("background-position", " "),
        ],
    },
];

const GLOBAL_KEYWORDS: &[&str] = &["inherit", "initial", "unset", "revert", "revert-layer"];

/// Whether a longhand value can be folded into a shorthand
fn mergeable(shorthand: &Shorthand, value: &str) -> bool {
    let lower = value.trim().to_ascii_lowercase();
    if lower.contains('!') || lower.contains("var(") || GLOBAL_KEYWORDS.contains(&lower.as_str()) {
        return false;
    }
    match shorthand.name {
        // Multiple layers cannot be merged positionally
        "background" => split_top_level_commas(&lower).len() == 1,
        // Elliptical corners need the `/` syntax
        "border-radius" => !lower.contains(' ') && !lower.contains('/'),
        _ => true,
    }
}

/// Merge one shorthand inside `group`. Returns the new declaration, if any.
pub fn merge_shorthand(doc: &mut Document, group: NodeId, shorthand: &Shorthand) -> TreeResult<Option<NodeId>> {
    let properties = doc.properties_of(group);
    let mut found: Vec<(NodeId, String)> = Vec::with_capacity(shorthand.longhands.len());

    for (longhand, _) in shorthand.longhands {
        let matches: Vec<NodeId> = properties
            .iter()
            .copied()
            .filter(|&id| {
                doc.get(id)
                    .and_then(|n| n.as_property())
                    .map(|p| p.name.eq_ignore_ascii_case(longhand))
                    .unwrap_or(false)
            })
            .collect();

        // Exactly once, otherwise merging would change which one wins
        let [id] = matches.as_slice() else {
            return Ok(None);
        };
        let value = match doc.get(*id).and_then(|n| n.as_property()) {
            Some(p) if mergeable(shorthand, &p.value) => p.value.clone(),
            _ => return Ok(None),
        };
        found.push((*id, value));
    }

    let shadowed = properties.iter().any(|&id| {
        doc.get(id)
            .and_then(|n| n.as_property())
            .map(|p| p.name.eq_ignore_ascii_case(shorthand.name))
            .unwrap_or(false)
    });
    if shadowed {
        return Ok(None);
    }

    let mut merged = String::new();
    for ((_, value), (_, separator)) in found.iter().zip(shorthand.longhands) {
        merged.push_str(separator);
        merged.push_str(value);
    }

    let first = properties
        .iter()
        .copied()
        .find(|id| found.iter().any(|(f, _)| f == id))
        .unwrap_or(found[0].0);

    let combined = doc.create_property(shorthand.name, merged);
    doc.insert_before(first, combined)?;
    for (id, _) in found {
        doc.remove(id)?;
    }

    log::trace!("merged {} longhands into {}", shorthand.longhands.len(), shorthand.name);
    Ok(Some(combined))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(decls: &[(&str, &str)]) -> (Document, NodeId) {
        let mut doc = Document::new();
        let group = doc.create_group("a");
        doc.append_child(doc.root(), group).unwrap();
        for (name, value) in decls {
            let p = doc.create_property(*name, *value);
            doc.append_child(group, p).unwrap();
        }
        (doc, group)
    }

    fn shorthand(name: &str) -> &'static Shorthand {
        SHORTHANDS.iter().find(|s| s.name == name).unwrap()
    }

    #[test]
    fn test_merge_margin_any_order() {
        let (mut doc, group) = rule(&[
            ("color", "red"),
            ("margin-left", "2px"),
            ("margin-top", "1px"),
            ("margin-bottom", "1px"),
            ("margin-right", "2px"),
        ]);
        let merged = merge_shorthand(&mut doc, group, shorthand("margin")).unwrap();
        assert!(merged.is_some());
        assert_eq!(doc.render(true), "a{color:red;margin:1px 2px 1px 2px}");
    }

    #[test]
    fn test_missing_longhand_skips() {
        let (mut doc, group) = rule(&[("margin-top", "1px"), ("margin-right", "2px"), ("margin-bottom", "1px")]);
        assert!(merge_shorthand(&mut doc, group, shorthand("margin")).unwrap().is_none());
        assert_eq!(doc.properties_of(group).len(), 3);
    }

    #[test]
    fn test_duplicate_longhand_skips() {
        let (mut doc, group) = rule(&[
            ("padding-top", "1px"),
            ("padding-top", "3px"),
            ("padding-right", "2px"),
            ("padding-bottom", "1px"),
            ("padding-left", "2px"),
        ]);
        assert!(merge_shorthand(&mut doc, group, shorthand("padding")).unwrap().is_none());
    }

    #[test]
    fn test_important_and_keywords_skip() {
        let (mut doc, group) = rule(&[
            ("margin-top", "1px !important"),
            ("margin-right", "2px"),
            ("margin-bottom", "1px"),
            ("margin-left", "2px"),
        ]);
        assert!(merge_shorthand(&mut doc, group, shorthand("margin")).unwrap().is_none());

        let (mut doc, group) = rule(&[
            ("margin-top", "inherit"),
            ("margin-right", "2px"),
            ("margin-bottom", "1px"),
            ("margin-left", "2px"),
        ]);
        assert!(merge_shorthand(&mut doc, group, shorthand("margin")).unwrap().is_none());
    }

    #[test]
    fn test_existing_shorthand_skips() {
        let (mut doc, group) = rule(&[
            ("margin-top", "1px"),
            ("margin", "0"),
            ("margin-right", "2px"),
            ("margin-bottom", "1px"),
            ("margin-left", "2px"),
        ]);
        assert!(merge_shorthand(&mut doc, group, shorthand("margin")).unwrap().is_none());
    }

    #[test]
    fn test_font_uses_slash_for_line_height() {
        let (mut doc, group) = rule(&[
            ("font-style", "italic"),
            ("font-variant", "normal"),
            ("font-weight", "700"),
            ("font-size", "12px"),
            ("line-height", "1.5"),
            ("font-family", "Arial, sans-serif"),
        ]);
        merge_shorthand(&mut doc, group, shorthand("font")).unwrap();
        assert_eq!(doc.render(true), "a{font:italic normal 700 12px/1.5 Arial,sans-serif}");
    }

    #[test]
    fn test_background_layers_skip() {
        let (mut doc, group) = rule(&[
            ("background-color", "#fff"),
            ("background-image", "url(a.png), url(b.png)"),
            ("background-repeat", "no-repeat"),
            ("background-attachment", "scroll"),
            ("background-position", "0 0"),
        ]);
        assert!(merge_shorthand(&mut doc, group, shorthand("background")).unwrap().is_none());
    }
}
