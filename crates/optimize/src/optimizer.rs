//! Optimizer pass

use cssforge_tree::{Document, ElementKind, Node, NodeId, NodeKind, Queryable, TreeResult};

use crate::options::OptimizeOptions;
use crate::shorthand::{merge_shorthand, SHORTHANDS};
use crate::values::{
    collapse_box_values, compress_background_position, compress_colors, compress_font_weight,
    compress_numbers,
};

/// What a run of the optimizer changed
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OptimizeStats {
    pub names_lowercased: usize,
    pub values_rewritten: usize,
    pub comments_removed: usize,
    pub ie_hacks_removed: usize,
    pub shorthands_merged: usize,
    pub groups_removed: usize,
}

/// Run every enabled rewrite over the document, in place.
///
/// Declarations are visited depth-first in document order; shorthand merging
/// and empty-group pruning run afterwards since they change the tree shape.
pub fn optimize(doc: &mut Document, options: &OptimizeOptions) -> TreeResult<OptimizeStats> {
    let mut stats = OptimizeStats::default();
    let root = doc.root();

    for id in doc.descendants(root) {
        let Some(node) = doc.get(id) else { continue };
        match &node.kind {
            NodeKind::Element(elem) if elem.kind == ElementKind::Comment => {
                if options.remove_comments && !elem.is_important_comment() {
                    doc.remove(id)?;
                    stats.comments_removed += 1;
                }
            }
            NodeKind::Property(_) => optimize_property(doc, id, options, &mut stats)?,
            _ => {}
        }
    }

    if options.merge_shorthands {
        for group in doc.descendants_where(root, Node::is_group) {
            for shorthand in SHORTHANDS {
                let Some(merged) = merge_shorthand(doc, group, shorthand)? else { continue };
                stats.shorthands_merged += 1;
                if options.compress_values {
                    let value = property_value(doc, merged);
                    doc.set_value(merged, compress_value(shorthand.name, &value))?;
                }
            }
        }
    }

    if options.remove_empty {
        stats.groups_removed = prune_empty_groups(doc)?;
    }

    log::debug!(
        "optimizer: {} values rewritten, {} comments and {} IE hacks removed, {} shorthands merged, {} empty groups pruned",
        stats.values_rewritten,
        stats.comments_removed,
        stats.ie_hacks_removed,
        stats.shorthands_merged,
        stats.groups_removed
    );
    Ok(stats)
}

fn property_value(doc: &Document, id: NodeId) -> String {
    doc.get(id)
        .and_then(|n| n.as_property())
        .map(|p| p.value.clone())
        .unwrap_or_default()
}

fn optimize_property(
    doc: &mut Document,
    id: NodeId,
    options: &OptimizeOptions,
    stats: &mut OptimizeStats,
) -> TreeResult<()> {
    let Some(property) = doc.get(id).and_then(|n| n.as_property()) else {
        return Ok(());
    };
    let mut name = property.name.clone();
    let value = property.value.clone();

    if options.lowercase_properties && !name.starts_with("--") {
        let lower = name.to_ascii_lowercase();
        if lower != name {
            doc.rename(id, lower.as_str())?;
            name = lower;
            stats.names_lowercased += 1;
        }
    }

    if options.remove_ie_hacks && is_ie_hack(&name, &value) {
        log::trace!("dropping IE hack {}: {}", name, value);
        doc.remove(id)?;
        stats.ie_hacks_removed += 1;
        return Ok(());
    }

    if options.compress_values {
        let compressed = compress_value(&name, &value);
        if compressed != value {
            log::trace!("{}: {} -> {}", name, value, compressed);
            doc.set_value(id, compressed)?;
            stats.values_rewritten += 1;
        }
    }
    Ok(())
}

/// Apply every value rewrite that fits the property
pub fn compress_value(name: &str, value: &str) -> String {
    let name = name.to_ascii_lowercase();
    // Custom properties hold arbitrary tokens; IE filters need full hex colors
    if name.starts_with("--") || name == "filter" || name == "-ms-filter" {
        return value.to_string();
    }

    let mut value = compress_font_weight(&name, value);
    if name == "background-position" {
        value = compress_background_position(&value);
    }
    value = compress_colors(&name, &value);
    value = compress_numbers(&name, &value);
    collapse_box_values(&name, &value)
}

/// Declarations only legacy Internet Explorer reads
fn is_ie_hack(name: &str, value: &str) -> bool {
    let lower_name = name.to_ascii_lowercase();
    let lower_value = value.trim().to_ascii_lowercase();

    name.starts_with('_')
        || name.starts_with('*')
        || lower_name == "filter"
        || lower_name == "-ms-filter"
        || lower_value.starts_with("expression")
        || lower_value.ends_with("\\9")
}

/// Remove groups without children, innermost first so that emptied
/// parents go too. The root is never removed.
fn prune_empty_groups(doc: &mut Document) -> TreeResult<usize> {
    let groups = doc.descendants_where(doc.root(), Node::is_group);
    let mut removed = 0;

    for group in groups.into_iter().rev() {
        let empty = doc.get(group).map(|n| n.children.is_empty()).unwrap_or(false);
        if empty {
            doc.remove(group)?;
            removed += 1;
        }
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cssforge_css::parse;

    fn run(css: &str, options: &OptimizeOptions) -> String {
        let mut doc = parse(css).unwrap();
        optimize(&mut doc, options).unwrap();
        doc.render(true)
    }

    #[test]
    fn test_color_compression() {
        let out = run(
            "a { color: #FFFFFF; background: rgb(0,0,0); border-color: hsl(0,100%,50%); outline-color: #112233 }",
            &OptimizeOptions::default(),
        );
        assert_eq!(out, "a{color:#fff;background:#000;border-color:#f00;outline-color:#112233}");
    }

    #[test]
    fn test_unit_compression() {
        let out = run(
            "a { width: 0.50px; height: 0px; margin: 10px 10px 10px 10px }",
            &OptimizeOptions::default(),
        );
        assert_eq!(out, "a{width:.5px;height:0;margin:10px}");
    }

    #[test]
    fn test_font_weight_keywords() {
        let out = run("a { font-weight: bold } b { font-weight: normal }", &OptimizeOptions::default());
        assert_eq!(out, "a{font-weight:700}b{font-weight:400}");
    }

    #[test]
    fn test_background_position_keywords() {
        let out = run("a { background-position: right top }", &OptimizeOptions::default());
        assert_eq!(out, "a{background-position:100% 0}");
    }

    #[test]
    fn test_shorthand_merge_without_compression() {
        let options = OptimizeOptions {
            compress_values: false,
            ..OptimizeOptions::default()
        };
        let out = run(
            "a { margin-left: 2px; margin-bottom: 1px; margin-top: 1px; margin-right: 2px; }",
            &options,
        );
        assert_eq!(out, "a{margin:1px 2px 1px 2px}");
    }

    #[test]
    fn test_shorthand_merge_is_compressed() {
        let out = run(
            "a { margin-top: 1px; margin-right: 2px; margin-bottom: 1px; margin-left: 2px; }",
            &OptimizeOptions::default(),
        );
        assert_eq!(out, "a{margin:1px 2px}");
    }

    #[test]
    fn test_partial_shorthand_untouched() {
        let out = run("a { margin-top: 1px; margin-right: 2px; }", &OptimizeOptions::default());
        assert_eq!(out, "a{margin-top:1px;margin-right:2px}");
    }

    #[test]
    fn test_ie_hacks_and_empty_rules() {
        let options = OptimizeOptions {
            remove_ie_hacks: true,
            ..OptimizeOptions::default()
        };
        let out = run(
            "a { filter: progid:DXImageTransform.Microsoft.Alpha(Opacity=80); }\n\
             b { color: red; *zoom: 1; _height: 1px; width: 10px\\9; height: expression(1 + 1) }\n\
             @media print { c { -ms-filter: \"alpha(opacity=50)\" } }\n\
             d { filter: blur(2px) }\n\
             e { color: blue }",
            &options,
        );
        assert_eq!(out, "b{color:red}e{color:blue}");
    }

    #[test]
    fn test_every_filter_is_an_ie_hack() {
        let options = OptimizeOptions {
            remove_ie_hacks: true,
            ..OptimizeOptions::default()
        };
        assert_eq!(run("a{filter:blur(2px)}b{color:red}", &options), "b{color:red}");
        assert_eq!(run("a{FILTER:none;color:red}", &options), "a{color:red}");
    }

    #[test]
    fn test_ie_hacks_kept_by_default() {
        let out = run("a { *zoom: 1; filter: progid:DXImageTransform.Microsoft.gradient(startColorstr='#FFFFFF') }", &OptimizeOptions::default());
        assert_eq!(out, "a{*zoom:1;filter:progid:DXImageTransform.Microsoft.gradient(startColorstr='#FFFFFF')}");
    }

    #[test]
    fn test_comments() {
        let out = run("/*! keep */ /* drop */ a { /* drop */ color: red }", &OptimizeOptions::default());
        assert_eq!(out, "/*! keep */a{color:red}");

        let options = OptimizeOptions {
            remove_comments: false,
            ..OptimizeOptions::default()
        };
        assert_eq!(run("/* x */ a { color: red }", &options), "/* x */a{color:red}");
    }

    #[test]
    fn test_lowercase_properties() {
        let out = run("a { COLOR: Red; --Brand-Color: #FFFFFF }", &OptimizeOptions::default());
        assert_eq!(out, "a{color:Red;--Brand-Color:#FFFFFF}");
    }

    #[test]
    fn test_empty_groups_pruned_recursively() {
        let out = run("@media print { a { } } b { }  c { color: red }", &OptimizeOptions::default());
        assert_eq!(out, "c{color:red}");

        let options = OptimizeOptions {
            remove_empty: false,
            ..OptimizeOptions::default()
        };
        assert_eq!(run("b { }", &options), "b{}");
    }

    #[test]
    fn test_everything_disabled_changes_nothing() {
        let css = "/* x */ a { COLOR: #FFFFFF; margin: 0px 0px; _zoom: 1 } b { }";
        let mut doc = parse(css).unwrap();
        let before = doc.render(true);
        let stats = optimize(&mut doc, &OptimizeOptions::none()).unwrap();
        assert_eq!(stats, OptimizeStats::default());
        assert_eq!(doc.render(true), before);
    }

    #[test]
    fn test_idempotent() {
        let css = "/* c */ a { COLOR: white; Margin-Top: 0.50em; margin-right: 0px; margin-bottom: .5em; margin-left: 0; \
                   font-weight: bold; background-position: center; border-radius: 4px 4px }\n\
                   @media screen { b { padding: 1px 1px 1px 1px; color: rgba(0, 0, 0, 0.5) } c { } }";
        let options = OptimizeOptions {
            remove_ie_hacks: true,
            ..OptimizeOptions::default()
        };
        let mut doc = parse(css).unwrap();
        optimize(&mut doc, &options).unwrap();
        let once = doc.render(true);

        let stats = optimize(&mut doc, &options).unwrap();
        assert_eq!(doc.render(true), once);
        assert_eq!(stats, OptimizeStats::default());
        assert_eq!(
            once,
            "a{color:#fff;margin:.5em 0;font-weight:700;background-position:50%;border-radius:4px}@media screen{b{padding:1px;color:rgba(0,0,0,.5)}}"
        );
    }
}
