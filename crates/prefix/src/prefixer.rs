//! Vendor prefixer pass

use cssforge_css::syntax::{split_top_level_commas, split_top_level_whitespace};
use cssforge_tree::{split_important, Document, NodeId, Queryable};

use crate::error::PrefixResult;
use crate::gradient::{has_gradient, ie_gradient_filter, vendor_gradient};
use crate::options::{PrefixOptions, Vendor};
use crate::table::{lookup, validate_table, vendor_name, Transform};

/// What a run of the prefixer added
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PrefixStats {
    pub declarations_inserted: usize,
    pub keyframes_cloned: usize,
}

/// How an existing sibling blocks a candidate declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dedupe {
    /// Any sibling with the same name
    Name,
    /// A sibling with the same name and value
    Declaration,
}

#[derive(Debug)]
struct Candidate {
    name: String,
    value: String,
    dedupe: Dedupe,
}

impl Candidate {
    fn new(name: impl Into<String>, value: impl Into<String>, dedupe: Dedupe) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            dedupe,
        }
    }

    fn exists_beside(&self, doc: &Document, id: NodeId) -> bool {
        match self.dedupe {
            Dedupe::Name => doc.find_sibling(id, &self.name).is_some(),
            Dedupe::Declaration => doc.has_sibling_declaration(id, &self.name, &self.value),
        }
    }
}

/// Add vendor-prefixed declarations and `@keyframes` blocks for every
/// enabled vendor. Prefixed copies go right before the declaration they were
/// made from, so the standard one is still the last to apply.
pub fn add_vendor_prefixes(doc: &mut Document, options: &PrefixOptions) -> PrefixResult<PrefixStats> {
    validate_table()?;

    let mut stats = PrefixStats::default();
    let root = doc.root();
    prefix_subtree(doc, root, options, false, &mut stats)?;

    log::debug!(
        "prefixer: {} declarations inserted, {} keyframes blocks cloned",
        stats.declarations_inserted,
        stats.keyframes_cloned
    );
    Ok(stats)
}

/// Walk everything below `top`. Inside a keyframes clone every declaration
/// is prefixed; elsewhere keyframes bodies are left alone.
fn prefix_subtree(
    doc: &mut Document,
    top: NodeId,
    vendors: &PrefixOptions,
    in_clone: bool,
    stats: &mut PrefixStats,
) -> PrefixResult<()> {
    for id in doc.descendants(top) {
        let Some(node) = doc.get(id) else { continue };
        let keyframes = node
            .as_group()
            .map(|g| g.at_keyword().as_deref() == Some("keyframes"))
            .unwrap_or(false);
        let property = node.is_property();

        if keyframes && !in_clone && !inside_keyframes(doc, id) {
            clone_keyframes(doc, id, vendors, stats)?;
        } else if property && (in_clone || !inside_keyframes(doc, id)) {
            prefix_declaration(doc, id, vendors, stats)?;
        }
    }
    Ok(())
}

fn inside_keyframes(doc: &Document, id: NodeId) -> bool {
    doc.ancestors(id).into_iter().any(|ancestor| {
        doc.get(ancestor)
            .and_then(|n| n.as_group())
            .map(|g| g.is_keyframes())
            .unwrap_or(false)
    })
}

/// Clone `@keyframes name` once per vendor as `@-vendor-keyframes name`,
/// placed after the original in vendor order, and prefix the clone for
/// that vendor alone.
fn clone_keyframes(
    doc: &mut Document,
    id: NodeId,
    vendors: &PrefixOptions,
    stats: &mut PrefixStats,
) -> PrefixResult<()> {
    let Some(header) = doc.get(id).and_then(|n| n.as_group()).map(|g| g.name.clone()) else {
        return Ok(());
    };
    let rest = header.get("@keyframes".len()..).unwrap_or("");

    let mut anchor = id;
    // Internet Explorer never shipped a prefixed @keyframes
    for vendor in vendors.vendors().filter(|&v| v != Vendor::Microsoft) {
        let name = format!("@{}keyframes{}", vendor.prefix(), rest);
        if doc.find_sibling(id, &name).is_some() {
            continue;
        }

        let clone = doc.clone_subtree(id)?;
        doc.rename(clone, name.as_str())?;
        doc.insert_after(anchor, clone)?;
        anchor = clone;
        stats.keyframes_cloned += 1;
        log::trace!("cloned {} as {}", header, name);

        prefix_subtree(doc, clone, &PrefixOptions::only(vendor), true, stats)?;
    }
    Ok(())
}

/// Prefix one declaration. Inserted declarations go back through the
/// table, so whatever they need in turn is added in the same run.
fn prefix_declaration(
    doc: &mut Document,
    source: NodeId,
    vendors: &PrefixOptions,
    stats: &mut PrefixStats,
) -> PrefixResult<()> {
    let mut pending = vec![source];

    while let Some(id) = pending.pop() {
        let Some(property) = doc.get(id).and_then(|n| n.as_property()) else {
            continue;
        };
        let name = property.name.clone();
        let value = property.value.clone();

        for candidate in candidates(&name, &value, vendors) {
            if candidate.exists_beside(doc, id) {
                continue;
            }
            log::trace!("{}: adding {}: {}", name, candidate.name, candidate.value);
            let copy = doc.create_property(candidate.name, candidate.value);
            doc.insert_before(id, copy)?;
            stats.declarations_inserted += 1;
            pending.push(copy);
        }
    }
    Ok(())
}

/// Declarations the table asks for, in vendor slot order
fn candidates(name: &str, value: &str, vendors: &PrefixOptions) -> Vec<Candidate> {
    let lower = name.to_ascii_lowercase();
    match lookup(&lower) {
        Some(Transform::Rename(slots)) => vendors
            .vendors()
            .filter_map(|vendor| {
                slots[vendor.index()].map(|prefixed| {
                    Candidate::new(prefixed, vendor_value(&lower, value, vendor), Dedupe::Name)
                })
            })
            .collect(),
        Some(Transform::Special(transform)) => transform(value, vendors)
            .into_iter()
            .map(|(name, value)| Candidate::new(name, value, Dedupe::Declaration))
            .collect(),
        None if has_gradient(value) => gradient_candidates(name, value, vendors),
        None => Vec::new(),
    }
}

/// Value for a renamed copy: legacy gradient syntax, and for transitions the
/// vendor spelling of the properties being transitioned
fn vendor_value(name: &str, value: &str, vendor: Vendor) -> String {
    let value = vendor_gradient(value, vendor).unwrap_or_else(|| value.to_string());
    match name {
        "transition" | "transition-property" => prefix_transitioned_properties(&value, vendor),
        _ => value,
    }
}

fn prefix_transitioned_properties(value: &str, vendor: Vendor) -> String {
    let (body, important) = split_important(value);
    let mut changed = false;

    let layers: Vec<String> = split_top_level_commas(body)
        .into_iter()
        .map(|layer| {
            split_top_level_whitespace(layer)
                .into_iter()
                .map(|word| match vendor_name(&word.to_ascii_lowercase(), vendor) {
                    Some(prefixed) => {
                        changed = true;
                        prefixed
                    }
                    None => word,
                })
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();

    if !changed {
        return value.to_string();
    }
    let joined = layers.join(", ");
    if important {
        format!("{} !important", joined)
    } else {
        joined
    }
}

/// Same property with each vendor's gradient syntax, plus the Internet
/// Explorer gradient filter when the stops allow it
fn gradient_candidates(name: &str, value: &str, vendors: &PrefixOptions) -> Vec<Candidate> {
    let mut out: Vec<Candidate> = vendors
        .vendors()
        .filter(|&v| v != Vendor::Microsoft)
        .filter_map(|vendor| vendor_gradient(value, vendor))
        .map(|legacy| Candidate::new(name, legacy, Dedupe::Declaration))
        .collect();

    if vendors.microsoft {
        if let Some(filter) = ie_gradient_filter(value) {
            out.push(Candidate::new("filter", filter, Dedupe::Name));
        }
    }
    out
}
