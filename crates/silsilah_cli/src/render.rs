//! Plain-text rendering of trees, details and diagnostics.

use silsilah_core::{DataOrigin, FamilyTree, LoadedTree, PersonDetail, PersonNode};
use std::fmt::Write;

/// Draws the tree with box-drawing connectors, one person per line.
pub fn render_tree(tree: &FamilyTree, show_spouses: bool) -> String {
    let mut out = String::new();
    push_person(&mut out, tree.root(), show_spouses);
    let mut stack: Vec<(&PersonNode, String, bool)> = tree
        .root()
        .children()
        .iter()
        .enumerate()
        .rev()
        .map(|(index, child)| (child, String::new(), index + 1 == tree.root().children().len()))
        .collect();

    while let Some((node, prefix, last)) = stack.pop() {
        out.push_str(&prefix);
        out.push_str(if last { "└── " } else { "├── " });
        push_person(&mut out, node, show_spouses);

        let child_prefix = format!("{prefix}{}", if last { "    " } else { "│   " });
        let count = node.children().len();
        for (index, child) in node.children().iter().enumerate().rev() {
            stack.push((child, child_prefix.clone(), index + 1 == count));
        }
    }
    out
}

fn push_person(out: &mut String, node: &PersonNode, show_spouses: bool) {
    let record = node.record();
    let _ = write!(out, "{} [{}]", record.titled_name(), node.id());
    let birth = record.birth_year.as_deref().unwrap_or("?");
    match record.death_year.as_deref() {
        Some(death) => {
            let _ = write!(out, " ({birth}-{death})");
        }
        None if record.birth_year.is_some() => {
            let _ = write!(out, " ({birth})");
        }
        None => {}
    }
    if show_spouses {
        if let Some(spouse) = node.spouse() {
            let _ = write!(out, " ♥ {}", spouse.name);
        }
    }
    out.push('\n');
}

pub fn render_detail(detail: &PersonDetail) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{} [{}]", detail.name, detail.id);
    let _ = writeln!(out, "  Status      : {}", detail.status.label());
    let _ = writeln!(out, "  Gender      : {}", detail.gender);
    let _ = writeln!(out, "  Bin/Binti   : {}", detail.patronymic);
    let _ = writeln!(
        out,
        "  Lahir       : {}, {}",
        detail.birth_place, detail.birth_year
    );
    if let Some(death) = &detail.death {
        let _ = writeln!(out, "  Wafat       : {death}");
    }
    let _ = writeln!(out, "  Alamat      : {}", detail.address);
    let _ = writeln!(out, "  No. HP      : {}", detail.phone);
    let _ = writeln!(out, "  Anak        : {}", detail.children);
    if let Some(spouse) = &detail.spouse {
        let _ = writeln!(out, "  Pasangan    : {}", spouse.name);
    }
    let _ = writeln!(out, "  Foto        : {}", detail.photo_url);
    let _ = writeln!(out, "  Bio         : {}", detail.bio);
    out
}

pub fn render_origin(origin: &DataOrigin) -> String {
    match origin {
        DataOrigin::Source { source_id } => format!("source: {source_id}"),
        DataOrigin::Fixture { reason } => format!("source: fixture (demo data; {reason})"),
    }
}

pub fn render_check(loaded: &LoadedTree) -> String {
    let resolution = &loaded.resolution;
    let diagnostics = &resolution.diagnostics;
    let mut out = String::new();
    let _ = writeln!(out, "{}", render_origin(&loaded.origin));
    let _ = writeln!(out, "records      : {}", loaded.record_count);
    let _ = writeln!(
        out,
        "root         : {} [{}]",
        resolution.tree.root().record().display_name(),
        resolution.tree.root().id()
    );
    let _ = writeln!(out, "reachable    : {}", resolution.tree.len());
    let _ = writeln!(out, "discarded    : {}", diagnostics.discarded_records());
    for root in &diagnostics.discarded_roots {
        let _ = writeln!(
            out,
            "  orphan root {} ({} record(s) dropped)",
            root.id, root.subtree_size
        );
    }
    for shadowed in &diagnostics.shadowed_names {
        let _ = writeln!(
            out,
            "  name `{}` of {} is shadowed by {}",
            shadowed.key, shadowed.shadowed_id, shadowed.kept_id
        );
    }
    out
}
