//! XLIFF 1.2 exchange adapter: streaming parse into a [`UnitStore`] and
//! serialization back out.
//!
//! The adapter owns everything format-specific: namespace declarations, the
//! `<file>` attribute envelope, raw `<header>` blocks, and the mapping
//! between translation slots and element names (`target`, `target-classic`,
//! ...). The reconciliation engine only ever sees the record model.

use std::io::Write;
use std::path::Path;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use xliffkit_core::{
    ConflictPolicy, FileGroup, GroupMeta, Result, TransUnit, UnitStore, XliffError, TARGET_SLOT,
};

pub const XLIFF_NS: &str = "urn:oasis:names:tc:xliff:document:1.2";
pub const XLIFF_VERSION: &str = "1.2";

/// Which child of a `trans-unit` the parser is currently inside.
enum Field {
    Source,
    Note,
    Slot(String),
}

fn local_name_of(name: &[u8]) -> String {
    let name = String::from_utf8_lossy(name);
    match name.rsplit_once(':') {
        Some((_, local)) => local.to_string(),
        None => name.into_owned(),
    }
}

/// Adopt a parsed `<file>` element. A repeat of an already-seen `original`
/// merges unit-by-unit instead of replacing: the earlier element keeps its
/// envelope and wins id conflicts.
fn adopt_group(store: &mut UnitStore, group: FileGroup) {
    if store.group(&group.original).is_some() {
        let path = group.original.clone();
        let meta = group.meta.clone();
        for unit in group.into_units() {
            store.insert_or_skip(&path, unit, &meta, ConflictPolicy::KeepFirst);
        }
    } else {
        store.insert_group(group);
    }
}

fn attrs_of(e: &BytesStart) -> std::result::Result<Vec<(String, String)>, XliffError> {
    let mut out = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| XliffError::MalformedDocument(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|err| XliffError::MalformedDocument(err.to_string()))?
            .into_owned();
        out.push((key, value));
    }
    Ok(out)
}

/// Parse an XLIFF 1.2 document into a [`UnitStore`].
///
/// Fails with [`XliffError::MalformedDocument`] on XML-level errors and
/// [`XliffError::SchemaMismatch`] when the markup is well-formed but not the
/// XLIFF shape we expect (wrong root, `<file>` without `original`, no
/// `<file>` elements at all). `trans-unit` elements without an id are
/// skipped with a warning, matching how they would be unreachable for every
/// reconciliation operation anyway. Repeated `<file>` elements naming the
/// same `original` merge keep-first into one group.
pub fn parse_xliff(xml: &str) -> std::result::Result<UnitStore, XliffError> {
    // No text trimming: whitespace inside <source>/<target> is content,
    // format strings like " %@ " included. Indentation between elements is
    // ignored below because no field is open when it arrives.
    let mut reader = Reader::from_str(xml);

    let mut store = UnitStore::new();
    let mut saw_root = false;
    let mut saw_file = false;
    let mut group: Option<FileGroup> = None;
    let mut unit: Option<TransUnit> = None;
    let mut field: Option<Field> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                let name = local_name_of(e.name().as_ref());
                if !saw_root {
                    if name != "xliff" {
                        return Err(XliffError::SchemaMismatch(format!(
                            "expected <xliff> root, found <{name}>"
                        )));
                    }
                    saw_root = true;
                    store.doc_attrs = attrs_of(&e)?;
                } else if group.is_none() {
                    if name == "file" {
                        let attrs = attrs_of(&e)?;
                        let original = attrs
                            .iter()
                            .find(|(k, _)| k == "original")
                            .map(|(_, v)| v.clone())
                            .filter(|v| !v.is_empty())
                            .ok_or_else(|| {
                                XliffError::SchemaMismatch(
                                    "<file> element without an original attribute".into(),
                                )
                            })?;
                        saw_file = true;
                        group = Some(FileGroup::new(original, GroupMeta { attrs, header_xml: None }));
                    }
                } else if unit.is_none() {
                    match name.as_str() {
                        "header" => {
                            let raw = reader
                                .read_text(e.name())
                                .map_err(|err| XliffError::MalformedDocument(err.to_string()))?;
                            if let Some(g) = group.as_mut() {
                                g.meta.header_xml = Some(raw.trim().to_string());
                            }
                        }
                        "body" => {}
                        "trans-unit" => {
                            let attrs = attrs_of(&e)?;
                            let id = attrs
                                .iter()
                                .find(|(k, _)| k == "id")
                                .map(|(_, v)| v.clone())
                                .filter(|v| !v.is_empty());
                            match id {
                                Some(id) => {
                                    let mut u = TransUnit::new(id);
                                    u.attrs = attrs.into_iter().filter(|(k, _)| k != "id").collect();
                                    unit = Some(u);
                                }
                                None => {
                                    eprintln!("[xliffkit] WARN: skipping trans-unit without id");
                                    reader
                                        .read_to_end(e.name())
                                        .map_err(|err| XliffError::MalformedDocument(err.to_string()))?;
                                }
                            }
                        }
                        // group wrappers etc. carry no unit content of their own
                        _ => {}
                    }
                } else if field.is_some() {
                    // Inline markup inside source/target is not modeled;
                    // keep the surrounding text only, like the original tools.
                    reader
                        .read_to_end(e.name())
                        .map_err(|err| XliffError::MalformedDocument(err.to_string()))?;
                } else {
                    field = Some(match name.as_str() {
                        "source" => Field::Source,
                        "note" => Field::Note,
                        other => Field::Slot(other.to_string()),
                    });
                }
            }
            Ok(Event::Empty(e)) => {
                let name = local_name_of(e.name().as_ref());
                if saw_root && group.is_none() && name == "file" {
                    let attrs = attrs_of(&e)?;
                    if let Some(original) = attrs
                        .iter()
                        .find(|(k, _)| k == "original")
                        .map(|(_, v)| v.clone())
                        .filter(|v| !v.is_empty())
                    {
                        saw_file = true;
                        adopt_group(&mut store, FileGroup::new(original, GroupMeta { attrs, header_xml: None }));
                    } else {
                        return Err(XliffError::SchemaMismatch(
                            "<file> element without an original attribute".into(),
                        ));
                    }
                } else if group.is_some() && unit.is_none() && name == "trans-unit" {
                    // A childless unit still counts; only its texts are absent.
                    let attrs = attrs_of(&e)?;
                    if let Some(id) = attrs
                        .iter()
                        .find(|(k, _)| k == "id")
                        .map(|(_, v)| v.clone())
                        .filter(|v| !v.is_empty())
                    {
                        let mut u = TransUnit::new(id);
                        u.attrs = attrs.into_iter().filter(|(k, _)| k != "id").collect();
                        if let Some(g) = group.as_mut() {
                            g.insert(u, ConflictPolicy::KeepFirst);
                        }
                    } else {
                        eprintln!("[xliffkit] WARN: skipping trans-unit without id");
                    }
                }
                // Other empty children (<target/>, <header/>) contribute nothing.
            }
            Ok(Event::Text(t)) => {
                if let (Some(u), Some(f)) = (unit.as_mut(), field.as_ref()) {
                    let text = t
                        .unescape()
                        .map_err(|err| XliffError::MalformedDocument(err.to_string()))?;
                    match f {
                        Field::Source => u.source.get_or_insert_with(String::new).push_str(&text),
                        Field::Note => u.note.get_or_insert_with(String::new).push_str(&text),
                        Field::Slot(name) => u
                            .translations
                            .entry(name.clone())
                            .or_default()
                            .push_str(&text),
                    }
                }
            }
            Ok(Event::CData(t)) => {
                if let (Some(u), Some(f)) = (unit.as_mut(), field.as_ref()) {
                    let text = String::from_utf8_lossy(&t).into_owned();
                    match f {
                        Field::Source => u.source.get_or_insert_with(String::new).push_str(&text),
                        Field::Note => u.note.get_or_insert_with(String::new).push_str(&text),
                        Field::Slot(name) => u
                            .translations
                            .entry(name.clone())
                            .or_default()
                            .push_str(&text),
                    }
                }
            }
            Ok(Event::End(e)) => {
                let name = local_name_of(e.name().as_ref());
                if field.is_some() && name != "trans-unit" {
                    field = None;
                } else if name == "trans-unit" {
                    field = None;
                    if let (Some(g), Some(u)) = (group.as_mut(), unit.take()) {
                        // Duplicate ids inside one document: first wins.
                        g.insert(u, ConflictPolicy::KeepFirst);
                    }
                } else if name == "file" {
                    if let Some(g) = group.take() {
                        adopt_group(&mut store, g);
                    }
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(err) => return Err(XliffError::MalformedDocument(err.to_string())),
        }
    }

    if !saw_root {
        return Err(XliffError::MalformedDocument("no root element".into()));
    }
    if !saw_file {
        return Err(XliffError::SchemaMismatch("document has no <file> elements".into()));
    }
    Ok(store)
}

fn text_element<W: Write>(
    out: &mut Writer<W>,
    name: &str,
    text: &str,
    attrs: &[(&str, &str)],
) -> Result<()> {
    let mut e = BytesStart::new(name);
    for (k, v) in attrs {
        e.push_attribute((*k, *v));
    }
    out.write_event(Event::Start(e))?;
    out.write_event(Event::Text(BytesText::new(text)))?;
    out.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Serialize a [`UnitStore`] as an XLIFF 1.2 document.
///
/// Root and `<file>` attributes are re-emitted exactly as loaded; stores
/// built in memory fall back to the standard XLIFF 1.2 declaration. Headers
/// are written back verbatim. Within each unit: `<source>`, then the
/// document's own `<target>`, then any extra slots in name order (with
/// `xml:space="preserve"`, as the comparison workflow expects), then `<note>`.
pub fn write_xliff(store: &UnitStore) -> Result<Vec<u8>> {
    let mut out = Writer::new_with_indent(Vec::new(), b' ', 2);
    out.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut root = BytesStart::new("xliff");
    if store.doc_attrs.is_empty() {
        root.push_attribute(("xmlns", XLIFF_NS));
        root.push_attribute(("version", XLIFF_VERSION));
    } else {
        for (k, v) in &store.doc_attrs {
            root.push_attribute((k.as_str(), v.as_str()));
        }
    }
    out.write_event(Event::Start(root))?;

    for group in store.groups() {
        let mut fe = BytesStart::new("file");
        if !group.meta.attrs.iter().any(|(k, _)| k == "original") {
            fe.push_attribute(("original", group.original.as_str()));
        }
        for (k, v) in &group.meta.attrs {
            fe.push_attribute((k.as_str(), v.as_str()));
        }
        out.write_event(Event::Start(fe))?;

        if let Some(header) = &group.meta.header_xml {
            out.write_event(Event::Start(BytesStart::new("header")))?;
            // Raw passthrough: the header was captured verbatim at load time.
            out.write_event(Event::Text(BytesText::from_escaped(header.as_str())))?;
            out.write_event(Event::End(BytesEnd::new("header")))?;
        }

        out.write_event(Event::Start(BytesStart::new("body")))?;
        for unit in group.units() {
            let mut ue = BytesStart::new("trans-unit");
            ue.push_attribute(("id", unit.id.as_str()));
            for (k, v) in &unit.attrs {
                ue.push_attribute((k.as_str(), v.as_str()));
            }
            out.write_event(Event::Start(ue))?;

            if let Some(source) = &unit.source {
                text_element(&mut out, "source", source, &[])?;
            }
            if let Some(target) = unit.slot(TARGET_SLOT) {
                text_element(&mut out, TARGET_SLOT, target, &[])?;
            }
            for (slot, text) in &unit.translations {
                if slot != TARGET_SLOT {
                    text_element(&mut out, slot, text, &[("xml:space", "preserve")])?;
                }
            }
            if let Some(note) = &unit.note {
                text_element(&mut out, "note", note, &[])?;
            }

            out.write_event(Event::End(BytesEnd::new("trans-unit")))?;
        }
        out.write_event(Event::End(BytesEnd::new("body")))?;
        out.write_event(Event::End(BytesEnd::new("file")))?;
    }

    out.write_event(Event::End(BytesEnd::new("xliff")))?;
    Ok(out.into_inner())
}

/// Read and parse one document from disk.
pub fn load_store(path: &Path) -> Result<UnitStore> {
    let text = std::fs::read_to_string(path)?;
    Ok(parse_xliff(&text)?)
}

/// Serialize fully, then write. A failing serialization leaves no partial
/// file behind.
pub fn save_store(path: &Path, store: &UnitStore) -> Result<()> {
    let bytes = write_xliff(store)?;
    std::fs::write(path, bytes)?;
    Ok(())
}
