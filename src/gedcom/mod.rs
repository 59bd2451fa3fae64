//! GEDCOM 5.5 writer.
//!
//! Cross-references are resolved through the serialization numbers assigned by
//! [`Tree::renumber`]; rendering an un-numbered tree is refused.

use std::borrow::Cow;
use std::io::Write;

use crate::error::{AncestryError, Result};
use crate::model::Event;
use crate::tree::{Person, Tree, Union, UnionKey};

/// Tag carrying the remote person / relationship ID
pub const REMOTE_ID_TAG: &str = "_FSFTID";

/// Write the whole tree: header, individuals, families, trailer.
pub fn render<W: Write>(tree: &Tree, sink: &mut W) -> Result<()> {
    if !tree.is_numbered() {
        return Err(AncestryError::Invariant(
            "tree must be renumbered before rendering".to_string(),
        ));
    }

    write_header(sink)?;

    let mut persons: Vec<&Person> = tree.persons().collect();
    persons.sort_by_key(|p| p.num);
    for person in persons {
        write_person(tree, person, sink)?;
    }

    let mut unions: Vec<&Union> = tree.unions().collect();
    unions.sort_by_key(|u| u.num);
    for union in unions {
        write_union(tree, union, sink)?;
    }

    writeln!(sink, "0 TRLR")?;
    Ok(())
}

/// Render into a string (handy for small trees and tests)
pub fn render_to_string(tree: &Tree) -> Result<String> {
    let mut buf = Vec::new();
    render(tree, &mut buf)?;
    String::from_utf8(buf).map_err(|e| AncestryError::Invariant(e.to_string()))
}

fn write_header<W: Write>(sink: &mut W) -> Result<()> {
    writeln!(sink, "0 HEAD")?;
    writeln!(sink, "1 CHAR UTF-8")?;
    writeln!(sink, "1 GEDC")?;
    writeln!(sink, "2 VERS 5.5")?;
    writeln!(sink, "2 FORM LINEAGE-LINKED")?;
    Ok(())
}

fn write_person<W: Write>(tree: &Tree, person: &Person, sink: &mut W) -> Result<()> {
    writeln!(sink, "0 @I{}@ INDI", number(person.num, &person.id)?)?;
    writeln!(
        sink,
        "1 NAME {} /{}/",
        line_value(&person.given),
        line_value(person.surname())
    )?;
    if let Some(sex) = person.gender.gedcom_code() {
        writeln!(sink, "1 SEX {}", sex)?;
    }
    write_event(sink, "BIRT", &person.birth)?;
    write_event(sink, "CHR", &person.christening)?;
    write_event(sink, "DEAT", &person.death)?;
    write_event(sink, "BURI", &person.burial)?;
    for num in union_numbers(tree, &person.parent_in)? {
        writeln!(sink, "1 FAMS @F{}@", num)?;
    }
    for num in union_numbers(tree, &person.child_of)? {
        writeln!(sink, "1 FAMC @F{}@", num)?;
    }
    writeln!(sink, "1 {} {}", REMOTE_ID_TAG, line_value(&person.id))?;
    Ok(())
}

fn write_union<W: Write>(tree: &Tree, union: &Union, sink: &mut W) -> Result<()> {
    writeln!(sink, "0 @F{}@ FAM", number(union.num, &union.key.to_string())?)?;
    if let Some(father) = union.key.father() {
        writeln!(sink, "1 HUSB @I{}@", person_number(tree, father)?)?;
    }
    if let Some(mother) = union.key.mother() {
        writeln!(sink, "1 WIFE @I{}@", person_number(tree, mother)?)?;
    }
    let mut children = union
        .children
        .iter()
        .map(|id| person_number(tree, id))
        .collect::<Result<Vec<_>>>()?;
    children.sort_unstable();
    for num in children {
        writeln!(sink, "1 CHIL @I{}@", num)?;
    }
    write_event(sink, "MARR", &union.marriage)?;
    if let Some(rel_id) = &union.relationship_id {
        writeln!(sink, "1 {} {}", REMOTE_ID_TAG, line_value(rel_id))?;
    }
    Ok(())
}

/// Level-1 event block with optional DATE / PLAC; nothing at all when both are absent
fn write_event<W: Write>(sink: &mut W, tag: &str, event: &Event) -> Result<()> {
    if event.is_empty() {
        return Ok(());
    }
    writeln!(sink, "1 {}", tag)?;
    if let Some(date) = &event.date {
        writeln!(sink, "2 DATE {}", line_value(date))?;
    }
    if let Some(place) = &event.place {
        writeln!(sink, "2 PLAC {}", line_value(place))?;
    }
    Ok(())
}

/// Remote text must stay on its GEDCOM line: every line break becomes a space.
fn line_value(text: &str) -> Cow<'_, str> {
    if !text.contains(['\r', '\n']) {
        return Cow::Borrowed(text);
    }
    Cow::Owned(text.replace("\r\n", " ").replace(['\r', '\n'], " "))
}

fn number(num: Option<usize>, what: &str) -> Result<usize> {
    num.ok_or_else(|| AncestryError::Invariant(format!("{} has no serialization number", what)))
}

fn person_number(tree: &Tree, id: &str) -> Result<usize> {
    let person = tree
        .person(id)
        .ok_or_else(|| AncestryError::Invariant(format!("dangling person reference {}", id)))?;
    number(person.num, id)
}

fn union_numbers<'a>(
    tree: &Tree,
    keys: impl IntoIterator<Item = &'a UnionKey>,
) -> Result<Vec<usize>> {
    let mut nums = keys
        .into_iter()
        .map(|key| {
            let union = tree.union(key).ok_or_else(|| {
                AncestryError::Invariant(format!("dangling union reference {}", key))
            })?;
            number(union.num, &key.to_string())
        })
        .collect::<Result<Vec<_>>>()?;
    nums.sort_unstable();
    Ok(nums)
}
