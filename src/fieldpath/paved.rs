//! Reading and writing values at a field path inside a map.

use super::path::{Path, PathElement};
use super::FieldPathError;
use crate::value::{Map, Value};

/// Returns the value at `path`, if every step of the path exists.
pub fn get_value<'a>(object: &'a Map, path: &Path) -> Option<&'a Value> {
    let (first, rest) = path.as_slice().split_first()?;
    let mut current = object.get(first.as_field()?)?;
    for element in rest {
        current = match element {
            PathElement::Field(key) => current.as_map()?.get(key)?,
            PathElement::Index(i) => current.as_list()?.get(*i)?,
        };
    }
    Some(current)
}

/// Writes `value` at `path`, creating intermediate maps and lists as needed.
///
/// Lists are padded with nulls when the index lies past the end. An existing
/// intermediate of the wrong shape is an error; nothing is overwritten in
/// that case.
pub fn set_value(object: &mut Map, path: &Path, value: Value) -> Result<(), FieldPathError> {
    let (first, rest) = path
        .as_slice()
        .split_first()
        .ok_or(FieldPathError::EmptyPath)?;
    let key = match first {
        PathElement::Field(key) => key,
        PathElement::Index(_) => return Err(FieldPathError::not_an_array(&Path::new(), "map")),
    };
    let slot = object.get_or_insert_with(key, || Value::Null);
    set_slot(slot, rest, value, path, 1)
}

fn set_slot(
    slot: &mut Value,
    rest: &[PathElement],
    value: Value,
    path: &Path,
    depth: usize,
) -> Result<(), FieldPathError> {
    let Some((next, rest)) = rest.split_first() else {
        *slot = value;
        return Ok(());
    };

    match next {
        PathElement::Field(key) => {
            if slot.is_null() {
                *slot = Value::Map(Map::new());
            }
            let found = slot.type_name();
            let map = slot
                .as_map_mut()
                .ok_or_else(|| FieldPathError::not_an_object(&path.prefix(depth), found))?;
            let child = map.get_or_insert_with(key, || Value::Null);
            set_slot(child, rest, value, path, depth + 1)
        }
        PathElement::Index(i) => {
            if slot.is_null() {
                *slot = Value::List(Vec::new());
            }
            let found = slot.type_name();
            let list = slot
                .as_list_mut()
                .ok_or_else(|| FieldPathError::not_an_array(&path.prefix(depth), found))?;
            if list.len() <= *i {
                list.resize(*i + 1, Value::Null);
            }
            set_slot(&mut list[*i], rest, value, path, depth + 1)
        }
    }
}
