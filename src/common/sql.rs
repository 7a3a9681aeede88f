//! Helper for making selective update queries.
//!
//! Builds the SET clause of an UPDATE statement from a sparse field map, so
//! callers never concatenate user-supplied values into query text.

use serde_json::{Map, Value};
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::Sqlite;

use super::error::ApiError;

/// A parameterized SET clause and the values to bind, in placeholder order.
#[derive(Debug)]
pub struct SetClause {
    pub clause: String,
    pub values: Vec<Value>,
}

impl SetClause {
    /// Index of the next free placeholder after the clause's own.
    pub fn next_placeholder(&self) -> usize {
        self.values.len() + 1
    }
}

/// Build a SET clause from `updates`, translating external field names to
/// column names through `aliases` (fields without an alias entry keep their
/// name unmodified).
///
/// `{"itemName": "new"}` with alias `("itemName", "item_name")` becomes
/// `"item_name" = ?1` with values `["new"]`. Placeholders are sequential from
/// 1, one per field, and `values` matches them in order, so binding the values
/// array to the clause is injection-safe regardless of content.
///
/// Fails with `BadRequest` when `updates` is empty.
pub fn partial_update(
    updates: &Map<String, Value>,
    aliases: &[(&str, &str)],
) -> Result<SetClause, ApiError> {
    if updates.is_empty() {
        return Err(ApiError::BadRequest("No data".to_string()));
    }

    let mut fragments = Vec::with_capacity(updates.len());
    let mut values = Vec::with_capacity(updates.len());

    for (idx, (field, value)) in updates.iter().enumerate() {
        let column = aliases
            .iter()
            .find(|(external, _)| external == field)
            .map(|(_, column)| *column)
            .unwrap_or(field.as_str());
        fragments.push(format!("\"{}\" = ?{}", column, idx + 1));
        values.push(value.clone());
    }

    Ok(SetClause {
        clause: fragments.join(", "),
        values,
    })
}

/// Bind a JSON value to the next positional parameter of a sqlite query.
pub fn bind_value<'q>(
    q: Query<'q, Sqlite, SqliteArguments<'q>>,
    v: &'q Value,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    match v {
        Value::Null => {
            let none: Option<String> = None;
            q.bind(none)
        }
        Value::Bool(b) => q.bind(*b),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                q.bind(i)
            } else if let Some(f) = n.as_f64() {
                q.bind(f)
            } else {
                q.bind(n.to_string())
            }
        }
        Value::String(s) => q.bind(s.as_str()),
        // arrays/objects are stored as their JSON text
        other => q.bind(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn map(value: Value) -> Map<String, Value> {
        value.as_object().unwrap().clone()
    }

    #[test]
    fn builds_single_field_clause_with_alias() {
        let updates = map(json!({ "itemName": "new" }));
        let set = partial_update(&updates, &[("itemName", "item_name")]).unwrap();

        assert_eq!(set.clause, "\"item_name\" = ?1");
        assert_eq!(set.values, vec![json!("new")]);
        assert_eq!(set.next_placeholder(), 2);
    }

    #[test]
    fn falls_back_to_field_name_without_alias() {
        let updates = map(json!({ "email": "a@b.com" }));
        let set = partial_update(&updates, &[("itemName", "item_name")]).unwrap();

        assert_eq!(set.clause, "\"email\" = ?1");
    }

    #[test]
    fn placeholder_count_matches_value_count_and_order() {
        let updates = map(json!({
            "firstName": "first",
            "isAdmin": true,
            "phone": "5551234567"
        }));
        let set = partial_update(
            &updates,
            &[("firstName", "first_name"), ("isAdmin", "is_admin")],
        )
        .unwrap();

        // serde_json::Map iterates in key order: firstName, isAdmin, phone
        assert_eq!(
            set.clause,
            "\"first_name\" = ?1, \"is_admin\" = ?2, \"phone\" = ?3"
        );
        assert_eq!(
            set.values,
            vec![json!("first"), json!(true), json!("5551234567")]
        );
        assert_eq!(set.clause.matches('?').count(), set.values.len());
    }

    #[test]
    fn empty_update_set_is_rejected() {
        let updates = Map::new();
        let err = partial_update(&updates, &[]).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }
}
