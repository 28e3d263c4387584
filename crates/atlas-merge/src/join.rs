//! Full outer join of two tables on a shared key column.

use std::collections::{HashMap, HashSet};

use atlas_model::{Cell, Column, Table};

use crate::error::Result;

/// Join key of a cell; missing or blank keys never match.
pub(crate) fn key_of(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Missing => None,
        other => {
            let rendered = other.render();
            let trimmed = rendered.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
    }
}

/// Name for a right-hand column that collides with a left column. `taken`
/// holds every name already used on either side and grows with the result.
fn disambiguate(taken: &mut HashSet<String>, column: &str, table: &str) -> String {
    let base = format!("{column}_{table}");
    let name = if taken.contains(&base) {
        (2..)
            .map(|n| format!("{base}_{n}"))
            .find(|candidate| !taken.contains(candidate))
            .unwrap_or(base)
    } else {
        base
    };
    taken.insert(name.clone());
    name
}

/// Full outer join of `left` and `right` on `key`.
///
/// Matching rows pair up, duplicate keys on both sides produce every
/// combination, and unmatched rows from either side are kept with the other
/// side's columns missing. Left rows come first in their original order,
/// then unmatched right rows in theirs. Right columns whose names already
/// exist on the left are renamed `<col>_<right table>`.
pub(crate) fn outer_join(left: &Table, right: &Table, key: &str) -> Result<Table> {
    let left_keys: Vec<Option<String>> = left
        .require_column(key)?
        .cells
        .iter()
        .map(key_of)
        .collect();
    let right_key_column = right.require_column(key)?;
    let right_keys: Vec<Option<String>> = right_key_column.cells.iter().map(key_of).collect();

    let mut right_index: HashMap<&str, Vec<usize>> = HashMap::new();
    for (idx, k) in right_keys.iter().enumerate() {
        if let Some(k) = k {
            right_index.entry(k.as_str()).or_default().push(idx);
        }
    }

    let mut pairs: Vec<(Option<usize>, Option<usize>)> = Vec::new();
    let mut right_matched = vec![false; right.height()];
    for (l, k) in left_keys.iter().enumerate() {
        match k.as_deref().and_then(|k| right_index.get(k)) {
            Some(rows) => {
                for &r in rows {
                    right_matched[r] = true;
                    pairs.push((Some(l), Some(r)));
                }
            }
            None => pairs.push((Some(l), None)),
        }
    }
    pairs.extend(
        right_matched
            .iter()
            .enumerate()
            .filter(|(_, matched)| !**matched)
            .map(|(r, _)| (None, Some(r))),
    );

    let mut columns = Vec::with_capacity(left.width() + right.width());
    for column in left.columns() {
        let cells = pairs
            .iter()
            .map(|(l, r)| match (l, r) {
                (Some(l), _) => column.get(*l).clone(),
                (None, Some(r)) if column.name == key => right_key_column.get(*r).clone(),
                _ => Cell::Missing,
            })
            .collect();
        columns.push(Column {
            name: column.name.clone(),
            kind: column.kind,
            cells,
        });
    }

    let mut taken: HashSet<String> = left
        .columns()
        .iter()
        .chain(right.columns())
        .map(|c| c.name.clone())
        .collect();
    for column in right.columns().iter().filter(|c| c.name != key) {
        let name = if left.has_column(&column.name) {
            let renamed = disambiguate(&mut taken, &column.name, &right.name);
            tracing::warn!(
                table = %right.name,
                column = %column.name,
                renamed = %renamed,
                "column name already present, renamed"
            );
            renamed
        } else {
            column.name.clone()
        };
        let cells = pairs
            .iter()
            .map(|(_, r)| r.map_or(Cell::Missing, |r| column.get(r).clone()))
            .collect();
        columns.push(Column {
            name,
            kind: column.kind,
            cells,
        });
    }

    Ok(Table::with_columns(left.name.clone(), columns)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str, keys: &[Option<&str>], column: &str, values: &[Option<f64>]) -> Table {
        Table::with_columns(
            name,
            vec![
                Column::text("Country", keys.iter().map(|k| k.map(String::from)).collect()),
                Column::numeric(column, values.to_vec()),
            ],
        )
        .unwrap()
    }

    #[test]
    fn keeps_unmatched_rows_from_both_sides() {
        let left = table("a", &[Some("Chad"), Some("Peru")], "gdp", &[Some(1.0), Some(2.0)]);
        let right = table("b", &[Some("Peru"), Some("Fiji")], "pop", &[Some(10.0), Some(20.0)]);
        let joined = outer_join(&left, &right, "Country").unwrap();
        assert_eq!(joined.height(), 3);
        assert_eq!(joined.cell(0, "pop"), Some(&Cell::Missing));
        assert_eq!(joined.cell(1, "pop"), Some(&Cell::Number(10.0)));
        assert_eq!(joined.cell(2, "Country"), Some(&Cell::text("Fiji")));
        assert_eq!(joined.cell(2, "gdp"), Some(&Cell::Missing));
    }

    #[test]
    fn duplicate_keys_form_every_combination() {
        let left = table("a", &[Some("Chad"), Some("Chad")], "gdp", &[Some(1.0), Some(2.0)]);
        let right = table("b", &[Some("Chad"), Some("Chad")], "pop", &[Some(3.0), Some(4.0)]);
        let joined = outer_join(&left, &right, "Country").unwrap();
        assert_eq!(joined.height(), 4);
    }

    #[test]
    fn missing_keys_never_match() {
        let left = table("a", &[None], "gdp", &[Some(1.0)]);
        let right = table("b", &[None], "pop", &[Some(2.0)]);
        let joined = outer_join(&left, &right, "Country").unwrap();
        assert_eq!(joined.height(), 2);
    }

    #[test]
    fn colliding_columns_are_renamed_after_the_table() {
        let left = table("a", &[Some("Chad")], "gdp", &[Some(1.0)]);
        let right = table("economy", &[Some("Chad")], "gdp", &[Some(2.0)]);
        let joined = outer_join(&left, &right, "Country").unwrap();
        assert_eq!(joined.column_names(), vec!["Country", "gdp", "gdp_economy"]);
    }

    #[test]
    fn renamed_column_skips_names_used_on_the_right() {
        let left = table("a", &[Some("Chad")], "gdp", &[Some(1.0)]);
        let right = Table::with_columns(
            "b",
            vec![
                Column::text("Country", vec![Some("Chad".into())]),
                Column::numeric("gdp", vec![Some(2.0)]),
                Column::numeric("gdp_b", vec![Some(3.0)]),
            ],
        )
        .unwrap();
        let joined = outer_join(&left, &right, "Country").unwrap();
        assert_eq!(joined.column_names(), vec!["Country", "gdp", "gdp_b_2", "gdp_b"]);
        assert_eq!(joined.cell(0, "gdp_b_2"), Some(&Cell::Number(2.0)));
        assert_eq!(joined.cell(0, "gdp_b"), Some(&Cell::Number(3.0)));
    }

    #[test]
    fn renamed_column_skips_existing_left_names() {
        let left = Table::with_columns(
            "a",
            vec![
                Column::text("Country", vec![Some("Chad".into())]),
                Column::numeric("gdp", vec![Some(1.0)]),
                Column::numeric("gdp_b", vec![Some(4.0)]),
            ],
        )
        .unwrap();
        let right = table("b", &[Some("Chad")], "gdp", &[Some(2.0)]);
        let joined = outer_join(&left, &right, "Country").unwrap();
        assert_eq!(joined.column_names(), vec!["Country", "gdp", "gdp_b", "gdp_b_2"]);
    }
}
