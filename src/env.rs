use confique::meta::{Expr, FieldKind, LeafKind, Meta};
use toml::{Table, Value};

/// Build a settings table from `{PREFIX}__SECTION__KEY` environment variables.
///
/// `__` separates nesting levels and segments are lowercased, so
/// `HELMFLAT__RENDER__LINE_SUFFIX` sets `render.line_suffix`. Variables without
/// the prefix are ignored.
///
/// Each value is read by the default of the field it targets in `meta`.
/// Booleans accept `true`/`false` in any case and lists are split on commas.
/// Anything else stays a string, including unknown keys.
///
/// Takes an iterator so tests can pass synthetic data instead of `std::env::vars()`.
pub fn env_to_table(
    prefix: &str,
    vars: impl IntoIterator<Item = (String, String)>,
    meta: &Meta,
) -> Table {
    let needle = format!("{prefix}__");
    let mut table = Table::new();

    for (name, raw) in vars {
        let Some(rest) = name.strip_prefix(&needle) else {
            continue;
        };
        if rest.is_empty() {
            continue;
        }

        let path: Vec<String> = rest.split("__").map(str::to_lowercase).collect();
        let value = parse_env_value(&raw, field_default(meta, &path));
        insert_path(&mut table, &path, value);
    }

    table
}

fn insert_path(table: &mut Table, path: &[String], value: Value) {
    match path {
        [] => {}
        [leaf] => {
            table.insert(leaf.clone(), value);
        }
        [section, rest @ ..] => {
            let entry = table
                .entry(section.clone())
                .or_insert_with(|| Value::Table(Table::new()));
            if let Value::Table(sub) = entry {
                insert_path(sub, rest, value);
            }
        }
    }
}

/// Default of the leaf field at `path`, if there is one.
fn field_default(meta: &Meta, path: &[String]) -> Option<Expr> {
    let (head, rest) = path.split_first()?;
    let field = meta.fields.iter().find(|field| field.name == head.as_str())?;
    match (&field.kind, rest) {
        (FieldKind::Nested { meta, .. }, [_, ..]) => field_default(meta, rest),
        (
            FieldKind::Leaf {
                kind: LeafKind::Required { default },
                ..
            },
            [],
        ) => *default,
        _ => None,
    }
}

fn parse_env_value(raw: &str, default: Option<Expr>) -> Value {
    match default {
        Some(Expr::Bool(_)) if raw.eq_ignore_ascii_case("true") => Value::Boolean(true),
        Some(Expr::Bool(_)) if raw.eq_ignore_ascii_case("false") => Value::Boolean(false),
        Some(Expr::Array(_)) => Value::Array(
            raw.split(',')
                .map(str::trim)
                .filter(|item| !item.is_empty())
                .map(|item| Value::String(item.to_string()))
                .collect(),
        ),
        _ => Value::String(raw.to_string()),
    }
}
