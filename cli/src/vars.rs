use std::{collections::HashMap, error::Error, fs, path::Path};

use anyhow::Context;
use toml::{Table, Value};

/// Parse a single key-value pair
pub fn parse_key_val<T, U>(s: &str) -> Result<(T, U), Box<dyn Error + Send + Sync + 'static>>
where
    T: std::str::FromStr,
    T::Err: Error + Send + Sync + 'static,
    U: std::str::FromStr,
    U::Err: Error + Send + Sync + 'static,
{
    let pos = s
        .find('=')
        .ok_or_else(|| format!("should be formatted as key=value pair: `{s}`"))?;
    Ok((s[..pos].parse()?, s[pos + 1..].parse()?))
}

/// Load values from a TOML file
pub fn load_vars_file(path: &Path) -> anyhow::Result<HashMap<String, String>> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Unable to read vars file {}", path.display()))?;

    parse_vars(&contents).with_context(|| format!("Invalid vars file {}", path.display()))
}

/// Flatten a TOML document in to values
///
/// Nested tables are joined with `.` so `[db] host = ".."` becomes `db.host`.
/// Strings are used as is, other values as their TOML text.
pub fn parse_vars(contents: &str) -> anyhow::Result<HashMap<String, String>> {
    let table: Table = toml::from_str(contents)?;

    let mut vars = HashMap::new();
    flatten(None, table, &mut vars);

    Ok(vars)
}

fn flatten(prefix: Option<&str>, table: Table, vars: &mut HashMap<String, String>) {
    for (key, value) in table {
        let name = match prefix {
            Some(prefix) => format!("{prefix}.{key}"),
            None => key,
        };

        match value {
            Value::Table(table) => flatten(Some(&name), table, vars),
            Value::String(value) => {
                vars.insert(name, value);
            }
            value => {
                vars.insert(name, value.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn it_should_flatten_tables() {
        let vars = parse_vars(&textwrap::dedent(
            "
            greeting = \"hello\"
            debug = true

            [db]
            port = 5432

            [db.pool]
            size = 4
            ",
        ))
        .unwrap();

        assert_eq!(
            HashMap::from([
                ("greeting".to_string(), "hello".to_string()),
                ("debug".to_string(), "true".to_string()),
                ("db.port".to_string(), "5432".to_string()),
                ("db.pool.size".to_string(), "4".to_string()),
            ]),
            vars
        );
    }

    #[test]
    fn it_should_reject_invalid_toml() {
        assert!(parse_vars("greeting = ").is_err());
    }

    #[test]
    fn it_should_parse_key_value_pairs() {
        assert_eq!(
            ("name".to_string(), "a=b".to_string()),
            parse_key_val::<String, String>("name=a=b").unwrap()
        );
        assert!(parse_key_val::<String, String>("name").is_err());
    }
}
