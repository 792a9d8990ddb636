//! Typed readers over opaque plugin options.

use serde_json::Value;

use crate::config::Options;
use crate::error::PluginError;
use crate::logger::Level;

fn get<'a>(options: Option<&'a Options>, key: &str) -> Option<&'a Value> {
    options.and_then(|o| o.get(key)).filter(|v| !v.is_null())
}

pub fn bool_option(options: Option<&Options>, key: &str) -> Result<Option<bool>, PluginError> {
    match get(options, key) {
        None => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(*b)),
        Some(other) => Err(PluginError::invalid_option(
            key,
            format!("expected a boolean, found {other}"),
        )),
    }
}

pub fn str_option<'a>(
    options: Option<&'a Options>,
    key: &str,
) -> Result<Option<&'a str>, PluginError> {
    match get(options, key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => Err(PluginError::invalid_option(
            key,
            format!("expected a string, found {other}"),
        )),
    }
}

pub fn required_str_option<'a>(
    options: Option<&'a Options>,
    key: &str,
) -> Result<&'a str, PluginError> {
    str_option(options, key)?.ok_or_else(|| PluginError::MissingOption {
        key: key.to_string(),
    })
}

/// A list of level names; `None` when the option is absent.
pub fn levels_option(
    options: Option<&Options>,
    key: &str,
) -> Result<Option<Vec<Level>>, PluginError> {
    let Some(value) = get(options, key) else {
        return Ok(None);
    };
    let Value::Array(items) = value else {
        return Err(PluginError::invalid_option(
            key,
            format!("expected a list of level names, found {value}"),
        ));
    };

    items
        .iter()
        .map(|item| match item {
            Value::String(name) => name
                .parse::<Level>()
                .map_err(|e| PluginError::invalid_option(key, e.to_string())),
            other => Err(PluginError::invalid_option(
                key,
                format!("expected a level name, found {other}"),
            )),
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}
