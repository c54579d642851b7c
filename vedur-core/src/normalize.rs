//! Reshape parsed XML trees into flat records.

use serde_json::{Map, Value};

use crate::{
    error::{Result, VedurError},
    model::{Envelope, Lang, Record},
    request::{Query, QueryKind},
    xml::{ATTR_KEY, TEXT_KEY},
};

/// Collapse every single-element array into its element, bottom-up.
///
/// Arrays of any other length stay arrays. Applying this twice gives the same
/// result as applying it once.
pub fn de_arrayfy(value: Value) -> Value {
    match value {
        Value::Array(items) => {
            let mut items: Vec<Value> = items.into_iter().map(de_arrayfy).collect();
            if items.len() == 1 {
                if let Some(only) = items.pop() {
                    return only;
                }
            }
            Value::Array(items)
        }
        Value::Object(fields) => {
            Value::Object(fields.into_iter().map(|(k, v)| (k, de_arrayfy(v))).collect())
        }
        other => other,
    }
}

/// Replace decimal commas with periods in every string, recursively.
pub fn fix_decimals(value: &mut Value) {
    match value {
        Value::String(s) if s.contains(',') => *s = s.replace(',', "."),
        Value::Array(items) => items.iter_mut().for_each(fix_decimals),
        Value::Object(fields) => fields.values_mut().for_each(fix_decimals),
        _ => {}
    }
}

fn collection(tree: Value, wrapper: &str, child: &str) -> Result<Vec<Value>> {
    let Value::Object(mut doc) = tree else {
        return Err(VedurError::schema("document is not an element tree"));
    };
    let inner = doc.remove(wrapper).ok_or_else(|| {
        let found: Vec<&str> = doc.keys().map(String::as_str).collect();
        VedurError::schema(format!("expected <{wrapper}> root element, found {found:?}"))
    })?;

    match inner {
        Value::String(text) if text.trim().is_empty() => Ok(Vec::new()),
        Value::String(text) => {
            Err(VedurError::schema(format!("<{wrapper}> contains only text: {}", text.trim())))
        }
        Value::Object(mut fields) => match fields.remove(child) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(items),
            Some(other) => Ok(vec![other]),
        },
        other => Err(VedurError::schema(format!("unexpected <{wrapper}> node: {other}"))),
    }
}

/// Move `id` (and `valid` when present) out of the attribute object to the top.
fn flatten(record: Value) -> Result<Record> {
    let Value::Object(fields) = record else {
        return Err(VedurError::schema("record element has no attributes"));
    };

    let mut attrs = None;
    let mut rest = Vec::with_capacity(fields.len());
    for (key, value) in fields {
        if key == ATTR_KEY {
            attrs = Some(value);
        } else {
            rest.push((key, value));
        }
    }

    let Some(Value::Object(attrs)) = attrs else {
        return Err(VedurError::schema("record element has no attributes"));
    };
    let id = attrs
        .get("id")
        .cloned()
        .ok_or_else(|| VedurError::schema("record element has no id attribute"))?;

    let mut out = Map::new();
    out.insert("id".to_string(), id);
    if let Some(valid) = attrs.get("valid") {
        out.insert("valid".to_string(), valid.clone());
    }
    for (key, value) in rest {
        out.entry(key).or_insert(value);
    }
    Ok(out)
}

fn station_records(tree: Value, wrapper: &str, lang: Lang) -> Result<Vec<Record>> {
    collection(tree, wrapper, "station")?
        .into_iter()
        .map(|station| {
            let mut record = flatten(de_arrayfy(station))?;
            if lang == Lang::Is {
                record.values_mut().for_each(fix_decimals);
            }
            Ok(record)
        })
        .collect()
}

pub fn forecasts(tree: Value, lang: Lang) -> Result<Vec<Record>> {
    station_records(tree, "forecasts", lang)
}

pub fn observations(tree: Value, lang: Lang) -> Result<Vec<Record>> {
    station_records(tree, "observations", lang)
}

/// Text bulletins. `content` with embedded `<br/>` markup keeps only its text.
pub fn texts(tree: Value) -> Result<Vec<Record>> {
    collection(tree, "texts", "text")?
        .into_iter()
        .map(|text| {
            let mut record = flatten(de_arrayfy(text))?;
            let stripped = match record.get("content") {
                Some(Value::Object(parts)) => {
                    let text = parts.get(TEXT_KEY).and_then(Value::as_str).unwrap_or_default();
                    Some(text.to_string())
                }
                _ => None,
            };
            if let Some(content) = stripped {
                record.insert("content".to_string(), Value::String(content));
            }
            Ok(record)
        })
        .collect()
}

/// Normalize a parsed tree for `query` into the response envelope.
pub fn normalize(tree: Value, query: &Query) -> Result<Envelope<Record>> {
    let results = match query.kind {
        QueryKind::Forecasts => forecasts(tree, query.lang)?,
        QueryKind::Observations => observations(tree, query.lang)?,
        QueryKind::Texts => texts(tree)?,
    };
    Ok(Envelope::new(results).with_descriptions(query.descriptions()))
}
