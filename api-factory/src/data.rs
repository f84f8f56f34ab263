// api-factory/src/data.rs
use crate::error::ApiError;
use serde::Serialize;
use serde_json::{Map, Value};

/// Call-time parameters, kept in insertion order.
///
/// A field may be undefined (`None`), which is not the same as JSON `null`:
/// undefined fields never reach the body or the query string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Data {
    fields: Vec<(String, Option<Value>)>,
}

impl Data {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert of a defined value
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, Some(value.into()));
        self
    }

    /// Builder-style insert where `None` marks the field undefined
    pub fn with_opt<V: Into<Value>>(mut self, name: impl Into<String>, value: Option<V>) -> Self {
        self.insert(name, value.map(Into::into));
        self
    }

    /// Insert or replace a field, keeping its original position on replace
    pub fn insert(&mut self, name: impl Into<String>, value: Option<Value>) {
        let name = name.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Defined value of a field
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| n == name)
            .and_then(|(_, v)| v.as_ref())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.iter().any(|(n, _)| n == name)
    }

    /// Remove a field, returning its value if it was defined
    pub fn take(&mut self, name: &str) -> Option<Value> {
        let idx = self.fields.iter().position(|(n, _)| n == name)?;
        self.fields.remove(idx).1
    }

    pub fn drop_undefined(&mut self) {
        self.fields.retain(|(_, v)| v.is_some());
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Defined fields in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields
            .iter()
            .filter_map(|(n, v)| v.as_ref().map(|v| (n.as_str(), v)))
    }

    /// JSON object of the defined fields
    pub fn to_json(&self) -> Map<String, Value> {
        self.iter()
            .map(|(n, v)| (n.to_string(), v.clone()))
            .collect()
    }

    /// Build from any value that serializes to a JSON object
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, ApiError> {
        match serde_json::to_value(value)? {
            Value::Object(map) => Ok(map.into()),
            Value::Null => Ok(Self::new()),
            other => Err(ApiError::InvalidData(format!(
                "expected an object, got {}",
                other
            ))),
        }
    }
}

impl From<Map<String, Value>> for Data {
    fn from(map: Map<String, Value>) -> Self {
        Self {
            fields: map.into_iter().map(|(n, v)| (n, Some(v))).collect(),
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Data {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut data = Self::new();
        for (name, value) in iter {
            data.insert(name, Some(value.into()));
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_replaces_in_place() {
        let data = Data::new().with("a", 1).with("b", 2).with("a", 3);
        let names: Vec<&str> = data.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(data.get("a"), Some(&json!(3)));
    }

    #[test]
    fn test_undefined_is_not_null() {
        let mut data = Data::new()
            .with("nothing", Value::Null)
            .with_opt::<i64>("missing", None);
        assert!(data.contains("missing"));
        assert_eq!(data.get("missing"), None);

        data.drop_undefined();
        assert!(!data.contains("missing"));
        assert_eq!(data.to_json(), json!({"nothing": null}).as_object().unwrap().clone());
    }

    #[test]
    fn test_take_removes_field() {
        let mut data = Data::new().with("id", "5").with_opt::<i64>("gone", None);
        assert_eq!(data.take("id"), Some(json!("5")));
        assert!(!data.contains("id"));
        assert_eq!(data.take("gone"), None);
        assert!(data.is_empty());
    }

    #[test]
    fn test_from_serialize() {
        #[derive(Serialize)]
        struct Query {
            id: u32,
            name: &'static str,
        }

        let data = Data::from_serialize(&Query { id: 5, name: "orders" }).unwrap();
        assert_eq!(data.get("id"), Some(&json!(5)));
        assert_eq!(data.get("name"), Some(&json!("orders")));

        assert!(Data::from_serialize(&()).unwrap().is_empty());
        assert!(matches!(
            Data::from_serialize(&[1, 2]),
            Err(ApiError::InvalidData(_))
        ));
    }
}
