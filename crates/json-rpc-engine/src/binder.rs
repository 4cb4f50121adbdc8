use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{JsonRpcErrorObject, ServiceError};
use crate::registry::HandlerDescriptor;
use crate::request::RequestParams;

/// Arguments bound to a handler, in declaration order
#[derive(Debug, Clone, PartialEq)]
pub struct BoundParams {
    names: Arc<[String]>,
    values: Vec<Value>,
}

impl BoundParams {
    pub fn new(names: Arc<[String]>, values: Vec<Value>) -> Self {
        Self { names, values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn into_values(self) -> Vec<Value> {
        self.values
    }

    pub fn get_index(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        let index = self.names.iter().position(|n| n == name)?;
        self.values.get(index)
    }

    /// Deserialize the argument bound to `name`
    pub fn arg<T: DeserializeOwned>(&self, name: &str) -> Result<T, ServiceError> {
        let value = self
            .get(name)
            .ok_or_else(|| ServiceError::failed(format!("no parameter named '{}'", name)))?;
        Ok(T::deserialize(value)?)
    }

    /// Deserialize the argument at `index`
    pub fn arg_at<T: DeserializeOwned>(&self, index: usize) -> Result<T, ServiceError> {
        let value = self
            .get_index(index)
            .ok_or_else(|| ServiceError::failed(format!("no parameter at index {}", index)))?;
        Ok(T::deserialize(value)?)
    }
}

/// Bind supplied params against a method's declared signature.
///
/// Positional params must match the declared count exactly, named params the
/// declared name set exactly. Absent params bind only to a method without
/// parameters. Methods taking a variable argument list never bind.
pub fn bind_params(
    descriptor: &HandlerDescriptor,
    params: Option<&RequestParams>,
) -> Result<BoundParams, JsonRpcErrorObject> {
    let name = descriptor.name();
    let declared = descriptor.params();

    if descriptor.accepts_variadic() {
        return Err(JsonRpcErrorObject::invalid_params(&format!(
            "method {} takes a variable argument list and cannot be invoked",
            name
        )));
    }

    let values = match params {
        None if declared.is_empty() => Vec::new(),
        None => {
            return Err(JsonRpcErrorObject::invalid_params(&format!(
                "method {} takes {} params, none given",
                name,
                declared.len()
            )));
        }
        Some(RequestParams::Array(values)) => {
            if values.len() != declared.len() {
                return Err(JsonRpcErrorObject::invalid_params(&format!(
                    "method {} takes {} positional params, {} given",
                    name,
                    declared.len(),
                    values.len()
                )));
            }
            values.clone()
        }
        Some(RequestParams::Object(map)) => {
            let missing: Vec<&str> = declared
                .iter()
                .filter(|param| !map.contains_key(param.as_str()))
                .map(String::as_str)
                .collect();
            let mut unexpected: Vec<&str> = map
                .keys()
                .filter(|key| !declared.contains(key))
                .map(String::as_str)
                .collect();
            unexpected.sort_unstable();

            if !missing.is_empty() || !unexpected.is_empty() {
                let mut detail = format!("method {} takes params [{}]", name, declared.join(", "));
                if !missing.is_empty() {
                    detail.push_str(&format!(", missing [{}]", missing.join(", ")));
                }
                if !unexpected.is_empty() {
                    detail.push_str(&format!(", unexpected [{}]", unexpected.join(", ")));
                }
                return Err(JsonRpcErrorObject::invalid_params(&detail));
            }

            declared
                .iter()
                .map(|param| map.get(param.as_str()).cloned().unwrap_or(Value::Null))
                .collect()
        }
    };

    Ok(BoundParams::new(declared.clone(), values))
}
