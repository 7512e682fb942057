//! Schema - Define type schemas for resources
//!
//! Providers define schemas for each resource type, mirroring the JSON
//! shape of the corresponding dashboard endpoint. Declarations are
//! validated against these schemas before any API call is made.

use std::collections::HashMap;
use std::fmt;

use crate::resource::Value;

/// Attribute type
#[derive(Debug, Clone)]
pub enum AttributeType {
    /// String
    String,
    /// Integer
    Int,
    /// Boolean
    Bool,
    /// Enum (list of allowed values)
    Enum(Vec<String>),
    /// Custom type (with validation function)
    Custom {
        name: String,
        base: Box<AttributeType>,
        validate: fn(&Value) -> Result<(), String>,
    },
    /// List
    List(Box<AttributeType>),
    /// Map with homogeneous value type
    Map(Box<AttributeType>),
    /// Nested object with named fields (e.g., an SSID's RADIUS server block)
    Object(HashMap<String, AttributeSchema>),
}

impl AttributeType {
    /// Check if a value conforms to this type
    ///
    /// `Null` is accepted by every type; whether null is a meaningful
    /// assignment is the endpoint's business, not the schema's.
    pub fn validate(&self, value: &Value) -> Result<(), TypeError> {
        if value.is_null() {
            return Ok(());
        }

        match (self, value) {
            // Ref values resolve to strings at apply time, so they're valid for String types
            (AttributeType::String, Value::String(_) | Value::Ref(_, _)) => Ok(()),
            (AttributeType::Int, Value::Int(_)) => Ok(()),
            (AttributeType::Bool, Value::Bool(_)) => Ok(()),

            (AttributeType::Enum(variants), Value::String(s)) => {
                if variants.iter().any(|v| v == s) {
                    Ok(())
                } else {
                    Err(TypeError::InvalidEnumVariant {
                        value: s.clone(),
                        expected: variants.clone(),
                    })
                }
            }

            (AttributeType::Custom { validate, .. }, v) => {
                validate(v).map_err(|msg| TypeError::ValidationFailed { message: msg })
            }

            (AttributeType::List(inner), Value::List(items)) => {
                for (i, item) in items.iter().enumerate() {
                    inner.validate(item).map_err(|e| TypeError::ListItemError {
                        index: i,
                        inner: Box::new(e),
                    })?;
                }
                Ok(())
            }

            (AttributeType::Map(inner), Value::Map(map)) => {
                for (k, v) in map {
                    inner.validate(v).map_err(|e| TypeError::MapValueError {
                        key: k.clone(),
                        inner: Box::new(e),
                    })?;
                }
                Ok(())
            }

            (AttributeType::Object(fields), Value::Map(map)) => {
                for (name, field) in fields {
                    match map.get(name) {
                        Some(v) => {
                            field.attr_type.validate(v).map_err(|e| {
                                TypeError::MapValueError {
                                    key: name.clone(),
                                    inner: Box::new(e),
                                }
                            })?;
                        }
                        None if field.required => {
                            return Err(TypeError::MissingRequired { name: name.clone() });
                        }
                        None => {}
                    }
                }
                Ok(())
            }

            _ => Err(TypeError::TypeMismatch {
                expected: self.type_name(),
                got: value.type_name(),
            }),
        }
    }

    fn type_name(&self) -> String {
        match self {
            AttributeType::String => "String".to_string(),
            AttributeType::Int => "Int".to_string(),
            AttributeType::Bool => "Bool".to_string(),
            AttributeType::Enum(variants) => format!("Enum({})", variants.join(" | ")),
            AttributeType::Custom { name, .. } => name.clone(),
            AttributeType::List(inner) => format!("List<{}>", inner.type_name()),
            AttributeType::Map(inner) => format!("Map<{}>", inner.type_name()),
            AttributeType::Object(_) => "Object".to_string(),
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.type_name())
    }
}

/// Type error
#[derive(Debug, Clone, thiserror::Error)]
pub enum TypeError {
    #[error("Type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("Invalid enum variant '{value}', expected one of: {}", expected.join(", "))]
    InvalidEnumVariant {
        value: String,
        expected: Vec<String>,
    },

    #[error("Validation failed: {message}")]
    ValidationFailed { message: String },

    #[error("Required attribute '{name}' is missing")]
    MissingRequired { name: String },

    #[error("Unknown attribute '{name}'")]
    UnknownAttribute { name: String },

    #[error("List item at index {index}: {inner}")]
    ListItemError { index: usize, inner: Box<TypeError> },

    #[error("Map value for key '{key}': {inner}")]
    MapValueError { key: String, inner: Box<TypeError> },
}

impl Value {
    fn type_name(&self) -> String {
        match self {
            Value::String(_) => "String".to_string(),
            Value::Int(_) => "Int".to_string(),
            Value::Bool(_) => "Bool".to_string(),
            Value::Null => "Null".to_string(),
            Value::List(_) => "List".to_string(),
            Value::Map(_) => "Map".to_string(),
            Value::Ref(binding, attr) => format!("Ref({}.{})", binding, attr),
        }
    }
}

/// Attribute schema
#[derive(Debug, Clone)]
pub struct AttributeSchema {
    pub name: String,
    pub attr_type: AttributeType,
    pub required: bool,
    /// Server-assigned attribute, never sent on create/update (ids, URLs)
    pub computed: bool,
    pub default: Option<Value>,
    pub description: Option<String>,
    /// Wire-side field name (e.g., "timeZone" for attribute "time_zone")
    pub api_name: Option<String>,
}

impl AttributeSchema {
    pub fn new(name: impl Into<String>, attr_type: AttributeType) -> Self {
        Self {
            name: name.into(),
            attr_type,
            required: false,
            computed: false,
            default: None,
            description: None,
            api_name: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_api_name(mut self, name: impl Into<String>) -> Self {
        self.api_name = Some(name.into());
        self
    }
}

/// Resource schema
#[derive(Debug, Clone)]
pub struct ResourceSchema {
    pub resource_type: String,
    pub attributes: HashMap<String, AttributeSchema>,
    pub description: Option<String>,
}

impl ResourceSchema {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            attributes: HashMap::new(),
            description: None,
        }
    }

    pub fn attribute(mut self, schema: AttributeSchema) -> Self {
        self.attributes.insert(schema.name.clone(), schema);
        self
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Look up the wire-side name for an attribute, if one is mapped
    pub fn api_name(&self, attr: &str) -> Option<&str> {
        self.attributes.get(attr).and_then(|a| a.api_name.as_deref())
    }

    /// Validate resource attributes
    ///
    /// Collects all errors rather than stopping at the first.
    pub fn validate(&self, attributes: &HashMap<String, Value>) -> Result<(), Vec<TypeError>> {
        let mut errors = Vec::new();

        // Check required attributes
        for (name, schema) in &self.attributes {
            if schema.required && !attributes.contains_key(name) && schema.default.is_none() {
                errors.push(TypeError::MissingRequired { name: name.clone() });
            }
        }

        // Type check each attribute
        for (name, value) in attributes {
            // Skip internal attributes (starting with _)
            if name.starts_with('_') {
                continue;
            }
            if let Some(schema) = self.attributes.get(name)
                && let Err(e) = schema.attr_type.validate(value)
            {
                errors.push(e);
            }
            // Unknown attributes are allowed (for flexibility)
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Helper functions for common types
pub mod types {
    use super::*;

    /// Positive integer type
    pub fn positive_int() -> AttributeType {
        AttributeType::Custom {
            name: "PositiveInt".to_string(),
            base: Box::new(AttributeType::Int),
            validate: |value| {
                if let Value::Int(n) = value {
                    if *n > 0 {
                        Ok(())
                    } else {
                        Err("Value must be positive".to_string())
                    }
                } else {
                    Err("Expected integer".to_string())
                }
            },
        }
    }

    /// CIDR block type (e.g., "192.168.128.0/24")
    pub fn cidr() -> AttributeType {
        AttributeType::Custom {
            name: "Cidr".to_string(),
            base: Box::new(AttributeType::String),
            validate: |value| {
                if let Value::String(s) = value {
                    validate_cidr(s)
                } else {
                    Err("Expected string".to_string())
                }
            },
        }
    }

    /// Meraki device serial type (e.g., "Q2XX-XXXX-XXXX")
    pub fn serial() -> AttributeType {
        AttributeType::Custom {
            name: "Serial".to_string(),
            base: Box::new(AttributeType::String),
            validate: |value| {
                if let Value::String(s) = value {
                    validate_serial(s)
                } else {
                    Err("Expected string".to_string())
                }
            },
        }
    }

    /// IANA timezone name type (e.g., "America/Los_Angeles")
    pub fn timezone() -> AttributeType {
        AttributeType::Custom {
            name: "Timezone".to_string(),
            base: Box::new(AttributeType::String),
            validate: |value| {
                if let Value::String(s) = value {
                    if s.is_empty() || s.starts_with('/') || s.ends_with('/') {
                        Err(format!("Invalid timezone '{}'", s))
                    } else {
                        Ok(())
                    }
                } else {
                    Err("Expected string".to_string())
                }
            },
        }
    }

    /// MAC address type (e.g., "00:18:0a:xx:xx:xx")
    pub fn mac() -> AttributeType {
        AttributeType::Custom {
            name: "Mac".to_string(),
            base: Box::new(AttributeType::String),
            validate: |value| {
                if let Value::String(s) = value {
                    validate_mac(s)
                } else {
                    Err("Expected string".to_string())
                }
            },
        }
    }
}

/// Validate CIDR block format (e.g., "192.168.128.0/24")
pub fn validate_cidr(cidr: &str) -> Result<(), String> {
    let parts: Vec<&str> = cidr.split('/').collect();
    if parts.len() != 2 {
        return Err(format!("Invalid CIDR format '{}': expected IP/prefix", cidr));
    }

    let ip = parts[0];
    let prefix = parts[1];

    // Validate IP address
    let octets: Vec<&str> = ip.split('.').collect();
    if octets.len() != 4 {
        return Err(format!("Invalid IP address '{}': expected 4 octets", ip));
    }

    for octet in &octets {
        match octet.parse::<u8>() {
            Ok(_) => {}
            Err(_) => {
                return Err(format!(
                    "Invalid octet '{}' in IP address: must be 0-255",
                    octet
                ));
            }
        }
    }

    // Validate prefix length
    match prefix.parse::<u8>() {
        Ok(p) if p <= 32 => Ok(()),
        Ok(p) => Err(format!("Invalid prefix length '{}': must be 0-32", p)),
        Err(_) => Err(format!(
            "Invalid prefix length '{}': must be a number",
            prefix
        )),
    }
}

/// Validate Meraki serial format: three groups of four alphanumerics
pub fn validate_serial(serial: &str) -> Result<(), String> {
    let groups: Vec<&str> = serial.split('-').collect();
    if groups.len() != 3 {
        return Err(format!(
            "Invalid serial '{}': expected XXXX-XXXX-XXXX",
            serial
        ));
    }
    for group in &groups {
        if group.len() != 4 || !group.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(format!(
                "Invalid serial '{}': groups must be 4 alphanumeric characters",
                serial
            ));
        }
    }
    Ok(())
}

/// Validate MAC address format: six colon-separated hex octets
pub fn validate_mac(mac: &str) -> Result<(), String> {
    let octets: Vec<&str> = mac.split(':').collect();
    if octets.len() != 6 {
        return Err(format!("Invalid MAC '{}': expected 6 octets", mac));
    }
    for octet in &octets {
        if octet.len() != 2 || !octet.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(format!("Invalid MAC '{}': octets must be 2 hex digits", mac));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_string_type() {
        let t = AttributeType::String;
        assert!(t.validate(&Value::String("hello".to_string())).is_ok());
        assert!(t.validate(&Value::Int(42)).is_err());
    }

    #[test]
    fn null_valid_for_any_type() {
        assert!(AttributeType::String.validate(&Value::Null).is_ok());
        assert!(AttributeType::Int.validate(&Value::Null).is_ok());
        assert!(types::cidr().validate(&Value::Null).is_ok());
    }

    #[test]
    fn validate_enum_type() {
        let t = AttributeType::Enum(vec!["wireless".to_string(), "appliance".to_string()]);
        assert!(t.validate(&Value::String("wireless".to_string())).is_ok());
        assert!(t.validate(&Value::String("camera".to_string())).is_err());
    }

    #[test]
    fn validate_positive_int() {
        let t = types::positive_int();
        assert!(t.validate(&Value::Int(1)).is_ok());
        assert!(t.validate(&Value::Int(0)).is_err());
        assert!(t.validate(&Value::Int(-1)).is_err());
    }

    #[test]
    fn validate_object_type() {
        let t = AttributeType::Object(HashMap::from([
            (
                "host".to_string(),
                AttributeSchema::new("host", AttributeType::String).required(),
            ),
            (
                "port".to_string(),
                AttributeSchema::new("port", AttributeType::Int),
            ),
        ]));

        let ok = Value::Map(HashMap::from([
            ("host".to_string(), Value::String("radius.corp".to_string())),
            ("port".to_string(), Value::Int(1812)),
        ]));
        assert!(t.validate(&ok).is_ok());

        let missing = Value::Map(HashMap::from([(
            "port".to_string(),
            Value::Int(1812),
        )]));
        assert!(t.validate(&missing).is_err());

        let wrong_type = Value::Map(HashMap::from([
            ("host".to_string(), Value::String("radius.corp".to_string())),
            ("port".to_string(), Value::String("1812".to_string())),
        ]));
        assert!(t.validate(&wrong_type).is_err());
    }

    #[test]
    fn validate_resource_schema() {
        let schema = ResourceSchema::new("network")
            .attribute(AttributeSchema::new("name", AttributeType::String).required())
            .attribute(AttributeSchema::new(
                "product_types",
                AttributeType::List(Box::new(AttributeType::String)),
            ))
            .attribute(AttributeSchema::new("time_zone", types::timezone()));

        let mut attrs = HashMap::new();
        attrs.insert("name".to_string(), Value::String("branch".to_string()));
        attrs.insert(
            "product_types".to_string(),
            Value::List(vec![Value::String("wireless".to_string())]),
        );
        attrs.insert(
            "time_zone".to_string(),
            Value::String("America/Los_Angeles".to_string()),
        );

        assert!(schema.validate(&attrs).is_ok());
    }

    #[test]
    fn missing_required_attribute() {
        let schema = ResourceSchema::new("network")
            .attribute(AttributeSchema::new("name", AttributeType::String).required());

        let attrs = HashMap::new();
        let result = schema.validate(&attrs);
        assert!(result.is_err());
    }

    #[test]
    fn api_name_lookup() {
        let schema = ResourceSchema::new("network").attribute(
            AttributeSchema::new("time_zone", types::timezone()).with_api_name("timeZone"),
        );
        assert_eq!(schema.api_name("time_zone"), Some("timeZone"));
        assert_eq!(schema.api_name("name"), None);
    }

    #[test]
    fn validate_cidr_type() {
        let t = types::cidr();

        assert!(
            t.validate(&Value::String("192.168.128.0/24".to_string()))
                .is_ok()
        );
        assert!(t.validate(&Value::String("0.0.0.0/0".to_string())).is_ok());

        assert!(t.validate(&Value::String("10.0.0.0".to_string())).is_err()); // no prefix
        assert!(
            t.validate(&Value::String("10.0.0.0/33".to_string()))
                .is_err()
        ); // prefix too large
        assert!(
            t.validate(&Value::String("10.0.0.256/16".to_string()))
                .is_err()
        ); // octet > 255
        assert!(t.validate(&Value::Int(42)).is_err()); // wrong type
    }

    #[test]
    fn validate_serial_type() {
        let t = types::serial();
        assert!(
            t.validate(&Value::String("Q2XX-ABCD-1234".to_string()))
                .is_ok()
        );
        assert!(t.validate(&Value::String("Q2XX-ABCD".to_string())).is_err());
        assert!(
            t.validate(&Value::String("Q2XX-ABCD-12345".to_string()))
                .is_err()
        );
        assert!(
            t.validate(&Value::String("Q2XX-AB!D-1234".to_string()))
                .is_err()
        );
    }

    #[test]
    fn validate_mac_type() {
        let t = types::mac();
        assert!(
            t.validate(&Value::String("00:18:0a:12:34:56".to_string()))
                .is_ok()
        );
        assert!(
            t.validate(&Value::String("00:18:0a:12:34".to_string()))
                .is_err()
        );
        assert!(
            t.validate(&Value::String("00:18:0a:12:34:zz".to_string()))
                .is_err()
        );
    }
}
