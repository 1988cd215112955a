use std::collections::BTreeMap;

/// Value of a Tiled custom property.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// `bool`
    Bool(bool),
    /// `int`, also used for `object` references
    Int(i64),
    /// `float`
    Float(f64),
    /// `string`
    String(String),
    /// Path relative to the descriptor
    File(String),
    /// `#AARRGGBB` colour string
    Color(String),
}

impl PropertyValue {
    /// Name Tiled uses for this value's type.
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Int(_) => "int",
            PropertyValue::Float(_) => "float",
            PropertyValue::String(_) => "string",
            PropertyValue::File(_) => "file",
            PropertyValue::Color(_) => "color",
        }
    }
}

/// Named custom properties, ordered by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties(BTreeMap<String, PropertyValue>);

impl Properties {
    /// An empty property set.
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: String, value: PropertyValue) {
        self.0.insert(name, value);
    }

    /// Raw value by name.
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.0.get(name)
    }

    /// Value of a `bool` property.
    pub fn get_bool(&self, name: &str) -> Option<bool> {
        match self.get(name)? {
            PropertyValue::Bool(v) => Some(*v),
            _ => None,
        }
    }

    /// Value of an `int` property.
    pub fn get_i64(&self, name: &str) -> Option<i64> {
        match self.get(name)? {
            PropertyValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    /// `None` if the value does not fit in an `i32`.
    pub fn get_i32(&self, name: &str) -> Option<i32> {
        self.get_i64(name).and_then(|v| i32::try_from(v).ok())
    }

    /// Value of a `float` property.
    pub fn get_f64(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            PropertyValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// Value of a `float` property, narrowed to `f32`.
    pub fn get_f32(&self, name: &str) -> Option<f32> {
        self.get_f64(name).map(|v| v as f32)
    }

    /// String-like values: `string`, `file` and `color`.
    pub fn get_string(&self, name: &str) -> Option<&str> {
        match self.get(name)? {
            PropertyValue::String(s) | PropertyValue::File(s) | PropertyValue::Color(s) => {
                Some(s)
            }
            _ => None,
        }
    }

    /// Properties in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> + '_ {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of properties.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no properties.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
