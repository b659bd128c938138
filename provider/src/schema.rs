//! Attribute schemas the host uses to plan and validate configuration.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    String,
    Int64,
}

/// Who supplies an attribute's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeMode {
    Required,
    Optional,
    /// Set by the provider from the service's response.
    Computed,
    /// May be configured; filled in by the provider when left out.
    OptionalComputed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: &'static str,
    pub kind: AttributeKind,
    pub mode: AttributeMode,
    pub description: &'static str,
    pub default: Option<&'static str>,
    /// Allowed values; empty means unrestricted.
    pub one_of: Vec<&'static str>,
}

impl Attribute {
    fn new(name: &'static str, kind: AttributeKind, mode: AttributeMode, description: &'static str) -> Self {
        Self {
            name,
            kind,
            mode,
            description,
            default: None,
            one_of: Vec::new(),
        }
    }

    pub fn required(name: &'static str, kind: AttributeKind, description: &'static str) -> Self {
        Self::new(name, kind, AttributeMode::Required, description)
    }

    pub fn computed(name: &'static str, kind: AttributeKind, description: &'static str) -> Self {
        Self::new(name, kind, AttributeMode::Computed, description)
    }

    pub fn optional_computed(name: &'static str, kind: AttributeKind, description: &'static str) -> Self {
        Self::new(name, kind, AttributeMode::OptionalComputed, description)
    }

    pub fn with_default(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    pub fn with_one_of(mut self, values: impl IntoIterator<Item = &'static str>) -> Self {
        self.one_of = values.into_iter().collect();
        self
    }

    pub fn accepts(&self, value: &str) -> bool {
        self.one_of.is_empty() || self.one_of.contains(&value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    pub description: &'static str,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn new(description: &'static str) -> Self {
        Self {
            description,
            attributes: Vec::new(),
        }
    }

    pub fn with_attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    pub fn required(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes
            .iter()
            .filter(|a| a.mode == AttributeMode::Required)
    }
}
