use serde::Serialize;

/// The flattened fields of one struct type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeDescription {
    package: String,
    name: String,
    fields: Vec<FieldDescription>,
}

impl TypeDescription {
    /// Creates a new description.
    pub fn new(
        package: impl Into<String>,
        name: impl Into<String>,
        fields: Vec<FieldDescription>,
    ) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
            fields,
        }
    }

    /// The package path the type is declared in; empty for the module root.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// The type name.
    ///
    /// Inline struct types are named after the field holding them: `Object.Array`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The fields, in declaration order with embedded fields promoted in place.
    pub fn fields(&self) -> &[FieldDescription] {
        &self.fields
    }

    /// Consumes the description, returning its fields.
    pub fn into_fields(self) -> Vec<FieldDescription> {
        self.fields
    }
}

/// One serialized field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldDescription {
    name: String,
    #[serde(rename = "type")]
    ty: String,
    description: String,
}

impl FieldDescription {
    /// Creates a new field description.
    pub fn new(
        name: impl Into<String>,
        ty: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
            description: description.into(),
        }
    }

    /// The name from the tag; empty if untagged.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type signature, e.g. `[]*mp.Jump`.
    pub fn ty(&self) -> &str {
        &self.ty
    }

    /// The trailing comment of the field; empty if absent.
    pub fn description(&self) -> &str {
        &self.description
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serialize() {
        let desc = TypeDescription::new(
            "demo/pkg1",
            "Animal",
            vec![FieldDescription::new("name", "string", "")],
        );
        let json = serde_json::to_string(&desc).unwrap();
        assert_eq!(
            json,
            r#"{"package":"demo/pkg1","name":"Animal","fields":[{"name":"name","type":"string","description":""}]}"#
        );
    }
}
