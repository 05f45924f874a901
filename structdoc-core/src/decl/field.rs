//! Struct field declarations.

use core::fmt;

use super::{tag, TypeExpr};

/// One field declaration line of a struct: `A, B T `tag` // comment`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    /// Empty for an embedded field.
    names: Vec<String>,
    ty: TypeExpr,
    /// The tag literal's content, without quotes.
    tag: Option<String>,
    /// The raw text of the trailing same-line comment, without `//` or `/* */`.
    comment: Option<String>,
}

impl FieldDecl {
    /// A field declaring one or more names of the same type.
    pub fn with_names(names: Vec<String>, ty: TypeExpr) -> Self {
        Self {
            names,
            ty,
            tag: None,
            comment: None,
        }
    }

    /// A field with a single name.
    pub fn named(name: impl Into<String>, ty: TypeExpr) -> Self {
        Self::with_names(vec![name.into()], ty)
    }

    /// An embedded field.
    pub fn embedded(ty: TypeExpr) -> Self {
        Self::with_names(Vec::new(), ty)
    }

    /// Sets the tag content (e.g. `json:"name,omitempty"`).
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    /// Sets the trailing comment text.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// The declared names; empty when embedded.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Whether the field is embedded (declared without a name).
    pub fn is_embedded(&self) -> bool {
        self.names.is_empty()
    }

    /// The declared type.
    pub fn ty(&self) -> &TypeExpr {
        &self.ty
    }

    /// The raw tag content.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// The name this field has under the tag `key`.
    ///
    /// That is the tag value up to the first comma, so `json:"id,omitempty"` gives `id`. Empty
    /// when the field has no tag or the tag has no such key.
    pub fn external_name(&self, key: &str) -> String {
        self.tag
            .as_deref()
            .and_then(|t| tag::lookup(t, key))
            .map(|value| match value.split_once(',') {
                Some((name, _)) => name.to_string(),
                None => value,
            })
            .unwrap_or_default()
    }

    /// The trailing comment, trimmed.
    pub fn description(&self) -> &str {
        self.comment.as_deref().map(str::trim).unwrap_or_default()
    }
}

impl fmt::Display for FieldDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.names.is_empty() {
            write!(f, "{} ", self.names.join(", "))?;
        }
        write!(f, "{}", self.ty)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_name() {
        let field = FieldDecl::named("Id", TypeExpr::ident("int"))
            .with_tag(r#"json:"id,omitempty" yaml:"ident""#);
        assert_eq!(field.external_name("json"), "id");
        assert_eq!(field.external_name("yaml"), "ident");
        assert_eq!(field.external_name("xml"), "");

        let untagged = FieldDecl::named("Id", TypeExpr::ident("int"));
        assert_eq!(untagged.external_name("json"), "");
    }

    #[test]
    fn description_is_trimmed() {
        let field = FieldDecl::named("Name", TypeExpr::ident("string")).with_comment("  名字 ");
        assert_eq!(field.description(), "名字");
        assert_eq!(
            FieldDecl::embedded(TypeExpr::ident("Base")).description(),
            ""
        );
    }

    #[test]
    fn display() {
        let field = FieldDecl::with_names(vec!["A".into(), "B".into()], TypeExpr::ident("int"));
        assert_eq!(field.to_string(), "A, B int");
        assert!(!field.is_embedded());
    }
}
