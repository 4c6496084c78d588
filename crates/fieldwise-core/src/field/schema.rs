use core::fmt;

/// Static description of a field tag enumeration.
///
/// Schemas are compared by identity: two tag types are the same iff their
/// `schema()` functions return the same static.
pub struct TagSchema {
    /// Name of the tag type, used in diagnostics
    pub name: &'static str,

    /// Fields in declaration order
    pub fields: &'static [FieldInfo],
}

/// One field of a [`TagSchema`].
pub struct FieldInfo {
    /// Textual name of the field
    pub name: &'static str,

    /// Schema of the nested tag type, for fields holding field-aware values
    pub nested: Option<fn() -> &'static TagSchema>,
}

impl TagSchema {
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Index of the field called `name`.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|field| field.name == name)
    }

    pub fn field(&self, ordinal: usize) -> Option<&'static FieldInfo> {
        self.fields.get(ordinal)
    }

    pub fn is(&'static self, other: &'static TagSchema) -> bool {
        core::ptr::eq(self, other)
    }
}

impl FieldInfo {
    pub fn nested_schema(&self) -> Option<&'static TagSchema> {
        self.nested.map(|schema| schema())
    }
}

impl fmt::Debug for TagSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagSchema")
            .field("name", &self.name)
            .field("fields", &self.fields)
            .finish()
    }
}

impl fmt::Debug for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Nested schemas may be recursive, print only their names.
        f.debug_struct("FieldInfo")
            .field("name", &self.name)
            .field("nested", &self.nested_schema().map(|schema| schema.name))
            .finish()
    }
}
