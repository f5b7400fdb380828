//! Record layouts.
//!
//! A [`Schema`] is an ordered list of named primitive fields packed
//! back-to-back with no padding. Layouts are declared once, through
//! [`SchemaBuilder`], and the total size is fixed at that point:
//!
//! ```
//! use ipts::{PrimitiveType::*, Schema};
//!
//! let packet = Schema::builder("Packet")
//!     .field(U8, "type")
//!     .field(U8, "flags")
//!     .field(U16, "size")
//!     .build();
//! assert_eq!(packet.size(), 4);
//! ```

use ipts_buffers::PrimitiveType;

/// One field of a record layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    pub ty: PrimitiveType,
    /// Repeat count; `1` is a scalar, anything larger an inline array.
    pub count: usize,
    pub name: String,
    /// Byte offset from the start of the record.
    pub offset: usize,
}

impl Field {
    pub fn size(&self) -> usize {
        self.ty.size() * self.count
    }
}

/// A fixed-size record layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    name: &'static str,
    fields: Vec<Field>,
    size: usize,
}

impl Schema {
    pub fn builder(name: &'static str) -> SchemaBuilder {
        SchemaBuilder {
            name,
            fields: Vec::new(),
            offset: 0,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Encoded size in bytes.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Index of the named field.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}

/// Accumulates fields in declaration order.
#[derive(Debug)]
pub struct SchemaBuilder {
    name: &'static str,
    fields: Vec<Field>,
    offset: usize,
}

impl SchemaBuilder {
    /// Appends a scalar field. An empty name marks a reserved field.
    pub fn field(self, ty: PrimitiveType, name: &str) -> Self {
        self.array(ty, 1, name)
    }

    /// Appends an inline array of `count` values.
    ///
    /// Reserved fields (empty name) are named `unknown<offset>`.
    pub fn array(mut self, ty: PrimitiveType, count: usize, name: &str) -> Self {
        let name = if name.is_empty() {
            format!("unknown{}", self.offset)
        } else {
            name.to_string()
        };
        self.fields.push(Field {
            ty,
            count,
            name,
            offset: self.offset,
        });
        self.offset += ty.size() * count;
        self
    }

    /// Freezes the layout.
    ///
    /// # Panics
    ///
    /// On a layout that does not pack contiguously or that repeats a field
    /// name. Both are mistakes in a declaration, not in input data.
    pub fn build(self) -> Schema {
        let mut packed = 0;
        for field in &self.fields {
            assert!(field.count > 0, "{}.{}: zero repeat count", self.name, field.name);
            assert_eq!(
                field.offset, packed,
                "{}.{}: field is not packed contiguously",
                self.name, field.name
            );
            packed += field.size();
        }
        assert_eq!(packed, self.offset, "{}: size mismatch", self.name);
        for (i, field) in self.fields.iter().enumerate() {
            assert!(
                !self.fields[..i].iter().any(|f| f.name == field.name),
                "{}: duplicate field `{}`",
                self.name,
                field.name
            );
        }
        Schema {
            name: self.name,
            fields: self.fields,
            size: packed,
        }
    }
}
