//! The Commands database schema.
//!
//! The schema is static data. Field kinds are enums rather than free-form json so the
//! set of fields and select options cannot drift at runtime.
use serde::ser::{Serialize, SerializeMap, Serializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    Default,
    Gray,
    Brown,
    Orange,
    Yellow,
    Green,
    Blue,
    Purple,
    Pink,
    Red,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct SelectOption {
    pub name: &'static str,
    pub color: Color,
}

/// Serializes in the workspace service's property-schema shape, e.g. `{"title": {}}`.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKind {
    Title {},
    Select { options: &'static [SelectOption] },
    RichText {},
    CreatedTime {},
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropertyDescriptor {
    pub name: &'static str,
    pub kind: PropertyKind,
}

/// An ordered, immutable list of field descriptors.
#[derive(Debug, PartialEq, Eq)]
pub struct Schema(&'static [PropertyDescriptor]);

pub const COMMAND_STATUSES: &[SelectOption] = &[
    SelectOption {
        name: "Deploy",
        color: Color::Blue,
    },
    SelectOption {
        name: "Processing",
        color: Color::Yellow,
    },
    SelectOption {
        name: "Completed",
        color: Color::Green,
    },
    SelectOption {
        name: "Failed",
        color: Color::Red,
    },
    SelectOption {
        name: "Cancelled",
        color: Color::Gray,
    },
];

pub static COMMANDS_SCHEMA: Schema = Schema(&[
    PropertyDescriptor {
        name: "Name",
        kind: PropertyKind::Title {},
    },
    PropertyDescriptor {
        name: "Status",
        kind: PropertyKind::Select {
            options: COMMAND_STATUSES,
        },
    },
    PropertyDescriptor {
        name: "Entity ID",
        kind: PropertyKind::RichText {},
    },
    PropertyDescriptor {
        name: "Payload",
        kind: PropertyKind::RichText {},
    },
    PropertyDescriptor {
        name: "Notes",
        kind: PropertyKind::RichText {},
    },
    PropertyDescriptor {
        name: "Created",
        kind: PropertyKind::CreatedTime {},
    },
]);

impl Schema {
    pub fn fields(&self) -> &'static [PropertyDescriptor] {
        self.0
    }

    pub fn get(&self, name: &str) -> Option<&'static PropertyDescriptor> {
        self.0.iter().find(|field| field.name == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PropertyKind {
    /// The service's name for the property type
    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyKind::Title {} => "title",
            PropertyKind::Select { .. } => "select",
            PropertyKind::RichText {} => "rich_text",
            PropertyKind::CreatedTime {} => "created_time",
        }
    }
}

// A map keyed by field name, in declaration order
impl Serialize for Schema {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for field in self.0 {
            map.serialize_entry(field.name, &field.kind)?;
        }
        map.end()
    }
}
