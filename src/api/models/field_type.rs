use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Shape inferred for a single document value.
///
/// Serialized with a `kind` tag so the JSON form reads
/// `{"kind": "array", "itemType": {"kind": "objectId", "isReference": true}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FieldType {
    Null,
    /// Item type of an empty array.
    Unknown,
    Primitive {
        name: String,
    },
    #[serde(rename_all = "camelCase")]
    ObjectId {
        is_reference: bool,
    },
    #[serde(rename_all = "camelCase")]
    Array {
        item_type: Box<FieldType>,
    },
    Object {
        fields: IndexMap<String, FieldType>,
    },
    /// Every distinct shape observed for a field (union merge strategy only).
    Union {
        variants: Vec<FieldType>,
    },
}

impl FieldType {
    pub fn primitive(name: impl Into<String>) -> Self {
        FieldType::Primitive { name: name.into() }
    }

    pub fn object_id() -> Self {
        FieldType::ObjectId { is_reference: true }
    }

    pub fn array_of(item_type: FieldType) -> Self {
        FieldType::Array {
            item_type: Box::new(item_type),
        }
    }

    pub fn is_object_id(&self) -> bool {
        matches!(self, FieldType::ObjectId { is_reference: true })
    }

    pub fn is_array(&self) -> bool {
        matches!(self, FieldType::Array { .. })
    }

    /// Array whose items are ObjectId references (`tagIds: [ObjectId, ...]`).
    pub fn is_reference_array(&self) -> bool {
        match self {
            FieldType::Array { item_type } => item_type.is_object_id(),
            _ => false,
        }
    }

    /// Short name used by diagrams and diff details.
    ///
    /// Arrays append `[]` to the item name, objects collapse to `object`,
    /// unions to `mixed`. Nested arrays are unrolled in a loop.
    pub fn type_name(&self) -> String {
        let mut depth = 0;
        let mut current = self;
        while let FieldType::Array { item_type } = current {
            depth += 1;
            current = item_type;
        }

        let base = match current {
            FieldType::Null => "null".to_string(),
            // Arrays never reach here; the loop above consumed them.
            FieldType::Unknown | FieldType::Array { .. } => "unknown".to_string(),
            FieldType::Primitive { name } => name.to_lowercase(),
            FieldType::ObjectId { .. } => "ObjectId".to_string(),
            FieldType::Object { .. } => "object".to_string(),
            FieldType::Union { .. } => "mixed".to_string(),
        };

        format!("{}{}", base, "[]".repeat(depth))
    }
}
