//! Table and collection descriptions for the model backends.

use serde::{Deserialize, Serialize};

fn default_package() -> String {
    "model".to_string()
}

/// SQL tables to generate models for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSpec {
    #[serde(default = "default_package")]
    pub package: String,
    #[serde(default)]
    pub cache: bool,
    #[serde(default)]
    pub tables: Vec<Table>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub name: String,
    #[serde(default)]
    pub fields: Vec<Field>,
}

/// One column: its SQL name, Go type and optional comment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub type_name: String,
    #[serde(default)]
    pub comment: Option<String>,
}

impl Table {
    /// Whether any column maps to `time.Time`
    pub fn uses_time(&self) -> bool {
        self.fields.iter().any(|f| f.type_name.contains("time.Time"))
    }
}

/// Mongo document types to generate models for
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MongoSpec {
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub cache: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_defaults() {
        let spec: ModelSpec = serde_yaml::from_str(
            "tables:\n  - name: user\n    fields:\n      - {name: id, type_name: int64}\n",
        )
        .unwrap();
        assert_eq!(spec.package, "model");
        assert!(!spec.cache);
        assert!(!spec.tables[0].uses_time());
    }

    #[test]
    fn test_uses_time() {
        let table = Table {
            name: "order".into(),
            fields: vec![Field {
                name: "created_at".into(),
                type_name: "time.Time".into(),
                comment: None,
            }],
        };
        assert!(table.uses_time());
    }
}
