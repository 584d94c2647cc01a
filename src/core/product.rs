//! Products - the externally consumable artifacts of a package.

use serde::{Deserialize, Serialize};

/// How a library product is linked into its consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LibraryType {
    /// Let the build tool pick static or dynamic linkage
    #[default]
    Automatic,
    #[serde(alias = "staticlib")]
    Static,
    #[serde(alias = "dylib", alias = "shared")]
    Dynamic,
}

/// What kind of artifact a product is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProductKind {
    Library {
        #[serde(rename = "type")]
        library_type: LibraryType,
    },
    Executable,
    Plugin,
}

impl ProductKind {
    pub fn library() -> Self {
        ProductKind::Library {
            library_type: LibraryType::Automatic,
        }
    }

    pub fn is_library(&self) -> bool {
        matches!(self, ProductKind::Library { .. })
    }
}

/// A validated product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub name: String,

    #[serde(flatten)]
    pub kind: ProductKind,

    /// Names of the targets that compose this product, in declaration order
    pub targets: Vec<String>,
}

impl Product {
    /// Get the file the build tool produces when linking this product.
    pub fn output_filename(&self) -> String {
        match self.kind {
            ProductKind::Library {
                library_type: LibraryType::Automatic | LibraryType::Static,
            } => format!("lib{}.a", self.name),
            ProductKind::Library {
                library_type: LibraryType::Dynamic,
            } => format!("lib{}.dylib", self.name),
            ProductKind::Executable | ProductKind::Plugin => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(kind: ProductKind) -> Product {
        Product {
            name: "TableKit".to_string(),
            kind,
            targets: vec!["TableKit".to_string()],
        }
    }

    #[test]
    fn test_output_filename() {
        assert_eq!(product(ProductKind::library()).output_filename(), "libTableKit.a");
        assert_eq!(
            product(ProductKind::Library {
                library_type: LibraryType::Dynamic
            })
            .output_filename(),
            "libTableKit.dylib"
        );
        assert_eq!(product(ProductKind::Executable).output_filename(), "TableKit");
    }

    #[test]
    fn test_product_serializes_flat_kind() {
        let json = serde_json::to_value(product(ProductKind::library())).unwrap();
        assert_eq!(json["kind"], "library");
        assert_eq!(json["type"], "automatic");
        assert_eq!(json["name"], "TableKit");
    }
}
