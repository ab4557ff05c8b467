//! # Section Components
//!
//! A compound section is built from an ordered list of components. Each
//! component pairs an outline file with a material identifier.
//!
//! ## Example
//!
//! ```rust
//! use section_core::components::{ComponentList, SectionComponent};
//!
//! let mut components = ComponentList::new();
//! components.add(SectionComponent::new("web.dxf", "steel"));
//! components.add(SectionComponent::new("slab.dxf", "Concrete"));
//!
//! let rows = components.table();
//! assert_eq!(rows[1].index, 2);
//! assert_eq!(rows[1].material, "Concrete");
//!
//! components.remove(0).unwrap();
//! assert_eq!(components.len(), 1);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{SectionError, SectionResult};
use crate::materials::normalize_id;

/// One outline file with its material.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionComponent {
    /// Stable identifier (survives reordering and removal of other components)
    pub id: Uuid,
    /// Outline file (DXF)
    pub file: PathBuf,
    /// Normalized material identifier
    pub material: String,
    /// Name shown in listings, defaults to the file name
    pub display_name: String,
}

impl SectionComponent {
    pub fn new(file: impl Into<PathBuf>, material: &str) -> Self {
        let file = file.into();
        let display_name = file_name(&file);
        SectionComponent {
            id: Uuid::new_v4(),
            file,
            material: normalize_id(material),
            display_name,
        }
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = name.into();
        self
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Row of the component listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentRow {
    /// 1-based position
    pub index: usize,
    pub file: String,
    /// Material identifier, capitalized for display
    pub material: String,
}

/// Ordered collection of section components.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentList {
    components: Vec<SectionComponent>,
}

impl ComponentList {
    pub fn new() -> Self {
        ComponentList::default()
    }

    /// Append a component. Returns its id.
    pub fn add(&mut self, component: SectionComponent) -> Uuid {
        let id = component.id;
        self.components.push(component);
        id
    }

    /// Remove the component at `index` (0-based).
    pub fn remove(&mut self, index: usize) -> SectionResult<SectionComponent> {
        if index >= self.components.len() {
            return Err(SectionError::component_not_found(format!(
                "index {} (have {} components)",
                index + 1,
                self.components.len()
            )));
        }
        Ok(self.components.remove(index))
    }

    /// Remove a component by id, if present.
    pub fn remove_by_id(&mut self, id: &Uuid) -> Option<SectionComponent> {
        let index = self.components.iter().position(|c| c.id == *id)?;
        Some(self.components.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&SectionComponent> {
        self.components.get(index)
    }

    pub fn get_mut_by_id(&mut self, id: &Uuid) -> Option<&mut SectionComponent> {
        self.components.iter_mut().find(|c| c.id == *id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SectionComponent> {
        self.components.iter()
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// Listing rows in order
    pub fn table(&self) -> Vec<ComponentRow> {
        self.components
            .iter()
            .enumerate()
            .map(|(i, c)| ComponentRow {
                index: i + 1,
                file: c.display_name.clone(),
                material: capitalize(&c.material),
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a ComponentList {
    type Item = &'a SectionComponent;
    type IntoIter = std::slice::Iter<'a, SectionComponent>;

    fn into_iter(self) -> Self::IntoIter {
        self.components.iter()
    }
}

/// Uppercase the first character and lowercase the rest.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_defaults() {
        let c = SectionComponent::new("/tmp/uploads/flange.dxf", "Steel");
        assert_eq!(c.display_name, "flange.dxf");
        assert_eq!(c.material, "steel");

        let named = c.with_display_name("Top flange");
        assert_eq!(named.display_name, "Top flange");
    }

    #[test]
    fn test_add_and_remove_preserves_order() {
        let mut list = ComponentList::new();
        list.add(SectionComponent::new("a.dxf", "steel"));
        let b = list.add(SectionComponent::new("b.dxf", "timber"));
        list.add(SectionComponent::new("c.dxf", "glass"));

        let removed = list.remove(0).unwrap();
        assert_eq!(removed.display_name, "a.dxf");
        assert_eq!(list.get(0).unwrap().id, b);
        assert_eq!(list.get(1).unwrap().display_name, "c.dxf");

        assert!(list.remove_by_id(&b).is_some());
        assert!(list.remove_by_id(&b).is_none());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_remove_out_of_range() {
        let mut list = ComponentList::new();
        let err = list.remove(0).unwrap_err();
        assert_eq!(err.error_code(), "COMPONENT_NOT_FOUND");
    }

    #[test]
    fn test_table_rows() {
        let mut list = ComponentList::new();
        list.add(SectionComponent::new("web.dxf", "aluminium"));
        list.add(SectionComponent::new("deck.dxf", "carbon fibre"));
        let rows = list.table();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].index, 1);
        assert_eq!(rows[0].material, "Aluminium");
        assert_eq!(rows[1].material, "Carbon_fibre");
    }

    #[test]
    fn test_capitalize() {
        assert_eq!(capitalize("steel"), "Steel");
        assert_eq!(capitalize("STEEL"), "Steel");
        assert_eq!(capitalize(""), "");
    }

    #[test]
    fn test_serializes_as_array() {
        let mut list = ComponentList::new();
        list.add(SectionComponent::new("a.dxf", "steel"));
        let json = serde_json::to_string(&list).unwrap();
        assert!(json.starts_with('['));
        let parsed: ComponentList = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, list);
    }
}
