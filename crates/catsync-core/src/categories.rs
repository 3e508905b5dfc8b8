//! Category hierarchy reconstructed from the catalog's folder records.
//!
//! Folders arrive flat, linked only by `Parent_Key`. They are kept in an
//! id-keyed arena and a product's ancestry is resolved by walking parent ids
//! upward, bounded by the folder count so a cyclic tree fails instead of
//! looping.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::CategoryError;
use crate::fields;

/// A catalog folder as stored in the ERP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    /// `None` for top-level folders.
    pub parent_id: Option<String>,
}

impl Category {
    /// Builds a category from a folder entity. Returns `None` when the record
    /// has no `Ref_Key`.
    #[must_use]
    pub fn from_entity(entity: &Entity) -> Option<Self> {
        let id = entity.text(fields::REF_KEY).filter(|s| !s.is_empty())?;
        Some(Self {
            id: id.to_owned(),
            name: entity.text(fields::DESCRIPTION).unwrap_or_default().to_owned(),
            parent_id: parent_id_of(entity),
        })
    }
}

/// A category on a resolved ancestor chain.
///
/// `nesting_level` counts from the top-level folder (level 0) downward, so
/// the top-level folder's direct children sit at level 1.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCategory {
    pub id: String,
    pub name: String,
    pub nesting_level: usize,
}

/// Reads an entity's parent reference, treating absent, empty and nil-GUID
/// values as "no parent".
#[must_use]
pub fn parent_id_of(entity: &Entity) -> Option<String> {
    entity
        .text(fields::PARENT_KEY)
        .filter(|p| !p.is_empty() && *p != fields::NIL_GUID)
        .map(str::to_owned)
}

/// Id-keyed arena of every folder in the catalog.
#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    folders: HashMap<String, Category>,
}

impl CategoryTree {
    #[must_use]
    pub fn new(categories: impl IntoIterator<Item = Category>) -> Self {
        let folders = categories
            .into_iter()
            .map(|c| (c.id.clone(), c))
            .collect();
        Self { folders }
    }

    /// Builds the tree from the entities flagged `IsFolder`; other records
    /// are ignored.
    pub fn from_entities<'a>(entities: impl IntoIterator<Item = &'a Entity>) -> Self {
        Self::new(
            entities
                .into_iter()
                .filter(|e| e.flag(fields::IS_FOLDER) == Some(true))
                .filter_map(Category::from_entity),
        )
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.folders.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.folders.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Category> {
        self.folders.get(id)
    }

    /// Resolves the chain from `folder_id` (first) up to its top-level folder
    /// (last), with nesting levels assigned from the top down.
    ///
    /// # Errors
    ///
    /// - [`CategoryError::UnknownCategory`] if `folder_id` is not a folder.
    /// - [`CategoryError::UnknownParent`] if a parent reference on the way up
    ///   does not resolve.
    /// - [`CategoryError::Cycle`] if the walk visits more folders than exist.
    pub fn resolve_ancestors(
        &self,
        folder_id: &str,
    ) -> Result<Vec<ResolvedCategory>, CategoryError> {
        let mut current = self
            .folders
            .get(folder_id)
            .ok_or_else(|| CategoryError::UnknownCategory {
                id: folder_id.to_owned(),
            })?;
        let mut chain: Vec<&Category> = vec![current];

        while let Some(parent_id) = current.parent_id.as_deref() {
            current = self
                .folders
                .get(parent_id)
                .ok_or_else(|| CategoryError::UnknownParent {
                    id: current.id.clone(),
                    parent_id: parent_id.to_owned(),
                })?;
            chain.push(current);
            if chain.len() > self.folders.len() {
                return Err(CategoryError::Cycle {
                    start_id: folder_id.to_owned(),
                    bound: self.folders.len(),
                });
            }
        }

        let depth = chain.len();
        Ok(chain
            .into_iter()
            .enumerate()
            .map(|(idx, category)| ResolvedCategory {
                id: category.id.clone(),
                name: category.name.clone(),
                nesting_level: depth - 1 - idx,
            })
            .collect())
    }
}

/// The brand of a product: the name of the level-1 category on its chain,
/// or `""` for unclassified products.
#[must_use]
pub fn brand_of(ancestors: &[ResolvedCategory]) -> &str {
    ancestors
        .iter()
        .find(|c| c.nesting_level == 1)
        .map_or("", |c| c.name.as_str())
}
