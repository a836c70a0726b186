//! Material registry: maps [`MaterialId`] values to block states and back.
//!
//! Air is always material 0 with block state 0 so that zero-filled chunks
//! are empty. Each material has one default state and may register extra
//! variant states; every variant converts back to its material.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use quarry_edit::{BlockRegistry, BlockState, MaterialId};

/// Descriptor for a registered material.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterialDef {
    /// Human-readable name (e.g. "stone", "oak_planks").
    pub name: String,
}

impl MaterialDef {
    /// A material called `name`.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

/// Errors raised by [`MaterialRegistry`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A material with the same name has already been registered.
    #[error("duplicate material name: {0}")]
    DuplicateName(String),
    /// No material has this id.
    #[error("unknown material id {0:?}")]
    UnknownMaterial(MaterialId),
    /// No material produced this block state.
    #[error("unknown block state {0:?}")]
    UnknownState(BlockState),
    /// All material ids are in use.
    #[error("material registry is full")]
    RegistryFull,
}

struct Entry {
    def: MaterialDef,
    default_state: BlockState,
}

/// Dense material table with reverse lookups by name and by state.
pub struct MaterialRegistry {
    /// Indexed by `MaterialId.0`.
    materials: Vec<Entry>,
    /// Indexed by `BlockState.0`.
    state_owner: Vec<MaterialId>,
    name_to_id: HashMap<String, MaterialId>,
}

impl MaterialRegistry {
    /// Creates a registry with Air pre-registered as material 0, state 0.
    pub fn new() -> Self {
        let air = MaterialDef::named("air");
        let mut name_to_id = HashMap::new();
        name_to_id.insert(air.name.clone(), MaterialId(0));

        Self {
            materials: vec![Entry {
                def: air,
                default_state: BlockState(0),
            }],
            state_owner: vec![MaterialId(0)],
            name_to_id,
        }
    }

    /// Registers a material and returns its id.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateName`] if the name is taken, or
    /// [`RegistryError::RegistryFull`] if every `u16` id is in use.
    pub fn register(&mut self, def: MaterialDef) -> Result<MaterialId, RegistryError> {
        if self.name_to_id.contains_key(&def.name) {
            return Err(RegistryError::DuplicateName(def.name));
        }
        let id = u16::try_from(self.materials.len())
            .map(MaterialId)
            .map_err(|_| RegistryError::RegistryFull)?;
        let default_state = self.next_state(id)?;

        self.name_to_id.insert(def.name.clone(), id);
        self.materials.push(Entry { def, default_state });
        Ok(id)
    }

    /// Allocates an additional block state belonging to `material`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownMaterial`] if `material` is not
    /// registered.
    pub fn register_variant(&mut self, material: MaterialId) -> Result<BlockState, RegistryError> {
        if self.materials.get(material.0 as usize).is_none() {
            return Err(RegistryError::UnknownMaterial(material));
        }
        self.next_state(material)
    }

    /// Returns the definition of `material`.
    pub fn get(&self, material: MaterialId) -> Option<&MaterialDef> {
        self.materials.get(material.0 as usize).map(|e| &e.def)
    }

    /// Returns the id of a named material.
    pub fn lookup_by_name(&self, name: &str) -> Option<MaterialId> {
        self.name_to_id.get(name).copied()
    }

    /// Number of registered materials, including Air.
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// Returns `true` if only Air is registered.
    pub fn is_empty(&self) -> bool {
        self.materials.len() <= 1
    }

    fn next_state(&mut self, owner: MaterialId) -> Result<BlockState, RegistryError> {
        let state = u32::try_from(self.state_owner.len())
            .map(BlockState)
            .map_err(|_| RegistryError::RegistryFull)?;
        self.state_owner.push(owner);
        Ok(state)
    }
}

impl Default for MaterialRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRegistry for MaterialRegistry {
    type Error = RegistryError;

    fn material_to_state(&self, material: MaterialId) -> Result<BlockState, RegistryError> {
        self.materials
            .get(material.0 as usize)
            .map(|e| e.default_state)
            .ok_or(RegistryError::UnknownMaterial(material))
    }

    fn state_to_material(&self, state: BlockState) -> Result<MaterialId, RegistryError> {
        self.state_owner
            .get(state.0 as usize)
            .copied()
            .ok_or(RegistryError::UnknownState(state))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
