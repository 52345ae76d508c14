//! Name-keyed object namespaces.
//!
//! Compiled objects reference each other by name, so every namespace must hand
//! out stable, unique names. Registration goes through [`Namespace::register`],
//! which applies the collision rule instead of overwriting:
//!
//! - same name, same content (ignoring descriptions): the existing object is
//!   kept and the new one is discarded;
//! - same name, different content: the new object is renamed with
//!   [`DUPE_SUFFIX`] and inserted. The suffixed name is not probed again, so a
//!   third colliding object replaces the earlier `_dupe` entry.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const DUPE_SUFFIX: &str = "_dupe";

/// An object that lives in a [`Namespace`].
pub trait Named {
    fn name(&self) -> &str;
    fn rename(&mut self, name: String);
    /// Content equality for collision handling.
    fn same_content(&self, other: &Self) -> bool;
}

/// Outcome of [`Namespace::register`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    Inserted(String),
    /// Identical object already present under this name.
    Duplicate(String),
    /// Content differed; inserted under the suffixed name.
    Renamed(String),
}

impl Registration {
    /// The name other objects should use to refer to the registered object.
    pub fn name(&self) -> &str {
        match self {
            Registration::Inserted(name)
            | Registration::Duplicate(name)
            | Registration::Renamed(name) => name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Namespace<T> {
    entries: IndexMap<String, T>,
}

impl<T> Default for Namespace<T> {
    fn default() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }
}

impl<T> Namespace<T> {
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &T)> {
        self.entries.iter()
    }
}

impl<T: Named> Namespace<T> {
    pub fn register(&mut self, mut object: T) -> Registration {
        let name = object.name().to_string();
        match self.entries.get(&name) {
            None => {
                self.entries.insert(name.clone(), object);
                Registration::Inserted(name)
            }
            Some(existing) if existing.same_content(&object) => {
                tracing::info!("fully duplicate object {name}, keeping the first definition");
                Registration::Duplicate(name)
            }
            Some(_) => {
                let renamed = format!("{name}{DUPE_SUFFIX}");
                tracing::info!("duplicate name {name} with different content, renaming to {renamed}");
                object.rename(renamed.clone());
                self.entries.insert(renamed.clone(), object);
                Registration::Renamed(renamed)
            }
        }
    }
}
