use std::collections::BTreeMap;
use std::fmt;

use crate::builtins;
use crate::error::{Partition, RegistryError};
use crate::machine::Machine;

/// A caller-supplied command.
pub type CustomCommand = Box<dyn Fn(&mut Machine)>;

/// Maps instruction characters to commands.
///
/// Lookups consult the static built-in table first and then this instance's
/// custom commands; the two are never merged.
#[derive(Default)]
pub struct CommandRegistry {
    custom: BTreeMap<char, CustomCommand>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Find the command named `name`, built-in or custom.
    pub fn resolve(&self, name: char) -> Option<&dyn Fn(&mut Machine)> {
        if let Some(builtin) = builtins::lookup(name) {
            return Some(builtin as &dyn Fn(&mut Machine));
        }
        self.custom.get(&name).map(|c| c.as_ref())
    }

    /// Register a custom command. The registry is left untouched on error.
    pub fn add_custom(&mut self, name: char, command: CustomCommand) -> Result<(), RegistryError> {
        if name == '[' || name == ']' {
            return Err(RegistryError::ReservedName { name });
        }
        if builtins::is_builtin(name) {
            return Err(RegistryError::DuplicateCommand { name, partition: Partition::Builtin });
        }
        if self.custom.contains_key(&name) {
            return Err(RegistryError::DuplicateCommand { name, partition: Partition::Custom });
        }
        self.custom.insert(name, command);
        tracing::debug!(%name, "registered custom command");
        Ok(())
    }

    pub fn remove_custom(&mut self, name: char) -> Result<(), RegistryError> {
        match self.custom.remove(&name) {
            Some(_) => {
                tracing::debug!(%name, "removed custom command");
                Ok(())
            }
            None => Err(RegistryError::UnknownCommand { name }),
        }
    }

    pub fn is_builtin(&self, name: char) -> bool {
        builtins::is_builtin(name)
    }

    pub fn is_custom(&self, name: char) -> bool {
        self.custom.contains_key(&name)
    }

    pub fn contains(&self, name: char) -> bool {
        self.is_builtin(name) || self.is_custom(name)
    }

    /// Custom command names in ascending order.
    pub fn custom_names(&self) -> impl Iterator<Item = char> + '_ {
        self.custom.keys().copied()
    }
}

impl fmt::Debug for CommandRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandRegistry")
            .field("custom", &self.custom.keys().collect::<Vec<_>>())
            .finish()
    }
}
