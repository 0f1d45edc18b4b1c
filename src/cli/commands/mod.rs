use std::collections::HashMap;

pub mod clock;
pub mod parking;
pub mod system;

use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::vehicle::VehiclePlate;

pub(crate) fn all_definitions() -> Vec<CommandDefinition> {
    let mut commands = Vec::new();
    commands.extend(parking::definitions());
    commands.extend(clock::definitions());
    commands.extend(system::definitions());
    commands
}

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

#[derive(Clone)]
pub struct CommandDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandDefinition {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }
}

pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandDefinition>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new(definitions: Vec<CommandDefinition>) -> Self {
        let mut commands = HashMap::new();
        let mut order = Vec::new();
        for definition in definitions {
            order.push(definition.name);
            commands.insert(definition.name, definition);
        }
        Self { commands, order }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommandDefinition> {
        self.order
            .iter()
            .filter_map(move |name| self.commands.get(name))
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }
}

pub(crate) fn plate_arg(args: &[&str], usage: &str) -> Result<VehiclePlate, CommandError> {
    match args {
        [raw] => Ok(raw.parse()?),
        _ => Err(CommandError::InvalidArguments(format!("Usage: {usage}"))),
    }
}

pub(crate) fn json_flag(args: &[&str], usage: &str) -> Result<bool, CommandError> {
    match args {
        [] => Ok(false),
        ["--json"] => Ok(true),
        _ => Err(CommandError::InvalidArguments(format!("Usage: {usage}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_keeps_definition_order() {
        let registry = CommandRegistry::new(all_definitions());
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names.first(), Some(&"park"));
        assert!(names.contains(&"settle"));
        assert!(names.contains(&"advance"));
        assert_eq!(names.last(), Some(&"exit"));
        assert_eq!(registry.iter().count(), names.len());
    }

    #[test]
    fn plate_arg_requires_exactly_one_plate() {
        assert_eq!(
            plate_arg(&["aa111a99"], "park <PLATE>").unwrap(),
            VehiclePlate::new('A', 'A', 111, 'A', 99)
        );
        assert!(matches!(
            plate_arg(&[], "park <PLATE>"),
            Err(CommandError::InvalidArguments(_))
        ));
        assert!(matches!(
            plate_arg(&["bogus"], "park <PLATE>"),
            Err(CommandError::Plate(_))
        ));
    }

    #[test]
    fn json_flag_accepts_only_json() {
        assert!(!json_flag(&[], "settle [--json]").unwrap());
        assert!(json_flag(&["--json"], "settle [--json]").unwrap());
        assert!(json_flag(&["--yaml"], "settle [--json]").is_err());
    }
}
