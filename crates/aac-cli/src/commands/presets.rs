// List the named engine presets

use super::Command;
use crate::error::CliResult;
use crate::output::OutputStyle;
use aac_completion::Preset;
use std::io::Write;

/// `aac presets`
pub struct PresetsCommand {
    selected: String,
    style: OutputStyle,
}

impl PresetsCommand {
    /// `selected` is the `--preset` value; it is marked when it names a preset
    pub fn new(selected: impl Into<String>, style: OutputStyle) -> Self {
        Self {
            selected: selected.into(),
            style,
        }
    }
}

impl Command for PresetsCommand {
    fn execute(&self, out: &mut dyn Write) -> CliResult<()> {
        for name in Preset::available() {
            if name == self.selected {
                writeln!(out, "* {}", self.style.value(name))?;
            } else {
                writeln!(out, "  {}", name)?;
            }
        }
        Ok(())
    }
}
