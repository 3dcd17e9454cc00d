//! `set` / `show` commands over the print policy.
//!
//! [`PrintSettings`] owns the current [`PrintPolicy`] snapshot and applies configuration
//! commands to it. A rejected command leaves the snapshot untouched. Each accepted command
//! replaces the snapshot, so a print operation that already borrowed the previous one is not
//! affected.
//!
//! # Commands
//!
//! | Command | Effect |
//! |---------|--------|
//! | `set print elements <n>` | element budget, 0 or `unlimited` for no limit |
//! | `set print repeats <n>` | repeat threshold, 0 or `unlimited` to never compress |
//! | `set print pretty <bool>` | multi-line structures |
//! | `set print array <bool>` | one array element per line |
//! | `set print union <bool>` | expand unions nested in structures |
//! | `set print address <bool>` | print target addresses |
//! | `set input-radix <n>` | radix of numbers typed by the user, at least 2 |
//! | `set output-radix <n>` | display radix, one of 8, 10, 16 |
//! | `set radix [<n>]` | both radixes (output first), 10 if omitted |
//! | `show print [<name>]`, `show radix`, `show input-radix`, `show output-radix` | describe |
//!
//! Numbers are read in the current input radix unless they carry a `0x` prefix.
//!
//! # Example
//!
//! ```rust
//! use valscope::PrintSettings;
//!
//! let mut settings = PrintSettings::new();
//! settings.execute("set print elements 0")?;
//! assert_eq!(
//!     settings.execute("show print elements")?,
//!     "Limit on string chars or array elements to print is unlimited."
//! );
//!
//! assert!(settings.execute("set output-radix 7").is_err());
//! assert_eq!(settings.policy().output_radix(), 10);
//! # Ok::<(), valscope::Error>(())
//! ```

use std::str::FromStr;

use strum::IntoEnumIterator;

use crate::{
    policy::{PrintLimit, PrintPolicy},
    Error, Result,
};

/// The `set print` / `show print` subcommands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::EnumString, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum PrintSetting {
    /// Element and string character budget.
    Elements,
    /// Repeat compression threshold.
    Repeats,
    /// Multi-line structures.
    Pretty,
    /// Nested union expansion.
    Union,
    /// One array element per line.
    Array,
    /// Address printing.
    Address,
}

impl PrintSetting {
    /// Returns the help line of this setting.
    #[must_use]
    pub fn help(self) -> &'static str {
        match self {
            PrintSetting::Elements => {
                "Set limit on string chars or array elements to print.\n\
                 \"set print elements 0\" causes there to be no limit."
            }
            PrintSetting::Repeats => {
                "Set threshold for repeated print elements.\n\
                 \"set print repeats 0\" causes all elements to be individually printed."
            }
            PrintSetting::Pretty => "Set prettyprinting of structures.",
            PrintSetting::Union => "Set printing of unions interior to structures.",
            PrintSetting::Array => "Set prettyprinting of arrays.",
            PrintSetting::Address => "Set printing of addresses.",
        }
    }
}

/// Owner of the current print policy snapshot.
#[derive(Debug, Clone, Default)]
pub struct PrintSettings {
    policy: PrintPolicy,
}

impl PrintSettings {
    /// Creates settings holding the default policy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates settings holding `policy`.
    #[must_use]
    pub fn with_policy(policy: PrintPolicy) -> Self {
        PrintSettings { policy }
    }

    /// Returns the current snapshot.
    #[must_use]
    pub fn policy(&self) -> &PrintPolicy {
        &self.policy
    }

    /// Returns a copy of the current snapshot for a print operation to own.
    #[must_use]
    pub fn snapshot(&self) -> PrintPolicy {
        self.policy.clone()
    }

    /// Parses and executes one `set` or `show` command.
    ///
    /// # Returns
    ///
    /// The text to show the user: a confirmation for radix changes, the description for `show`
    /// commands, and an empty string for silent `set print` commands.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for unknown commands and rejected values. The policy
    /// is unchanged in that case.
    pub fn execute(&mut self, command: &str) -> Result<String> {
        let words: Vec<&str> = command.split_whitespace().collect();
        match words.as_slice() {
            ["set", "print", name, value] => {
                let setting = parse_setting(name)?;
                self.set(setting, value)?;
                Ok(String::new())
            }
            ["set", "print", ..] => Err(Error::Configuration(
                "\"set print\" must be followed by the name of a print subcommand.".to_string(),
            )),
            ["show", "print"] => Ok(self.show_all().join("\n")),
            ["show", "print", name] => Ok(self.show(parse_setting(name)?)),
            ["set", "radix"] => self.set_radix(10),
            ["set", "radix", value] => {
                let radix = self.parse_number(value)?;
                self.set_radix(radix)
            }
            ["set", "input-radix", value] => {
                let radix = self.parse_number(value)?;
                self.set_input_radix(radix)
            }
            ["set", "output-radix", value] => {
                let radix = self.parse_number(value)?;
                self.set_output_radix(radix)
            }
            ["show", "radix"] => Ok(self.show_radix()),
            ["show", "input-radix"] => Ok(format!(
                "Default input radix for entering numbers is {}.",
                self.policy.input_radix()
            )),
            ["show", "output-radix"] => Ok(format!(
                "Default output radix for printing of values is {}.",
                self.policy.output_radix()
            )),
            _ => Err(Error::Configuration(format!(
                "Undefined command: \"{command}\"."
            ))),
        }
    }

    /// Applies `value` to a `set print` setting.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `value` is not valid for the setting.
    pub fn set(&mut self, setting: PrintSetting, value: &str) -> Result<()> {
        let policy = self.policy.clone();
        self.policy = match setting {
            PrintSetting::Elements => policy.with_elements(self.parse_limit(value)?),
            PrintSetting::Repeats => policy.with_repeats(self.parse_limit(value)?),
            PrintSetting::Pretty => policy.with_pretty_structs(parse_bool(value)?),
            PrintSetting::Union => policy.with_unions(parse_bool(value)?),
            PrintSetting::Array => policy.with_pretty_arrays(parse_bool(value)?),
            PrintSetting::Address => policy.with_addresses(parse_bool(value)?),
        };
        Ok(())
    }

    /// Sets the input radix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for radixes below 2; the radix is unchanged.
    pub fn set_input_radix(&mut self, radix: u32) -> Result<String> {
        self.policy = self.policy.clone().with_input_radix(radix)?;
        Ok(format!(
            "Input radix now set to decimal {radix}, hex {radix:x}, octal {radix:o}."
        ))
    }

    /// Sets the output radix.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] for anything but 8, 10 and 16; the radix is unchanged.
    pub fn set_output_radix(&mut self, radix: u32) -> Result<String> {
        self.policy = self.policy.clone().with_output_radix(radix)?;
        Ok(format!(
            "Output radix now set to decimal {radix}, hex {radix:x}, octal {radix:o}."
        ))
    }

    /// Sets both radixes, output first. On rejection neither radix changes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `radix` is not a valid output radix.
    pub fn set_radix(&mut self, radix: u32) -> Result<String> {
        self.policy = self
            .policy
            .clone()
            .with_output_radix(radix)?
            .with_input_radix(radix)?;
        Ok(format!(
            "Input and output radices now set to decimal {radix}, hex {radix:x}, octal {radix:o}."
        ))
    }

    /// Describes both radixes.
    #[must_use]
    pub fn show_radix(&self) -> String {
        let input = self.policy.input_radix();
        let output = self.policy.output_radix();
        if input == output {
            format!(
                "Input and output radices set to decimal {input}, hex {input:x}, octal {input:o}."
            )
        } else {
            format!(
                "Input radix set to decimal {input}, hex {input:x}, octal {input:o}.\n\
                 Output radix set to decimal {output}, hex {output:x}, octal {output:o}."
            )
        }
    }

    /// Returns the current value of one `print` setting as shown to the user.
    #[must_use]
    pub fn value(&self, setting: PrintSetting) -> String {
        let on_off = |enabled: bool| if enabled { "on" } else { "off" }.to_string();
        match setting {
            PrintSetting::Elements => self.policy.elements().to_string(),
            PrintSetting::Repeats => self.policy.repeats().to_string(),
            PrintSetting::Pretty => on_off(self.policy.pretty_structs()),
            PrintSetting::Union => on_off(self.policy.unions()),
            PrintSetting::Array => on_off(self.policy.pretty_arrays()),
            PrintSetting::Address => on_off(self.policy.addresses()),
        }
    }

    /// Describes one `print` setting.
    #[must_use]
    pub fn show(&self, setting: PrintSetting) -> String {
        let value = self.value(setting);
        match setting {
            PrintSetting::Elements => {
                format!("Limit on string chars or array elements to print is {value}.")
            }
            PrintSetting::Repeats => format!("Threshold for repeated print elements is {value}."),
            PrintSetting::Pretty => format!("Prettyprinting of structures is {value}."),
            PrintSetting::Union => {
                format!("Printing of unions interior to structures is {value}.")
            }
            PrintSetting::Array => format!("Prettyprinting of arrays is {value}."),
            PrintSetting::Address => format!("Printing of addresses is {value}."),
        }
    }

    /// Describes every `print` setting, in declaration order.
    #[must_use]
    pub fn show_all(&self) -> Vec<String> {
        PrintSetting::iter().map(|s| self.show(s)).collect()
    }

    fn parse_number(&self, text: &str) -> Result<u32> {
        let radix = self.policy.input_radix();
        let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            Some(hex) => u32::from_str_radix(hex, 16),
            // Digits only exist up to base 36
            None if radix > 36 => {
                return Err(Error::Configuration(format!(
                    "Cannot parse \"{text}\" in input radix {radix}."
                )));
            }
            None => u32::from_str_radix(text, radix),
        };
        parsed.map_err(|_| Error::Configuration(format!("Invalid number \"{text}\".")))
    }

    fn parse_limit(&self, text: &str) -> Result<usize> {
        if text == "unlimited" {
            return Ok(PrintLimit::UNLIMITED.get());
        }
        Ok(self.parse_number(text)? as usize)
    }
}

fn parse_setting(name: &str) -> Result<PrintSetting> {
    PrintSetting::from_str(name).map_err(|_| {
        Error::Configuration(format!("Undefined set print command: \"{name}\"."))
    })
}

fn parse_bool(text: &str) -> Result<bool> {
    match text {
        "on" | "1" | "yes" | "enable" => Ok(true),
        "off" | "0" | "no" | "disable" => Ok(false),
        _ => Err(Error::Configuration(
            "\"on\" or \"off\" expected.".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_print_values() {
        let mut settings = PrintSettings::new();
        settings.execute("set print elements 5").unwrap();
        settings.execute("set print repeats 0").unwrap();
        settings.execute("set print pretty on").unwrap();
        settings.execute("set print address off").unwrap();

        let policy = settings.policy();
        assert_eq!(policy.elements().get(), 5);
        assert!(policy.repeats().is_unlimited());
        assert!(policy.pretty_structs());
        assert!(!policy.addresses());
    }

    #[test]
    fn test_output_radix_rejected_keeps_prior() {
        let mut settings = PrintSettings::new();
        let message = settings.execute("set output-radix 16").unwrap();
        assert_eq!(message, "Output radix now set to decimal 16, hex 10, octal 20.");

        let err = settings.execute("set output-radix 7").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Unsupported output radix ``decimal 7''; output radix unchanged."
        );
        assert_eq!(settings.policy().output_radix(), 16);
    }

    #[test]
    fn test_input_radix_changes_parsing() {
        let mut settings = PrintSettings::new();
        settings.execute("set input-radix 16").unwrap();
        // "10" is now read as sixteen
        settings.execute("set print elements 10").unwrap();
        assert_eq!(settings.policy().elements().get(), 16);
        assert!(settings.execute("set input-radix 0x1").is_err());
        assert_eq!(settings.policy().input_radix(), 16);
    }

    #[test]
    fn test_set_radix() {
        let mut settings = PrintSettings::new();
        settings.execute("set radix 8").unwrap();
        assert_eq!(settings.policy().input_radix(), 8);
        assert_eq!(settings.policy().output_radix(), 8);

        // 3 is a valid input radix but not an output radix: neither changes
        assert!(settings.execute("set radix 3").is_err());
        assert_eq!(settings.policy().input_radix(), 8);

        settings.execute("set radix").unwrap();
        assert_eq!(
            settings.show_radix(),
            "Input and output radices set to decimal 10, hex a, octal 12."
        );
    }

    #[test]
    fn test_show_print() {
        let settings = PrintSettings::new();
        let lines = settings.show_all();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[0], "Limit on string chars or array elements to print is 200.");
        assert_eq!(lines[5], "Printing of addresses is on.");
    }

    #[test]
    fn test_unknown_commands() {
        let mut settings = PrintSettings::new();
        assert!(settings.execute("set print nonsense 1").is_err());
        assert!(settings.execute("set print pretty maybe").is_err());
        assert!(settings.execute("frobnicate").is_err());
        assert_eq!(settings.policy(), &PrintPolicy::default());
    }
}
