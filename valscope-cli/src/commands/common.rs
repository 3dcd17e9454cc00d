use anyhow::Context;
use log::debug;
use valscope::PrintSettings;

use crate::app::GlobalOptions;

/// Parse an address given as hex (`0x1000`) or decimal (`4096`).
pub fn parse_address(s: &str) -> anyhow::Result<u64> {
    let trimmed = s.trim();
    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        u64::from_str_radix(hex, 16).with_context(|| format!("invalid hex address: {s}"))
    } else {
        trimmed
            .parse::<u64>()
            .with_context(|| format!("invalid address: {s}"))
    }
}

/// Build print settings from the global command line options.
///
/// Each option is applied as the equivalent `set` command, so values are validated exactly
/// as they would be in an interactive session.
pub fn build_settings(opts: &GlobalOptions) -> anyhow::Result<PrintSettings> {
    let mut commands = Vec::new();
    if let Some(elements) = opts.elements {
        commands.push(format!("set print elements {elements}"));
    }
    if let Some(repeats) = opts.repeats {
        commands.push(format!("set print repeats {repeats}"));
    }
    if let Some(radix) = opts.radix {
        commands.push(format!("set radix {radix}"));
    }
    if opts.pretty {
        commands.push("set print pretty on".to_string());
    }
    if opts.no_addresses {
        commands.push("set print address off".to_string());
    }

    let mut settings = PrintSettings::new();
    for command in &commands {
        debug!("{command}");
        settings
            .execute(command)
            .with_context(|| format!("invalid option: {command}"))?;
    }
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_address() {
        assert_eq!(parse_address("0x1000").unwrap(), 0x1000);
        assert_eq!(parse_address("0X1f").unwrap(), 0x1f);
        assert_eq!(parse_address(" 4096 ").unwrap(), 4096);
        assert!(parse_address("0xzz").is_err());
        assert!(parse_address("abc").is_err());
    }
}
