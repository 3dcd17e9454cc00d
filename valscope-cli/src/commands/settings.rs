use anyhow::Context;
use serde::Serialize;
use strum::IntoEnumIterator;
use valscope::PrintSetting;

use crate::{
    app::GlobalOptions,
    commands::common::build_settings,
    output::{print_output, Align, TabWriter},
};

#[derive(Debug, Serialize)]
struct SettingEntry {
    name: String,
    value: String,
    help: String,
}

#[derive(Debug, Serialize)]
struct SettingsOutput {
    messages: Vec<String>,
    settings: Vec<SettingEntry>,
    input_radix: u32,
    output_radix: u32,
}

pub fn run(commands: &[String], opts: &GlobalOptions) -> anyhow::Result<()> {
    let mut settings = build_settings(opts)?;

    let mut messages = Vec::new();
    for command in commands {
        let message = settings
            .execute(command)
            .with_context(|| format!("command failed: {command}"))?;
        if !message.is_empty() {
            messages.push(message);
        }
    }

    let entries = PrintSetting::iter()
        .map(|setting| SettingEntry {
            name: setting.to_string(),
            value: settings.value(setting),
            help: setting.help().lines().next().unwrap_or_default().to_string(),
        })
        .collect();

    let output = SettingsOutput {
        messages,
        settings: entries,
        input_radix: settings.policy().input_radix(),
        output_radix: settings.policy().output_radix(),
    };

    print_output(&output, opts, |o| {
        for message in &o.messages {
            println!("{message}");
        }
        if !o.messages.is_empty() {
            println!();
        }

        let mut table = TabWriter::new(&[
            ("Setting", Align::Left),
            ("Value", Align::Right),
            ("Description", Align::Left),
        ]);
        for entry in &o.settings {
            table.row(vec![
                entry.name.clone(),
                entry.value.clone(),
                entry.help.clone(),
            ]);
        }
        table.row(vec![
            "input-radix".to_string(),
            o.input_radix.to_string(),
            "Set default input radix for entering numbers.".to_string(),
        ]);
        table.row(vec![
            "output-radix".to_string(),
            o.output_radix.to_string(),
            "Set default output radix for printing of values.".to_string(),
        ]);
        table.print();
    })
}
