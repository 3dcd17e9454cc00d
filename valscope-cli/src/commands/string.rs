use std::{fmt::Write, path::Path};

use serde::Serialize;
use valscope::{format::print_target_string, CLanguage, CancellationToken, PrintStream};

use crate::{
    app::GlobalOptions,
    commands::common::{build_settings, parse_address},
    image::load_image,
    output::print_output,
};

#[derive(Debug, Serialize)]
struct StringOutput {
    address: String,
    text: String,
    chars: usize,
}

pub fn run(
    image: &Path,
    address: &str,
    length: usize,
    cancel: &CancellationToken,
    opts: &GlobalOptions,
) -> anyhow::Result<()> {
    let address = parse_address(address)?;
    let loaded = load_image(image)?;
    let policy = build_settings(opts)?.snapshot();

    let mut out = PrintStream::new();
    if policy.addresses() {
        write!(out, "0x{address:x}")?;
    }
    let chars = print_target_string(
        &mut out,
        &loaded.memory,
        &CLanguage,
        &policy,
        address,
        length,
        cancel,
    )?;

    let output = StringOutput {
        address: format!("0x{address:x}"),
        text: out.into_string(),
        chars,
    };
    print_output(&output, opts, |o| println!("{}", o.text))
}
