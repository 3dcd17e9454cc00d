use std::path::Path;

use anyhow::bail;
use serde::Serialize;
use valscope::{
    CancellationToken, FormatLetter, PrintOptions, PrintStream, Type, TypeRef, Value,
    ValuePrinter,
};

use crate::{
    app::GlobalOptions,
    commands::common::{build_settings, parse_address},
    image::load_image,
    output::print_output,
};

/// Width of pointers in the images the command line reads.
const POINTER_SIZE: usize = 8;

pub struct ValueOptions<'a> {
    pub type_spec: &'a str,
    pub repeat: usize,
    pub format: Option<char>,
}

#[derive(Debug, Serialize)]
struct ValueOutput {
    address: String,
    #[serde(rename = "type")]
    type_name: String,
    text: String,
    length: usize,
}

pub fn run(
    image: &Path,
    address: &str,
    options: &ValueOptions<'_>,
    cancel: &CancellationToken,
    opts: &GlobalOptions,
) -> anyhow::Result<()> {
    let address = parse_address(address)?;
    let ty = parse_type(options.type_spec)?;
    let format = options.format.map(FormatLetter::try_from).transpose()?;
    if options.repeat == 0 {
        bail!("--repeat must be at least 1");
    }

    let loaded = load_image(image)?;
    let policy = build_settings(opts)?.snapshot();

    let value = Value::fetch_repeated(&loaded.memory, ty.clone(), address, options.repeat)?;
    let printer = ValuePrinter::new(&policy, &loaded.memory)
        .with_byte_order(loaded.byte_order)
        .with_cancellation(cancel.clone());

    let mut out = PrintStream::new();
    let length = printer.print_value(&value, &mut out, PrintOptions::new().with_format(format))?;

    let output = ValueOutput {
        address: format!("0x{address:x}"),
        type_name: printer.language().type_name(&ty),
        text: out.into_string(),
        length,
    };
    print_output(&output, opts, |o| println!("{}", o.text))
}

/// Parse a type such as `u16`, `f64` or `char*`.
fn parse_type(spec: &str) -> anyhow::Result<TypeRef> {
    let spec = spec.trim();
    if let Some(target) = spec.strip_suffix('*') {
        return Ok(Type::pointer_to(parse_type(target)?, POINTER_SIZE));
    }

    let ty = match spec {
        "char" => Type::int("char", 1, false),
        "i8" => Type::int("signed char", 1, false),
        "i16" => Type::int("short", 2, false),
        "i32" => Type::int("int", 4, false),
        "i64" => Type::int("long", 8, false),
        "i128" => Type::int("__int128", 16, false),
        "u8" => Type::int("unsigned char", 1, true),
        "u16" => Type::int("unsigned short", 2, true),
        "u32" => Type::int("unsigned int", 4, true),
        "u64" => Type::int("unsigned long", 8, true),
        "u128" => Type::int("unsigned __int128", 16, true),
        "f32" => Type::float("float", 4),
        "f64" => Type::float("double", 8),
        "f80" => Type::float("long double", 16),
        _ => bail!("unknown type '{spec}' (expected: i8..i128, u8..u128, f32, f64, f80, char, or a pointer like char*)"),
    };
    Ok(ty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use valscope::TypeCode;

    #[test]
    fn test_parse_type() {
        let ty = parse_type("u16").unwrap();
        assert_eq!(ty.code(), TypeCode::Int);
        assert_eq!(ty.length(), 2);
        assert!(ty.is_unsigned());

        let ptr = parse_type("char *").unwrap();
        assert_eq!(ptr.code(), TypeCode::Pointer);
        assert_eq!(ptr.length(), POINTER_SIZE);
        assert!(ptr.target().unwrap().is_byte_sized_int());

        assert!(parse_type("i7").is_err());
    }
}
