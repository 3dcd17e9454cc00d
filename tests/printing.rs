//! End-to-end printing through the public API.
//!
//! These tests drive the formatter the way a debugger front end would: a memory image stands
//! in for the target, a print policy snapshot is built from settings commands, and values are
//! rendered to a [`PrintStream`].

use valscope::{
    format::{fetch_string, print_float, print_int, print_sequence, Sequence, SequenceSummary},
    prelude::*,
    Result,
};

fn int_type() -> TypeRef {
    Type::int("int", 4, false)
}

fn ints(values: &[i32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_le_bytes()).collect()
}

fn image_with(address: u64, bytes: &[u8]) -> MemoryImage {
    let mut image = MemoryImage::new();
    image.map(address, bytes.to_vec(), ".data").unwrap();
    image
}

/// Prints a sequence of little-endian ints, returning the text and the summary.
fn print_ints(policy: &PrintPolicy, values: &[i32]) -> Result<(String, SequenceSummary)> {
    let ty = int_type();
    let bytes = ints(values);
    let sequence = Sequence::new(&bytes, 4, values.len())?;
    let mut out = PrintStream::new();
    let summary = print_sequence(
        &mut out,
        &sequence,
        policy,
        0,
        &CancellationToken::new(),
        |out, element| print_int(out, &ty, element.bytes, ByteOrder::Little, None),
    )?;
    Ok((out.into_string(), summary))
}

fn render(policy: &PrintPolicy, memory: &MemoryImage, value: &Value) -> Result<String> {
    let printer = ValuePrinter::new(policy, memory).with_byte_order(ByteOrder::Little);
    let mut out = PrintStream::new();
    printer.print_value(value, &mut out, PrintOptions::new())?;
    Ok(out.into_string())
}

#[test]
fn test_uniform_run_charges_threshold() -> Result<()> {
    let policy = PrintPolicy::new();
    let (text, summary) = print_ints(&policy, &[7; 25])?;

    assert_eq!(text, "7 <repeats 25 times>");
    assert_eq!(summary.budget_used, 10);
    assert_eq!(summary.rendered, 25);
    assert!(!summary.truncated);
    Ok(())
}

#[test]
fn test_run_at_threshold_printed_individually() -> Result<()> {
    let policy = PrintPolicy::new();
    let (text, summary) = print_ints(&policy, &[7; 10])?;

    assert_eq!(text, vec!["7"; 10].join(", "));
    assert_eq!(summary.budget_used, 10);
    assert!(!text.contains("<repeats"));
    Ok(())
}

#[test]
fn test_unlimited_budget_prints_everything() -> Result<()> {
    let mut settings = PrintSettings::new();
    settings.execute("set print elements 0")?;
    let policy = settings.snapshot();

    let values: Vec<i32> = (0..10_000).collect();
    let (text, summary) = print_ints(&policy, &values)?;

    assert_eq!(summary.rendered, 10_000);
    assert!(!summary.truncated);
    assert!(!text.ends_with("..."));
    assert!(text.ends_with("9998, 9999"));
    assert_eq!(text.split(", ").count(), 10_000);
    Ok(())
}

#[test]
fn test_budget_truncates_with_ellipsis() -> Result<()> {
    let policy = PrintPolicy::new().with_elements(5);
    let values: Vec<i32> = (0..10).collect();
    let (text, summary) = print_ints(&policy, &values)?;

    assert_eq!(text, "0, 1, 2, 3, 4...");
    assert_eq!(summary.rendered, 5);
    assert!(summary.truncated);
    Ok(())
}

#[test]
fn test_array_value_compresses_runs() -> Result<()> {
    let mut values = vec![1, 2];
    values.extend([0; 20]);
    values.push(3);
    let ty = Type::array_of(int_type(), values.len());
    let value = Value::new(ty, ints(&values))?;

    let text = render(&PrintPolicy::new(), &MemoryImage::new(), &value)?;
    assert_eq!(text, "{1, 2, 0 <repeats 20 times>, 3}");
    Ok(())
}

#[test]
fn test_fetch_terminated_string() -> Result<()> {
    let image = image_with(0x4000, b"abc\0xyz");
    let fetched = fetch_string(
        &image,
        0x4000,
        0,
        PrintLimit::from_user(200),
        &CancellationToken::new(),
    )?;

    assert_eq!(fetched.bytes(), b"abc");
    assert_eq!(fetched.char_count(), 3);
    assert!(!fetched.is_truncated());
    Ok(())
}

#[test]
fn test_fetch_string_hits_ceiling() -> Result<()> {
    let image = image_with(0x4000, &[b'q'; 500]);
    let fetched = fetch_string(
        &image,
        0x4000,
        0,
        PrintLimit::from_user(50),
        &CancellationToken::new(),
    )?;

    assert_eq!(fetched.char_count(), 50);
    assert!(fetched.is_truncated());
    assert_eq!(fetched.out_of_bounds(), None);
    Ok(())
}

#[test]
fn test_char_pointer_prints_string() -> Result<()> {
    let mut image = image_with(0x1000, b"hello\0");
    image.map(0x2000, 0x1000u64.to_le_bytes().to_vec(), ".stack")?;

    let ty = Type::pointer_to(Type::int("char", 1, false), 8);
    let value = Value::fetch(&image, ty, 0x2000)?;

    let text = render(&PrintPolicy::new(), &image, &value)?;
    assert_eq!(text, "0x1000 \"hello\"");

    let hidden = PrintPolicy::new().with_addresses(false);
    assert_eq!(render(&hidden, &image, &value)?, "\"hello\"");
    Ok(())
}

#[test]
fn test_unreadable_string_is_fatal() {
    let mut image = MemoryImage::new();
    image.map(0x1000, b"ab".to_vec(), ".data").unwrap();
    image
        .map_region(MemoryRegion::new(
            0x1002,
            vec![0; 8],
            MemoryProtection::WRITE,
            ".guard",
        ))
        .unwrap();

    let ty = Type::pointer_to(Type::int("char", 1, false), 8);
    let value = Value::new(ty, 0x1000u64.to_le_bytes().to_vec()).unwrap();

    let err = render(&PrintPolicy::new(), &image, &value).unwrap_err();
    assert!(matches!(err, Error::MemoryRead { address: 0x1002, .. }));
    assert!(err.to_string().starts_with("Error reading memory address 0x1002"));
}

#[test]
fn test_wide_unsigned_low_byte_is_decimal() -> Result<()> {
    let ty = Type::int("unsigned __int128", 16, true);
    let mut bytes = [0u8; 16];
    bytes[0] = 42;

    let mut out = PrintStream::new();
    print_int(&mut out, &ty, &bytes, ByteOrder::Little, None)?;
    assert_eq!(out.as_str(), "42");
    Ok(())
}

#[test]
fn test_wide_unsigned_high_byte_is_hex() -> Result<()> {
    let ty = Type::int("unsigned __int128", 16, true);
    let mut bytes = [0u8; 16];
    bytes[0] = 0x2A;
    bytes[8] = 0x01;

    let mut out = PrintStream::new();
    print_int(&mut out, &ty, &bytes, ByteOrder::Little, None)?;
    assert_eq!(out.as_str(), "0x01000000000000002a");
    Ok(())
}

#[test]
fn test_float_nan_payload() -> Result<()> {
    let mut out = PrintStream::new();
    print_float(&mut out, &0x7FC0_0000u32.to_le_bytes(), 4, ByteOrder::Little)?;
    assert_eq!(out.as_str(), "NaN(0x400000)");

    let mut out = PrintStream::new();
    print_float(&mut out, &0xFFC0_0001u32.to_be_bytes(), 4, ByteOrder::Big)?;
    assert_eq!(out.as_str(), "-NaN(0x400001)");
    Ok(())
}

#[test]
fn test_output_radix() -> Result<()> {
    let mut settings = PrintSettings::new();
    let message = settings.execute("set output-radix 16")?;
    assert_eq!(message, "Output radix now set to decimal 16, hex 10, octal 20.");

    let value = Value::new(int_type(), ints(&[255]))?;
    let image = MemoryImage::new();
    assert_eq!(render(&settings.snapshot(), &image, &value)?, "0xff");

    let err = settings.execute("set output-radix 7").unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
    assert_eq!(settings.policy().output_radix(), 16);
    assert_eq!(render(&settings.snapshot(), &image, &value)?, "0xff");
    Ok(())
}

#[test]
fn test_struct_layout() -> Result<()> {
    let point = Type::structure(
        "point",
        8,
        vec![
            Field::new("x", 0, int_type()),
            Field::new("y", 4, int_type()),
        ],
    );
    let value = Value::new(point, ints(&[3, -4]))?;
    let image = MemoryImage::new();

    assert_eq!(render(&PrintPolicy::new(), &image, &value)?, "{x = 3, y = -4}");

    let pretty = PrintPolicy::new().with_pretty_structs(true);
    assert_eq!(
        render(&pretty, &image, &value)?,
        "{\n  x = 3,\n  y = -4\n}"
    );
    Ok(())
}

#[test]
fn test_cancelled_before_printing() {
    let cancel = CancellationToken::new();
    cancel.cancel();

    let policy = PrintPolicy::new();
    let image = MemoryImage::new();
    let printer = ValuePrinter::new(&policy, &image).with_cancellation(cancel);
    let value = Value::new(int_type(), ints(&[1])).unwrap();

    let mut out = PrintStream::new();
    let err = printer
        .print_value(&value, &mut out, PrintOptions::new())
        .unwrap_err();
    assert!(matches!(err, Error::Cancelled));
}

#[test]
fn test_pretty_arrays_same_for_arrays_and_repeats() -> Result<()> {
    let mut settings = PrintSettings::new();
    settings.execute("set print array on")?;
    let policy = settings.snapshot();
    let image = MemoryImage::new();

    let array = Value::new(Type::array_of(int_type(), 3), ints(&[1, 2, 3]))?;
    let repeated = Value::repeated(int_type(), ints(&[1, 2, 3]), 3)?;

    assert_eq!(render(&policy, &image, &array)?, "{1,\n  2,\n  3}");
    assert_eq!(render(&policy, &image, &repeated)?, "{1,\n  2,\n  3}");
    Ok(())
}

#[test]
fn test_double_nan_with_low_payload() -> Result<()> {
    let double = Type::float("double", 8);
    let value = Value::new(double, 0xFFF0_0000_0000_0001u64.to_le_bytes().to_vec())?;
    assert_eq!(
        render(&PrintPolicy::new(), &MemoryImage::new(), &value)?,
        "-NaN(0x1)"
    );
    Ok(())
}

#[test]
fn test_char_pointer_into_unmapped_memory() -> Result<()> {
    let ty = Type::pointer_to(Type::int("char", 1, false), 8);
    let value = Value::new(ty, 0x9000u64.to_le_bytes().to_vec())?;

    let text = render(&PrintPolicy::new(), &MemoryImage::new(), &value)?;
    assert_eq!(text, "0x9000 \"\"... <Address 0x9000 out of bounds>");
    Ok(())
}

#[test]
fn test_fixed_length_string_cut_short() -> Result<()> {
    let image = image_with(0x4000, b"abcd");
    let fetched = fetch_string(
        &image,
        0x4000,
        16,
        PrintLimit::from_user(200),
        &CancellationToken::new(),
    )?;

    assert_eq!(fetched.bytes(), b"abcd");
    assert!(fetched.is_truncated());
    assert_eq!(fetched.out_of_bounds(), Some(0x4004));
    Ok(())
}
