use crate::{
    format::{PrintOptions, PrintStream, ValuePrinter},
    policy::PrintPolicy,
    target::{ByteOrder, MemoryImage},
    types::{Field, Type, TypeRef},
    value::Value,
    Result,
};

// Helper function to create a `char`
pub fn char_type() -> TypeRef {
    Type::int("char", 1, false)
}

// Helper function to create an `int`
pub fn int_type() -> TypeRef {
    Type::int("int", 4, false)
}

// Helper function to create a `char *` for a 64-bit target
pub fn char_pointer() -> TypeRef {
    Type::pointer_to(char_type(), 8)
}

// Helper function to create `struct point { int x; int y; }`
pub fn point_type() -> TypeRef {
    Type::structure(
        "point",
        8,
        vec![Field::new("x", 0, int_type()), Field::new("y", 4, int_type())],
    )
}

// Helper function to create a memory image with one readable region
pub fn image_with(address: u64, bytes: &[u8]) -> MemoryImage {
    let mut image = MemoryImage::new();
    image.map(address, bytes.to_vec(), ".data").unwrap();
    image
}

// Helper function to create a little-endian pointer value
pub fn pointer_value(ty: TypeRef, address: u64) -> Value {
    Value::new(ty, address.to_le_bytes().to_vec()).unwrap()
}

// Prints `value` for a little-endian target with natural formatting
pub fn try_render(policy: &PrintPolicy, memory: &MemoryImage, value: &Value) -> Result<String> {
    let printer = ValuePrinter::new(policy, memory).with_byte_order(ByteOrder::Little);
    let mut out = PrintStream::new();
    printer.print_value(value, &mut out, PrintOptions::new())?;
    Ok(out.into_string())
}

// Same as `try_render`, panicking on errors
pub fn render(policy: &PrintPolicy, memory: &MemoryImage, value: &Value) -> String {
    try_render(policy, memory, value).unwrap()
}
