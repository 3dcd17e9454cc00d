#![no_main]

use libfuzzer_sys::fuzz_target;
use valscope::{
    ByteOrder, Field, MemoryImage, PrintOptions, PrintPolicy, PrintStream, Type, Value,
    ValuePrinter,
};

// The input doubles as target memory at 0x1000 and as the contents of a struct whose members
// cover every type code, so pointers chase into the same bytes.
fuzz_target!(|data: &[u8]| {
    if data.len() < 48 {
        return;
    }

    let mut memory = MemoryImage::new();
    let _ = memory.map(0x1000, data.to_vec(), ".fuzz");

    let char_ty = Type::int("char", 1, false);
    let int_ty = Type::int("int", 4, false);
    let wide = Type::int("unsigned __int128", 16, true);
    let record = Type::structure(
        "record",
        48,
        vec![
            Field::new("name", 0, Type::pointer_to(char_ty.clone(), 8)),
            Field::new("value", 8, Type::float("double", 8)),
            Field::new("wide", 16, wide),
            Field::new("chars", 32, Type::array_of(char_ty, 8)),
            Field::new("ints", 40, Type::array_of(int_ty, 2)),
        ],
    );

    let policy = PrintPolicy::new().with_repeats(usize::from(data[0] % 12));
    let order = if data[1] & 1 == 0 {
        ByteOrder::Little
    } else {
        ByteOrder::Big
    };
    let Ok(value) = Value::new(record, data[..48].to_vec()) else {
        return;
    };
    let printer = ValuePrinter::new(&policy, &memory).with_byte_order(order);
    let mut out = PrintStream::new();
    let _ = printer.print_value(&value.at(0x1000), &mut out, PrintOptions::new());
});
