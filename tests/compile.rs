use hexfmt::prelude::*;

#[test]
fn test_blocksize_is_maximum_over_lines() {
    let program = compile("16/1 \"%.2x \"\n8/1 \"%_p\"").unwrap();
    assert_eq!(program.blocksize(), 16);

    let program = compile("4/1 \"%.2x\"\n32/1 \"%_p\"").unwrap();
    assert_eq!(program.blocksize(), 32);
}

#[test]
fn test_units_on_one_line_consume_sequentially() {
    let program = compile("8/1 \"%.2x \" 8/1 \"%_p\"").unwrap();
    assert_eq!(program.blocksize(), 16);
}

#[test]
fn test_missing_count_and_limit_default() {
    // One iteration, budget bounded by the conversion itself.
    assert_eq!(compile("\"%.2x\"").unwrap().blocksize(), 4);
    assert_eq!(compile("\"%c\"").unwrap().blocksize(), 1);
    assert_eq!(compile("\"%%\"").unwrap().blocksize(), 0);
}

#[test]
fn test_disassembly_listing() {
    let program = compile("16/1 \"%.2x \"").unwrap();
    let listing = program.to_string();

    assert!(listing.starts_with("-- blocksize: 16\n"));
    assert!(listing.contains("RESET"));
    assert!(listing.contains("READ"));
    assert!(listing.contains("CONV"));
    assert!(listing.contains("PUTC   (0x20)"));
    assert!(listing.trim_end().ends_with("HALT"));
}

#[test]
fn test_disassembly_escapes_control_literals() {
    let program = compile("1/1 \"%_p\\n\\t\"").unwrap();
    let listing = program.to_string();
    assert!(listing.contains("PUTC \\n (0x0a)"));
    assert!(listing.contains("PUTC \\t (0x09)"));
}

#[test]
fn test_compile_error_taxonomy() {
    assert!(matches!(compile("\"%\""), Err(Error::Format)));
    assert!(matches!(compile("\"%s\""), Err(Error::Format)));
    assert!(matches!(compile("\"%_Aq\""), Err(Error::Format)));
    assert!(matches!(compile("1/1 \"%.2x%.2x\""), Err(Error::Drained)));
    assert!(matches!(
        compile(&"\"x\" ".repeat(1000)),
        Err(Error::Overflow)
    ));
}

#[test]
fn test_error_codes_are_stable() {
    let format = Error::Format.code();
    let drained = Error::Drained.code();
    assert!(format < 0);
    assert_eq!(drained, format + 1);
    assert_eq!(strerror(format), "invalid format");
    assert_eq!(strerror(drained), "unit drains buffer");
    assert_eq!(strerror(0), "unknown error (hexfmt)");
}
