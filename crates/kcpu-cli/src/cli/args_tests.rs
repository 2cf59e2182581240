use super::args::{parse_ram, parse_screen};

#[test]
fn screen_accepts_separators() {
    assert_eq!(parse_screen("40x20"), Ok((40, 20)));
    assert_eq!(parse_screen("3X2"), Ok((3, 2)));
    assert_eq!(parse_screen("8*1"), Ok((8, 1)));
    assert_eq!(parse_screen("0x0"), Ok((0, 0)));
}

#[test]
fn screen_rejects_malformed() {
    assert_eq!(
        parse_screen("40"),
        Err("expected WxH, got '40'".to_string())
    );
    assert!(parse_screen("ax2").unwrap_err().starts_with("invalid width 'a'"));
    assert!(parse_screen("2x-1").unwrap_err().starts_with("invalid height '-1'"));
}

#[test]
fn screen_rejects_oversized() {
    assert_eq!(parse_screen("4096x4096"), Ok((4096, 4096)));
    assert_eq!(
        parse_screen("4097x4096"),
        Err("screen 4097x4096 exceeds 16777216 cells".to_string())
    );
    let overflow = format!("{}x2", usize::MAX);
    assert!(parse_screen(&overflow).unwrap_err().contains("exceeds"));
}

#[test]
fn ram_is_capped() {
    assert_eq!(parse_ram("1024"), Ok(1024));
    assert_eq!(parse_ram("16777216"), Ok(1 << 24));
    assert_eq!(
        parse_ram("16777217"),
        Err("at most 16777216 cells, got 16777217".to_string())
    );
    assert!(parse_ram("lots").unwrap_err().starts_with("invalid cell count 'lots'"));
}
