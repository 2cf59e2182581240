use std::io::Cursor;

use indoc::indoc;

use super::{BufferHost, Frame, Host, HostError, StdHost};

fn std_host(input: &str) -> StdHost<Cursor<Vec<u8>>, Vec<u8>> {
    StdHost::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

#[test]
fn std_host_reads_whitespace_separated_tokens() {
    let mut host = std_host("1 2.5\n\n  -3e2\t4\n");

    assert_eq!(host.read_value(), Ok(1.0));
    assert_eq!(host.read_value(), Ok(2.5));
    assert_eq!(host.read_value(), Ok(-300.0));
    assert_eq!(host.read_value(), Ok(4.0));
    assert_eq!(host.read_value(), Err(HostError::EndOfInput));
}

#[test]
fn std_host_rejects_garbage() {
    let mut host = std_host("abc 5");

    assert_eq!(
        host.read_value(),
        Err(HostError::InvalidNumber("abc".to_string()))
    );
    assert_eq!(host.read_value(), Ok(5.0));
}

#[test]
fn std_host_writes_values_in_g_format() {
    let mut host = std_host("");
    host.write_value(7.0).unwrap();
    host.write_value(0.1).unwrap();
    host.write_value(1e20).unwrap();
    host.write_newline().unwrap();
    host.write_text("Stack_size: 0\n").unwrap();

    let (_, out) = host.into_inner();
    assert_eq!(String::from_utf8(out).unwrap(), "7 0.1 1e+20 \nStack_size: 0\n");
}

#[test]
fn std_host_renders_frames() {
    let mut host = std_host("");
    let cells = [0.0, 0.5, 1.0, 2.0, -1.0, f64::NAN];
    host.graphics_draw(Frame {
        width: 3,
        height: 2,
        cells: &cells,
    })
    .unwrap();

    let (_, out) = host.into_inner();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        indoc! {"
            +---+
            | +@|
            |@ ?|
            +---+
        "}
    );
}

#[test]
fn empty_frame_renders_border_only() {
    let frame = Frame {
        width: 0,
        height: 0,
        cells: &[],
    };
    assert_eq!(frame.render_text(), "++\n++\n");
}

#[test]
fn buffer_host_records_everything() {
    let mut host = BufferHost::with_input([1.0]);
    host.push_input(2.0);

    assert_eq!(host.read_value(), Ok(1.0));
    assert_eq!(host.read_value(), Ok(2.0));
    assert_eq!(host.read_value(), Err(HostError::EndOfInput));

    host.write_value(3.0).unwrap();
    host.graphics_init(1, 2).unwrap();
    host.graphics_draw(Frame {
        width: 1,
        height: 2,
        cells: &[0.0, 1.0],
    })
    .unwrap();

    assert_eq!(host.output(), "3 ");
    assert_eq!(host.screens(), &[(1, 2)]);
    assert_eq!(host.frames(), &[vec![0.0, 1.0]]);
}

#[test]
fn host_errors_display() {
    assert_eq!(HostError::EndOfInput.to_string(), "end of input");
    assert_eq!(
        HostError::InvalidNumber("x".into()).to_string(),
        "invalid number `x`"
    );
    let io = std::io::Error::other("broken pipe");
    assert_eq!(HostError::from(io).to_string(), "i/o error: broken pipe");
}
