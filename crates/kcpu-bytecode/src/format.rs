//! Shared text formatting for dumps, traces and program output.

use crate::constants::REGISTER_COUNT;
use crate::instruction::Operand;

/// Significant digits used by [`format_value`].
const PRECISION: i32 = 6;

/// Format a value the way C's `%g` does.
///
/// Six significant digits, trailing zeros removed, exponent form when the
/// decimal exponent is below -4 or at least 6.
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        return if value.is_sign_negative() { "-nan" } else { "nan" }.to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-inf" } else { "inf" }.to_string();
    }
    if value == 0.0 {
        return if value.is_sign_negative() { "-0" } else { "0" }.to_string();
    }

    // Round to the target precision first: the exponent has to be taken from
    // the rounded value (999999.5 prints as 1e+06).
    let sci = format!("{:.*e}", (PRECISION - 1) as usize, value);
    let (mantissa, exp) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => (sci.as_str(), 0),
    };

    if exp < -4 || exp >= PRECISION {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", strip_zeros(mantissa), sign, exp.abs())
    } else {
        let decimals = (PRECISION - 1 - exp) as usize;
        strip_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

fn strip_zeros(s: &str) -> &str {
    if !s.contains('.') {
        return s;
    }
    s.trim_end_matches('0').trim_end_matches('.')
}

/// Register mnemonic: `a` through `z`, `r<n>` past the register file.
pub fn register_name(index: u8) -> String {
    if (index as usize) < REGISTER_COUNT {
        char::from(b'a' + index).to_string()
    } else {
        format!("r{index}")
    }
}

/// Calculate minimum width needed to display numbers up to `count - 1`.
pub fn width_for_count(count: usize) -> usize {
    if count <= 1 {
        1
    } else {
        ((count - 1) as f64).log10().floor() as usize + 1
    }
}

/// Render a stream operand; `None` for operand-less instructions.
///
/// Labels render as raw `@offset` addresses.
pub fn format_operand(operand: &Operand) -> Option<String> {
    let text = match *operand {
        Operand::None => return None,
        Operand::Constant(v) => format_value(v),
        Operand::Register(r) => register_name(r),
        Operand::Ram(i) => format!("[{}]", format_value(i)),
        Operand::Vram(i) => format!("vram[{}]", format_value(i)),
        Operand::Operator(op) if op.is_ascii_graphic() => char::from(op).to_string(),
        Operand::Operator(op) => format!("\\x{op:02x}"),
        Operand::Label(target) => format!("@{target}"),
    };
    Some(text)
}
