use super::format::{format_value, register_name, width_for_count};

#[test]
fn integers_print_without_fraction() {
    assert_eq!(format_value(7.0), "7");
    assert_eq!(format_value(-12.0), "-12");
    assert_eq!(format_value(100000.0), "100000");
}

#[test]
fn fractions_drop_trailing_zeros() {
    assert_eq!(format_value(0.1), "0.1");
    assert_eq!(format_value(2.5), "2.5");
    assert_eq!(format_value(1.0 / 3.0), "0.333333");
    assert_eq!(format_value(0.0001), "0.0001");
}

#[test]
fn large_and_small_use_exponent() {
    assert_eq!(format_value(1e20), "1e+20");
    assert_eq!(format_value(1234567.0), "1.23457e+06");
    assert_eq!(format_value(1.5e-5), "1.5e-05");
    assert_eq!(format_value(-2e-7), "-2e-07");
    assert_eq!(format_value(1e100), "1e+100");
}

#[test]
fn rounding_can_bump_the_exponent() {
    assert_eq!(format_value(999999.5), "1e+06");
    assert_eq!(format_value(999999.0), "999999");
}

#[test]
fn special_values() {
    assert_eq!(format_value(0.0), "0");
    assert_eq!(format_value(-0.0), "-0");
    assert_eq!(format_value(f64::INFINITY), "inf");
    assert_eq!(format_value(f64::NEG_INFINITY), "-inf");
    assert_eq!(format_value(f64::NAN), "nan");
}

#[test]
fn register_names() {
    assert_eq!(register_name(0), "a");
    assert_eq!(register_name(25), "z");
    assert_eq!(register_name(26), "r26");
}

#[test]
fn widths() {
    assert_eq!(width_for_count(0), 1);
    assert_eq!(width_for_count(1), 1);
    assert_eq!(width_for_count(10), 1);
    assert_eq!(width_for_count(11), 2);
    assert_eq!(width_for_count(101), 3);
}
