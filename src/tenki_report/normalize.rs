// tenki_report - Daily weather forecast reports for Slack and Prometheus
//
// Copyright 2023 Nick Pillitteri
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <http://www.gnu.org/licenses/>.
//

//! Conversion of the localized strings the forecast API uses into numbers.
//!
//! Every function here accepts any string and returns a value. Placeholders like
//! `"--%"` or text without any digits result in `0.0` rather than an error.

const PERCENT_SIGNS: [char; 2] = ['%', '％'];

/// Parse the first number embedded in `s`, with an optional sign and fraction.
///
/// ```
/// use tenki_report::normalize::parse_number;
///
/// assert_eq!(30.0, parse_number("30"));
/// assert_eq!(-2.5, parse_number("-2.5度"));
/// assert_eq!(0.0, parse_number("--"));
/// ```
pub fn parse_number(s: &str) -> f64 {
    let normalized = to_ascii_digits(s);
    let bytes = normalized.as_bytes();

    let start = match bytes.iter().position(u8::is_ascii_digit) {
        Some(i) => i,
        None => return 0.0,
    };

    let mut end = digits_end(bytes, start);
    if end + 1 < bytes.len() && bytes[end] == b'.' && bytes[end + 1].is_ascii_digit() {
        end = digits_end(bytes, end + 1);
    }

    let start = if start > 0 && (bytes[start - 1] == b'-' || bytes[start - 1] == b'+') {
        start - 1
    } else {
        start
    };

    normalized[start..end].parse::<f64>().unwrap_or(0.0)
}

/// Parse a percentage such as `"70%"` into a value between 0 and 100.
pub fn parse_percent(s: &str) -> f64 {
    let stripped: String = s.chars().filter(|c| !PERCENT_SIGNS.contains(c)).collect();
    parse_number(&stripped)
}

/// Parse the first run of digits found anywhere in free text, ignoring signs and
/// decimal points, e.g. `"北の風 5m/s"` gives `5.0`.
pub fn parse_digit_run(s: &str) -> f64 {
    let normalized = to_ascii_digits(s);
    let bytes = normalized.as_bytes();

    match bytes.iter().position(u8::is_ascii_digit) {
        Some(start) => normalized[start..digits_end(bytes, start)].parse::<f64>().unwrap_or(0.0),
        None => 0.0,
    }
}

fn digits_end(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|b| !b.is_ascii_digit())
        .map(|i| start + i)
        .unwrap_or(bytes.len())
}

/// Replace full-width digits, signs, and full stops with their ASCII forms.
fn to_ascii_digits(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '０'..='９' => char::from_u32(c as u32 - '０' as u32 + '0' as u32).unwrap_or(c),
            '．' => '.',
            '－' => '-',
            '＋' => '+',
            _ => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{parse_digit_run, parse_number, parse_percent};

    #[test]
    fn test_parse_number_plain() {
        assert_eq!(0.0, parse_number("0"));
        assert_eq!(30.0, parse_number("30"));
        assert_eq!(12.75, parse_number("12.75"));
    }

    #[test]
    fn test_parse_number_signed() {
        assert_eq!(-3.0, parse_number("-3"));
        assert_eq!(4.0, parse_number("+4"));
        assert_eq!(-0.5, parse_number("気温-0.5"));
    }

    #[test]
    fn test_parse_number_embedded_units() {
        assert_eq!(5.0, parse_number("5m"));
        assert_eq!(21.0, parse_number("約21度"));
    }

    #[test]
    fn test_parse_number_trailing_dot() {
        assert_eq!(7.0, parse_number("7."));
        assert_eq!(7.0, parse_number("7.m"));
    }

    #[test]
    fn test_parse_number_full_width() {
        assert_eq!(0.5, parse_number("０．５メートル"));
        assert_eq!(-12.0, parse_number("－１２"));
    }

    #[test]
    fn test_parse_number_no_digits() {
        assert_eq!(0.0, parse_number(""));
        assert_eq!(0.0, parse_number("--"));
        assert_eq!(0.0, parse_number("-"));
        assert_eq!(0.0, parse_number("null"));
    }

    #[test]
    fn test_parse_percent() {
        assert_eq!(70.0, parse_percent("70%"));
        assert_eq!(0.0, parse_percent("00%"));
        assert_eq!(50.0, parse_percent("50％"));
        assert_eq!(100.0, parse_percent("100%"));
        assert_eq!(12.5, parse_percent("12.5%"));
    }

    #[test]
    fn test_parse_percent_placeholder() {
        assert_eq!(0.0, parse_percent("--%"));
        assert_eq!(0.0, parse_percent("%"));
        assert_eq!(0.0, parse_percent(""));
    }

    #[test]
    fn test_parse_digit_run() {
        assert_eq!(5.0, parse_digit_run("5m/s"));
        assert_eq!(12.0, parse_digit_run("北の風 12m 後 南の風 3m"));
        assert_eq!(3.0, parse_digit_run("南の風　やや強く　３メートル"));
    }

    #[test]
    fn test_parse_digit_run_ignores_sign_and_fraction() {
        assert_eq!(2.0, parse_digit_run("-2.5"));
    }

    #[test]
    fn test_parse_digit_run_no_digits() {
        assert_eq!(0.0, parse_digit_run(""));
        assert_eq!(0.0, parse_digit_run("北の風　後　南の風"));
    }
}
