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

use crate::client::ForecastEntry;

/// Value of `dateLabel` the API uses for the current day.
pub const TODAY_LABEL: &str = "今日";

const LINE_SEPARATOR: char = '\n';

/// Return the first forecast whose date label is exactly `label`.
///
/// Labels are compared as strings, dates are never parsed. If more than one
/// entry has the label, the earliest one in the sequence is returned.
pub fn find_today<'a>(forecasts: &'a [ForecastEntry], label: &str) -> Option<&'a ForecastEntry> {
    forecasts.iter().find(|f| f.date_label == label)
}

/// Drop the trailing paragraph of a description, keeping everything up to and
/// including the last line separator.
///
/// Text without any line separator is truncated completely and results in an
/// empty string.
pub fn summarize(text: &str) -> &str {
    match text.rfind(LINE_SEPARATOR) {
        Some(p) => &text[..p + LINE_SEPARATOR.len_utf8()],
        None => "",
    }
}

#[cfg(test)]
mod tests {
    use super::{find_today, summarize, TODAY_LABEL};
    use crate::client::{ChanceOfRain, Detail, ForecastEntry, Temperature};

    fn entry(label: &str, date: &str) -> ForecastEntry {
        ForecastEntry {
            date: date.to_owned(),
            date_label: label.to_owned(),
            telop: "晴れ".to_owned(),
            detail: Detail::default(),
            temperature: Temperature::default(),
            chance_of_rain: ChanceOfRain::default(),
            image: None,
        }
    }

    #[test]
    fn test_find_today_empty() {
        assert_eq!(None, find_today(&[], TODAY_LABEL));
    }

    #[test]
    fn test_find_today_no_match() {
        let forecasts = vec![entry("明日", "2023-05-02"), entry("明後日", "2023-05-03")];
        assert_eq!(None, find_today(&forecasts, TODAY_LABEL));
    }

    #[test]
    fn test_find_today_single_match() {
        let forecasts = vec![
            entry("今日", "2023-05-01"),
            entry("明日", "2023-05-02"),
            entry("明後日", "2023-05-03"),
        ];

        assert_eq!(Some(&forecasts[0]), find_today(&forecasts, TODAY_LABEL));
    }

    #[test]
    fn test_find_today_first_match_wins() {
        let forecasts = vec![
            entry("明日", "2023-05-02"),
            entry("今日", "2023-05-01"),
            entry("今日", "2023-04-30"),
        ];

        let found = find_today(&forecasts, TODAY_LABEL).unwrap();
        assert_eq!("2023-05-01", found.date);
    }

    #[test]
    fn test_find_today_exact_label() {
        let forecasts = vec![entry(" 今日", "2023-05-01"), entry("今日は", "2023-05-01")];
        assert_eq!(None, find_today(&forecasts, TODAY_LABEL));
    }

    #[test]
    fn test_summarize_empty() {
        assert_eq!("", summarize(""));
    }

    #[test]
    fn test_summarize_no_separator() {
        assert_eq!("", summarize("晴れています。"));
    }

    #[test]
    fn test_summarize_trailing_separator() {
        let text = "晴れています。\n夜は月が見えるでしょう。\n";
        assert_eq!(text, summarize(text));
    }

    #[test]
    fn test_summarize_drops_last_paragraph() {
        let text = "晴れています。\n\n【関東甲信地方】\n関東甲信地方は高気圧に覆われています。";
        assert_eq!("晴れています。\n\n【関東甲信地方】\n", summarize(text));
    }

    #[test]
    fn test_summarize_is_prefix_ending_at_last_separator() {
        let text = "a\nb\nc";
        let out = summarize(text);
        assert!(text.starts_with(out));
        assert!(out.ends_with('\n'));
        assert_eq!(text.rfind('\n').unwrap() + 1, out.len());
    }

    #[test]
    fn test_summarize_idempotent() {
        for text in ["", "no separator", "one\ntwo", "one\ntwo\n"] {
            let once = summarize(text);
            assert_eq!(once, summarize(once));
        }
    }
}
