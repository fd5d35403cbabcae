use regex::Regex;
use chrono::{Datelike, NaiveDate};

// helper function to clean a sql query
pub fn clean(input : &str) -> String
{
    let s = input.replace('\n', " ").replace('\t', " ");
    let r = Regex::new(r"\s{2,}").expect("static regex");
    r.replace_all(&s, " ").trim().to_string()
}

// helper function to round a float to six digits after decimal point
pub fn round(f : f64) -> f64
{
    (f * 1_000_000.).round() / 1_000_000.
}

// helper function to compute number of days in a given month
pub fn days_in_month(year : i32, month : u32) -> u32
{
    let first_of_next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    };

    first_of_next
        .and_then(|d| d.pred_opt())
        .map(|d| d.day())
        .unwrap_or(31)
}

/// last calendar day of the month `date` falls in
pub fn month_end(date : NaiveDate) -> NaiveDate
{
    let last = days_in_month(date.year(), date.month());
    date.with_day(last).unwrap_or(date)
}
