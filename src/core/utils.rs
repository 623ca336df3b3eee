use chrono::{DateTime, FixedOffset};

pub fn datetime_to_string(datetime: DateTime<FixedOffset>) -> String {
    datetime.to_rfc3339()
}

pub fn datetime_to_string_opt(datetime: Option<DateTime<FixedOffset>>) -> Option<String> {
    datetime.map(datetime_to_string)
}
