//! Engine-side transaction records and the normalization step that turns
//! loosely typed JSON documents into them.
//!
//! Stored transactions are always well formed and convert directly with
//! [Record::from]. Documents posted by clients may be missing fields or hold
//! values of the wrong type, so [parse_records] maps every such field to a
//! default and reports what it did as a [RecordAnomaly].

use serde::Serialize;
use serde_json::{Map, Value};
use time::{
    Date, Month, OffsetDateTime, PrimitiveDateTime, format_description::well_known::Rfc3339,
    macros::format_description,
};

use crate::transaction::{Transaction, TransactionKind};

/// A transaction as seen by the aggregation engine.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    /// Whether the amount counts as income or expense.
    pub kind: TransactionKind,
    /// The amount of money, zero if the source document had no usable amount.
    pub amount: f64,
    /// The calendar date, `None` if it was missing or could not be parsed.
    pub date: Option<Date>,
    /// The expense category, kept verbatim. Empty when absent.
    pub category: String,
    /// The income source, kept verbatim. Empty when absent.
    pub source: String,
}

impl Record {
    /// The calendar month of the record's date.
    pub fn month(&self) -> Option<Month> {
        self.date.map(|date| date.month())
    }

    /// The year of the record's date.
    pub fn year(&self) -> Option<i32> {
        self.date.map(|date| date.year())
    }
}

impl From<&Transaction> for Record {
    fn from(transaction: &Transaction) -> Self {
        Self {
            kind: transaction.kind,
            amount: transaction.amount,
            date: Some(transaction.date),
            category: transaction.category.clone(),
            source: transaction.source.clone(),
        }
    }
}

/// The input to [parse_records] was not a sequence of record-shaped values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ShapeError {
    /// The top level value was not a JSON array.
    #[error("expected an array of transaction records, got {0}")]
    NotAnArray(&'static str),

    /// An element of the array was not a JSON object.
    #[error("element {index} is not a transaction record, got {found}")]
    NotARecord {
        /// The position of the offending element.
        index: usize,
        /// The JSON type of the offending element.
        found: &'static str,
    },
}

/// A field of a single record that was missing or malformed and has been
/// replaced by a default.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "anomaly", rename_all = "snake_case")]
pub enum RecordAnomaly {
    /// The record had no recognisable kind and was left out of every view.
    UnknownKind {
        /// The position of the record in the input.
        index: usize,
    },
    /// The amount was absent or not a number and counts as zero.
    AmountDefaulted {
        /// The position of the record in the input.
        index: usize,
    },
    /// The record had no date and is left out of the month-based views.
    DateMissing {
        /// The position of the record in the input.
        index: usize,
    },
    /// The date could not be parsed and the record is left out of the
    /// month-based views.
    DateUnparseable {
        /// The position of the record in the input.
        index: usize,
        /// The raw date value.
        value: String,
    },
}

/// The records that survived normalization and the anomalies found on the way.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedRecords {
    /// Records ready for aggregation, in input order.
    pub records: Vec<Record>,
    /// Every field that was defaulted and every record that was skipped.
    pub anomalies: Vec<RecordAnomaly>,
}

/// Borrowed view of the fields the engine reads from a record document.
struct RawRecord<'a> {
    kind: Option<&'a Value>,
    amount: Option<&'a Value>,
    date: Option<&'a Value>,
    category: Option<&'a Value>,
    source: Option<&'a Value>,
}

impl<'a> RawRecord<'a> {
    fn from_object(object: &'a Map<String, Value>) -> Self {
        Self {
            // Documents written by older clients store the kind under "type".
            kind: object.get("kind").or_else(|| object.get("type")),
            amount: object.get("amount"),
            date: object.get("date"),
            category: object.get("category"),
            source: object.get("source"),
        }
    }
}

/// Validate the shape of `value` and normalize each element into a [Record].
///
/// # Errors
/// Returns a [ShapeError] if `value` is not an array or any element is not
/// an object. No partial result is produced in that case.
pub fn parse_records(value: &Value) -> Result<NormalizedRecords, ShapeError> {
    let elements = value
        .as_array()
        .ok_or_else(|| ShapeError::NotAnArray(json_type_name(value)))?;

    let objects = elements
        .iter()
        .enumerate()
        .map(|(index, element)| {
            element.as_object().ok_or(ShapeError::NotARecord {
                index,
                found: json_type_name(element),
            })
        })
        .collect::<Result<Vec<_>, ShapeError>>()?;

    let mut normalized = NormalizedRecords {
        records: Vec::with_capacity(objects.len()),
        anomalies: Vec::new(),
    };

    for (index, object) in objects.into_iter().enumerate() {
        let raw = RawRecord::from_object(object);

        if let Some(record) = normalize_record(index, &raw, &mut normalized.anomalies) {
            normalized.records.push(record);
        }
    }

    for anomaly in &normalized.anomalies {
        tracing::debug!("absorbed malformed record field: {anomaly:?}");
    }

    Ok(normalized)
}

fn normalize_record(
    index: usize,
    raw: &RawRecord<'_>,
    anomalies: &mut Vec<RecordAnomaly>,
) -> Option<Record> {
    let kind = match raw
        .kind
        .and_then(Value::as_str)
        .map(str::parse::<TransactionKind>)
    {
        Some(Ok(kind)) => kind,
        _ => {
            anomalies.push(RecordAnomaly::UnknownKind { index });
            return None;
        }
    };

    let amount = match raw.amount.and_then(Value::as_f64) {
        Some(amount) => amount,
        None => {
            anomalies.push(RecordAnomaly::AmountDefaulted { index });
            0.0
        }
    };

    let date = match raw.date {
        None | Some(Value::Null) => {
            anomalies.push(RecordAnomaly::DateMissing { index });
            None
        }
        Some(value) => {
            let date = value.as_str().and_then(parse_date);

            if date.is_none() {
                anomalies.push(RecordAnomaly::DateUnparseable {
                    index,
                    value: value_to_text(value),
                });
            }

            date
        }
    };

    Some(Record {
        kind,
        amount,
        date,
        category: text_or_empty(raw.category),
        source: text_or_empty(raw.source),
    })
}

/// Parse a calendar date from either a plain `YYYY-MM-DD` date or a date-time.
///
/// Date-times with an offset (RFC 3339) and without one (`YYYY-MM-DDTHH:MM:SS`)
/// both contribute their calendar date.
pub fn parse_date(text: &str) -> Option<Date> {
    let text = text.trim();

    if let Ok(date) = Date::parse(text, format_description!("[year]-[month]-[day]")) {
        return Some(date);
    }

    if let Ok(date_time) = OffsetDateTime::parse(text, &Rfc3339) {
        return Some(date_time.date());
    }

    PrimitiveDateTime::parse(
        text,
        format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    )
    .map(|date_time| date_time.date())
    .ok()
}

fn text_or_empty(value: Option<&Value>) -> String {
    value
        .and_then(Value::as_str)
        .map(str::to_owned)
        .unwrap_or_default()
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::date;

    use crate::transaction::TransactionKind;

    use super::{RecordAnomaly, ShapeError, parse_date, parse_records};

    #[test]
    fn parses_well_formed_records() {
        let value = json!([
            {"kind": "income", "amount": 100, "date": "2026-01-15", "source": "Salary"},
            {"kind": "expense", "amount": 40.5, "date": "2026-01-20", "category": "Food"},
        ]);

        let normalized = parse_records(&value).unwrap();

        assert!(normalized.anomalies.is_empty(), "{:?}", normalized.anomalies);
        assert_eq!(normalized.records.len(), 2);
        assert_eq!(normalized.records[0].kind, TransactionKind::Income);
        assert_eq!(normalized.records[0].amount, 100.0);
        assert_eq!(normalized.records[0].source, "Salary");
        assert_eq!(normalized.records[1].date, Some(date!(2026 - 01 - 20)));
        assert_eq!(normalized.records[1].category, "Food");
    }

    #[test]
    fn accepts_type_as_an_alias_for_kind() {
        let value = json!([{"type": "expense", "amount": 1, "date": "2026-03-01"}]);

        let normalized = parse_records(&value).unwrap();

        assert_eq!(normalized.records[0].kind, TransactionKind::Expense);
    }

    #[test]
    fn empty_array_yields_no_records() {
        let normalized = parse_records(&json!([])).unwrap();

        assert!(normalized.records.is_empty());
        assert!(normalized.anomalies.is_empty());
    }

    #[test]
    fn rejects_non_array_input() {
        let result = parse_records(&json!({"kind": "income"}));

        assert_eq!(result, Err(ShapeError::NotAnArray("an object")));
    }

    #[test]
    fn rejects_array_with_non_record_element() {
        let value = json!([{"kind": "income", "amount": 1}, 42]);

        let result = parse_records(&value);

        assert_eq!(
            result,
            Err(ShapeError::NotARecord {
                index: 1,
                found: "a number"
            })
        );
    }

    #[test]
    fn missing_or_non_numeric_amount_defaults_to_zero() {
        let value = json!([
            {"kind": "income", "date": "2026-01-01"},
            {"kind": "income", "amount": "abc", "date": "2026-01-01"},
            {"kind": "income", "amount": null, "date": "2026-01-01"},
        ]);

        let normalized = parse_records(&value).unwrap();

        assert!(normalized.records.iter().all(|record| record.amount == 0.0));
        assert_eq!(
            normalized.anomalies,
            vec![
                RecordAnomaly::AmountDefaulted { index: 0 },
                RecordAnomaly::AmountDefaulted { index: 1 },
                RecordAnomaly::AmountDefaulted { index: 2 },
            ]
        );
    }

    #[test]
    fn missing_and_unparseable_dates_become_none() {
        let value = json!([
            {"kind": "expense", "amount": 1},
            {"kind": "expense", "amount": 1, "date": "next tuesday"},
            {"kind": "expense", "amount": 1, "date": 20260101},
        ]);

        let normalized = parse_records(&value).unwrap();

        assert!(normalized.records.iter().all(|record| record.date.is_none()));
        assert_eq!(
            normalized.anomalies,
            vec![
                RecordAnomaly::DateMissing { index: 0 },
                RecordAnomaly::DateUnparseable {
                    index: 1,
                    value: "next tuesday".to_owned()
                },
                RecordAnomaly::DateUnparseable {
                    index: 2,
                    value: "20260101".to_owned()
                },
            ]
        );
    }

    #[test]
    fn unknown_kind_skips_the_record() {
        let value = json!([
            {"kind": "transfer", "amount": 5, "date": "2026-01-01"},
            {"amount": 5, "date": "2026-01-01"},
            {"kind": "income", "amount": 5, "date": "2026-01-01"},
        ]);

        let normalized = parse_records(&value).unwrap();

        assert_eq!(normalized.records.len(), 1);
        assert_eq!(
            normalized.anomalies,
            vec![
                RecordAnomaly::UnknownKind { index: 0 },
                RecordAnomaly::UnknownKind { index: 1 },
            ]
        );
    }

    #[test]
    fn absent_labels_become_empty_strings() {
        let value = json!([{"kind": "expense", "amount": 3, "date": "2026-01-01", "category": 7}]);

        let normalized = parse_records(&value).unwrap();

        assert_eq!(normalized.records[0].category, "");
        assert_eq!(normalized.records[0].source, "");
    }

    #[test]
    fn parse_date_accepts_dates_and_date_times() {
        assert_eq!(parse_date("2026-02-03"), Some(date!(2026 - 02 - 03)));
        assert_eq!(
            parse_date("2026-02-03T10:15:00Z"),
            Some(date!(2026 - 02 - 03))
        );
        assert_eq!(
            parse_date("2026-02-03T10:15:00"),
            Some(date!(2026 - 02 - 03))
        );
        assert_eq!(parse_date("2026-13-03"), None);
        assert_eq!(parse_date(""), None);
    }
}
