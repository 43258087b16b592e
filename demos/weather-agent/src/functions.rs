//! Sample native functions with canned answers.

use fnwrap::{NativeFunction, Signature};
use serde_json::json;

/// Weather lookup with `unit` defaulting to fahrenheit.
pub fn get_current_weather() -> NativeFunction {
    NativeFunction::new(
        "get_current_weather",
        Signature::new()
            .required("location")
            .optional("unit", "fahrenheit"),
        |args| {
            let location = args.str("location")?;
            let reading = match location.to_lowercase() {
                l if l.contains("tokyo") => json!({ "location": "Tokyo", "temperature": "10", "unit": "celsius" }),
                l if l.contains("san francisco") => {
                    json!({ "location": "San Francisco", "temperature": "72", "unit": "fahrenheit" })
                }
                l if l.contains("paris") => json!({ "location": "Paris", "temperature": "22", "unit": "celsius" }),
                _ => json!({ "location": location, "temperature": "unknown" }),
            };
            Ok(json!(reading.to_string()))
        },
    )
}

/// Local time lookup.
pub fn get_current_time() -> NativeFunction {
    NativeFunction::new(
        "get_current_time",
        Signature::new().required("location"),
        |args| {
            let location = args.str("location")?;
            let time = match location.to_lowercase() {
                l if l.contains("tokyo") => Some("3:00 PM"),
                l if l.contains("san francisco") => Some("12:00 PM"),
                l if l.contains("paris") => Some("9:00 PM"),
                _ => None,
            };
            Ok(match time {
                Some(time) => json!(json!({ "location": location, "time": time }).to_string()),
                None => json!(format!("I don't know the time in {location}")),
            })
        },
    )
}
