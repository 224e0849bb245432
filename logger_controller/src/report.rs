//! State report, state logs and data information.
//!
//! All assemblers are pure: they only read their inputs and return the
//! serialized text, or `PayloadTooLarge` when the text would exceed its
//! limit. Publishing is up to the caller.

use serde::Serialize;
use serde_json::value::RawValue;

use logger_common::consts::MAC_ADDRESS_LEN;

use crate::command::Command;
use crate::error::PayloadError;
use crate::json::Fragment;

/// State log type of the startup log.
pub const STARTUP_LOG_TYPE: &str = "startup";

#[derive(Serialize)]
struct StateReport<'a> {
    dt: &'a str,
    version: &'a str,
    mac: &'a str,
    s: &'a [Fragment],
}

#[derive(Serialize)]
struct StateLog<'a> {
    id: &'a str,
    t: &'a str,
    s: [&'a RawValue; 1],
    m: &'a str,
    n: &'a str,
}

#[derive(Serialize)]
struct DataInformation<'a> {
    dt: &'a str,
    d: &'a [Fragment],
}

fn bounded(what: &'static str, text: String, limit: usize) -> Result<String, PayloadError> {
    if text.len() > limit {
        return Err(PayloadError::PayloadTooLarge {
            what,
            size: text.len(),
            limit,
        });
    }
    Ok(text)
}

/// `aa:bb:cc:dd:ee:ff`
pub fn format_mac(mac: &[u8; MAC_ADDRESS_LEN]) -> String {
    mac.iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(":")
}

/// Assemble the state report `{"dt","version","mac","s":[...]}`.
///
/// `fragments` are the controller's own state entries followed by every
/// component's entries in registration order.
///
/// # Errors
/// `PayloadTooLarge` if the report exceeds `limit`.
pub fn assemble_state_report(
    dt: &str,
    version: &str,
    mac: &[u8; MAC_ADDRESS_LEN],
    fragments: &[Fragment],
    limit: usize,
) -> Result<String, PayloadError> {
    let mac = format_mac(mac);
    let text = serde_json::to_string(&StateReport {
        dt,
        version,
        mac: &mac,
        s: fragments,
    })?;
    bounded("state report", text, limit)
}

/// Assemble the state log `{"id","t","s":[...],"m","n"}` of a dispatched command.
///
/// A command without structured data logs an empty object.
///
/// # Errors
/// `PayloadTooLarge` if the log exceeds `limit`.
pub fn assemble_state_log(id: &str, command: &Command, limit: usize) -> Result<String, PayloadError> {
    let empty = serde_json::value::to_raw_value(&serde_json::Map::new())?;
    let data = command.data().unwrap_or(&*empty);
    let t = command.result().map_or("", |r| r.long_label());
    let text = serde_json::to_string(&StateLog {
        id,
        t,
        s: [data],
        m: command.message(),
        n: command.notes(),
    })?;
    bounded("state log", text, limit)
}

/// Assemble the startup log.
///
/// # Errors
/// `PayloadTooLarge` if the log exceeds `limit`.
pub fn assemble_startup_log(id: &str, limit: usize) -> Result<String, PayloadError> {
    let data = crate::json::key_value(STARTUP_LOG_TYPE, "complete");
    let text = serde_json::to_string(&StateLog {
        id,
        t: STARTUP_LOG_TYPE,
        s: [&*data],
        m: "",
        n: "",
    })?;
    bounded("startup log", text, limit)
}

/// Assemble the data information `{"dt","d":[...]}`.
///
/// # Errors
/// `PayloadTooLarge` if the text exceeds `limit`.
pub fn assemble_data_information(
    dt: &str,
    fragments: &[Fragment],
    limit: usize,
) -> Result<String, PayloadError> {
    let text = serde_json::to_string(&DataInformation { dt, d: fragments })?;
    bounded("data information", text, limit)
}
