//! Environment preparation for the embedded test cluster.

use super::BoxError;
use crate::test_helpers::EnvChange;
use std::ffi::OsString;
use std::net::TcpListener;

pub(super) fn env_vars_to_os(env_vars: &[(String, Option<String>)]) -> Vec<EnvChange> {
    env_vars
        .iter()
        .map(|(key, value)| (OsString::from(key), value.as_ref().map(OsString::from)))
        .collect()
}

/// Pins `PG_PORT` to a free local port unless the caller already chose one.
pub(super) fn port_env_changes() -> Result<Vec<EnvChange>, BoxError> {
    if std::env::var_os("PG_PORT").is_some() {
        return Ok(Vec::new());
    }
    let listener = TcpListener::bind(("127.0.0.1", 0))?;
    let port = listener.local_addr()?.port();
    drop(listener);
    Ok(vec![(
        OsString::from("PG_PORT"),
        Some(OsString::from(port.to_string())),
    )])
}
