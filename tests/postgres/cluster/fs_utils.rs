//! Reads the embedded cluster's generated files back into its settings.

use super::BoxError;
use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use postgresql_embedded::Settings;
use std::io::ErrorKind;

/// Reads `name` inside `dir`, treating a missing file as `None`.
fn read_optional(dir: &Utf8Path, name: &str) -> Result<Option<String>, BoxError> {
    let opened = match Dir::open_ambient_dir(dir, ambient_authority()) {
        Ok(opened) => opened,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };
    match opened.read_to_string(name) {
        Ok(contents) => Ok(Some(contents)),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Replaces the configured password with the one bootstrap wrote to disk.
pub(super) fn sync_password_from_file(settings: &mut Settings) -> Result<(), BoxError> {
    let raw_path = settings.password_file.to_string_lossy().into_owned();
    let path = Utf8Path::new(&raw_path);
    let (Some(parent), Some(file_name)) = (path.parent(), path.file_name()) else {
        return Ok(());
    };
    if let Some(contents) = read_optional(parent, file_name)? {
        let password = contents.trim_end();
        if !password.is_empty() {
            password.clone_into(&mut settings.password);
        }
    }
    Ok(())
}

/// Adopts the port the running server recorded in `postmaster.pid`.
pub(super) fn sync_port_from_pid(settings: &mut Settings) -> Result<(), BoxError> {
    let raw_dir = settings.data_dir.to_string_lossy().into_owned();
    let Some(contents) = read_optional(Utf8Path::new(&raw_dir), "postmaster.pid")? else {
        return Ok(());
    };
    // The fourth line of postmaster.pid holds the listening port.
    if let Some(port) = contents
        .lines()
        .nth(3)
        .and_then(|line| line.trim().parse::<u16>().ok())
    {
        settings.port = port;
    }
    Ok(())
}
