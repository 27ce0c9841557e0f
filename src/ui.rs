// Command handlers for the binary. Each one takes an already logged-in
// `LycheeClient`, performs one operation and prints the result; prompts
// (`dialoguer`) and the upload spinner (`indicatif`) live here so the
// library calls stay free of terminal concerns.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use dialoguer::{Confirm, Password};
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use crate::album::Album;
use crate::client::LycheeClient;
use crate::config::{default_config_path, Credentials, LoginConfig};

/// Access flags collected for `set-access`.
#[derive(Debug, Clone, Default)]
pub struct AccessRequest {
    pub password: Option<String>,
    pub downloadable: bool,
    pub visible: bool,
    pub public: bool,
}

/// Build the login data: config file (explicit path or the default one),
/// then the command-line overrides on top. With `ask_password` the
/// password is prompted for when nothing else supplied it.
pub fn resolve_credentials(
    config_path: Option<&Path>,
    overrides: LoginConfig,
    ask_password: bool,
) -> Result<Credentials> {
    let mut config = load_login_config(config_path)?.merge(overrides);
    if ask_password && config.password.is_none() {
        let password = Password::new()
            .with_prompt("Lychee password")
            .interact()
            .context("Failed to read password")?;
        config.password = Some(password);
    }
    Ok(config.into_credentials()?)
}

/// An explicit path must be readable. The default path is optional: if it
/// is missing, an empty config is used and the options must supply
/// everything.
pub fn load_login_config(config_path: Option<&Path>) -> Result<LoginConfig> {
    if let Some(path) = config_path {
        return Ok(LoginConfig::from_file(path)?);
    }
    let Some(default_path) = default_config_path() else {
        return Ok(LoginConfig::default());
    };
    match LoginConfig::from_file(&default_path) {
        Ok(config) => Ok(config),
        Err(e) => {
            info!("Unable to open default config path, using empty config: {}", e);
            Ok(LoginConfig::default())
        }
    }
}

/// One album per line.
pub fn write_album_list(out: &mut impl Write, albums: &[Album]) -> std::io::Result<()> {
    for album in albums {
        writeln!(out, "{}", album)?;
    }
    Ok(())
}

pub fn list_albums(client: &LycheeClient) -> Result<()> {
    let albums = client
        .list_standard_albums()
        .context("Failed to list albums")?;
    write_album_list(&mut std::io::stdout().lock(), &albums)?;
    Ok(())
}

pub fn print_smart_albums(client: &LycheeClient) -> Result<()> {
    let smart = client
        .smart_albums()
        .context("Failed to fetch smart albums")?;
    println!("{}", serde_json::to_string_pretty(&smart)?);
    Ok(())
}

/// Upload with a spinner on stderr while the request is in flight.
pub fn upload(client: &LycheeClient, file: &Path, album_id: &str) -> Result<()> {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
    spinner.set_message(format!("Uploading {}...", file.display()));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = client.upload_image(album_id, file);
    spinner.finish_and_clear();

    let photo_id = result.with_context(|| format!("Upload of {} failed", file.display()))?;
    println!("Image ID: {}", photo_id);
    Ok(())
}

pub fn create_album(client: &LycheeClient, title: &str) -> Result<()> {
    let id = client
        .create_album(title)
        .with_context(|| format!("Failed to create album {:?}", title))?;
    println!("Album ID: {}", id);
    Ok(())
}

/// The server does not report unknown album ids, so the user confirms the
/// id unless `assume_yes` is set.
pub fn set_access(
    client: &LycheeClient,
    album_id: &str,
    access: &AccessRequest,
    assume_yes: bool,
) -> Result<()> {
    if !assume_yes {
        let proceed = Confirm::new()
            .with_prompt(format!(
                "Change access of album {}? The server will not report an unknown id",
                album_id
            ))
            .default(false)
            .interact()?;
        if !proceed {
            println!("Aborted.");
            return Ok(());
        }
    }

    client
        .set_album_access(
            album_id,
            access.password.as_deref(),
            access.downloadable,
            access.visible,
            access.public,
        )
        .with_context(|| format!("Failed to set access for album {}", album_id))?;
    println!("Access updated for album {}", album_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn album_list_is_one_line_per_album() {
        let albums = vec![Album::new("1", "Trip", false), Album::new("7", "Family", true)];
        let mut out = Vec::new();
        write_album_list(&mut out, &albums).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "1\tTrip\n7\tFamily\t(password protected)\n"
        );
    }

    #[test]
    fn explicit_config_path_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.conf");
        assert!(load_login_config(Some(missing.as_path())).is_err());
    }

    #[test]
    fn overrides_complete_a_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lychee.conf");
        std::fs::write(&path, "server=http://gallery\nusername=file-user\n").unwrap();

        let overrides = LoginConfig {
            password: Some("pw".into()),
            ..Default::default()
        };
        let creds = resolve_credentials(Some(path.as_path()), overrides, false).unwrap();
        assert_eq!(creds.server, "http://gallery");
        assert_eq!(creds.username, "file-user");
        assert_eq!(creds.password, "pw");
    }

    #[test]
    fn missing_password_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lychee.conf");
        std::fs::write(&path, "server=http://gallery\nusername=u\n").unwrap();
        let err = resolve_credentials(Some(path.as_path()), LoginConfig::default(), false).unwrap_err();
        assert!(err.to_string().contains("password"));
    }
}
