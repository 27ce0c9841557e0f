// Authenticated client for a Lychee server. A `LycheeClient` only exists
// after a successful login, so every method on it runs with the session
// cookie already in the jar.

use std::fs;
use std::path::Path;

use log::{debug, info, warn};
use serde_json::Value;

use crate::album::Album;
use crate::dispatch::{self, Attachment, FunctionCall, Payload, RawResponse, Session};
use crate::error::{LycheeError, Result};
use crate::image::ImageType;
use crate::response::{body_as_json, body_as_text, check_status, decode_album_list, is_integer};

pub struct LycheeClient {
    session: Session,
}

impl LycheeClient {
    /// Log in to the server at `server_address` and return the client
    /// holding that session.
    ///
    /// Fails with `Status` for a non-2xx answer and with `Authentication`
    /// when the server answers with anything but `true` (wrong credentials
    /// come back as `false` with status 200).
    pub fn login(server_address: &str, username: &str, password: &str) -> Result<Self> {
        let session = Session::new(server_address)?;
        let call = FunctionCall::new("Session::login")
            .param("user", username)
            .param("password", password);

        let res = dispatch::send(&session, Payload::Form(call))?;
        check_status(&res)?;

        let body = body_as_text(&res);
        if body != "true" {
            return Err(LycheeError::Authentication {
                status: res.status,
                body,
            });
        }

        info!("logged in to {} as {}", session.server_address(), username);
        Ok(LycheeClient { session })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn call(&self, call: FunctionCall) -> Result<RawResponse> {
        let res = dispatch::send(&self.session, Payload::Form(call))?;
        check_status(&res)?;
        Ok(res)
    }

    /// Regular (non-smart) albums in server order.
    pub fn list_standard_albums(&self) -> Result<Vec<Album>> {
        let albums = decode_album_list(&self.all_albums()?)?;
        debug!("server listed {} albums", albums.len());
        Ok(albums)
    }

    /// The undecoded `Albums::get` answer: `albums` plus `smartalbums`.
    pub fn all_albums(&self) -> Result<Value> {
        let res = self.call(FunctionCall::new("Albums::get"))?;
        body_as_json(&res)
    }

    /// The `smartalbums` object of `Albums::get` (unsorted, starred, public,
    /// recent), passed through as the server sent it.
    pub fn smart_albums(&self) -> Result<Value> {
        let mut all = self.all_albums()?;
        all.get_mut("smartalbums")
            .map(Value::take)
            .ok_or_else(|| LycheeError::Decode("missing \"smartalbums\" object".into()))
    }

    /// Create an album and return the id the server assigned. The id is
    /// passed on as sent; its format is up to the server. A password has to
    /// be set afterwards with [`LycheeClient::set_album_access`].
    pub fn create_album(&self, title: &str) -> Result<String> {
        let res = self.call(FunctionCall::new("Album::add").param("title", title))?;
        let id = body_as_text(&res);
        info!("created album {:?} with id {}", title, id);
        Ok(id)
    }

    /// Set every access flag of an album at once.
    ///
    /// The server gives no distinct answer for an unknown album id, so a
    /// successful return does not prove the album exists. `password` of
    /// `None` clears the album password. Without `public` only logged-in
    /// users see the album; without `visible` it is reachable only by
    /// direct link.
    pub fn set_album_access(
        &self,
        album_id: &str,
        password: Option<&str>,
        downloadable: bool,
        visible: bool,
        public: bool,
    ) -> Result<()> {
        let call = FunctionCall::new("Album::setPublic")
            .param("albumID", album_id)
            .param("password", password.unwrap_or(""))
            .param("downloadable", flag(downloadable))
            .param("public", flag(public))
            .param("visible", flag(visible));
        self.call(call)?;
        warn!(
            "access flags sent for album {}; the server does not confirm the album exists",
            album_id
        );
        Ok(())
    }

    /// Upload a JPEG, PNG or GIF into `album_id` and return the new photo id.
    ///
    /// The path must name a regular file with one of the accepted
    /// suffixes; otherwise nothing is sent.
    pub fn upload_image(&self, album_id: &str, path: impl AsRef<Path>) -> Result<String> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(LycheeError::NotAFile {
                path: path.to_path_buf(),
            });
        }
        let image_type =
            ImageType::from_path(path).ok_or_else(|| LycheeError::UnsupportedFileType {
                path: path.to_path_buf(),
            })?;

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let attachment = Attachment {
            file_name,
            content_type: Some(image_type.mime().to_string()),
            data: fs::read(path)?,
        };
        let call = FunctionCall::new("Photo::add").param("albumID", album_id);

        let res = dispatch::send(&self.session, Payload::Multipart(call, attachment))?;
        check_status(&res)?;

        let body = body_as_text(&res);
        if !is_integer(Some(body.as_str())) {
            return Err(LycheeError::UploadRejected { body });
        }
        info!("uploaded {} as photo {}", path.display(), body);
        Ok(body)
    }

    /// `Album::get` for one album, returned without any checks.
    pub fn album(&self, album_id: &str) -> Result<RawResponse> {
        let call = FunctionCall::new("Album::get")
            .param("albumID", album_id)
            .param("password", "");
        dispatch::send(&self.session, Payload::Form(call))
    }
}

fn flag(on: bool) -> &'static str {
    if on {
        "1"
    } else {
        "0"
    }
}
