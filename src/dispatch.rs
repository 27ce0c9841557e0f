// Request dispatch: every remote operation is a POST to the same
// `php/index.php` endpoint, told apart only by its `function` field. This
// module owns the session (server address + cookie jar) and turns a
// `FunctionCall` into that one request.

use std::sync::Arc;

use log::debug;
use reqwest::blocking::{multipart, Client};
use reqwest::cookie::{CookieStore, Jar};
use reqwest::Url;

use crate::error::{LycheeError, Result};

/// Path of the dispatch endpoint relative to the server address.
pub const ENDPOINT: &str = "/php/index.php";

/// Content type used for attachments when the caller does not name one.
pub const DEFAULT_CONTENT_TYPE: &str = "application/octet-stream";

/// Server address plus the cookie jar that carries the login cookie.
///
/// The jar is explicit so it can be inspected, but the `Client` built here
/// is the only thing that reads or writes it: cookies from every response
/// are stored, and stored cookies go out with every request.
pub struct Session {
    server_address: String,
    jar: Arc<Jar>,
    http: Client,
}

impl Session {
    /// Build a session for `server_address`. Trailing slashes are dropped so
    /// the endpoint can be appended as-is.
    pub fn new(server_address: &str) -> Result<Self> {
        let server_address = server_address.trim_end_matches('/').to_string();
        let jar = Arc::new(Jar::default());
        let http = Client::builder()
            .cookie_provider(jar.clone())
            .build()
            .map_err(LycheeError::InvalidRequest)?;
        Ok(Session {
            server_address,
            jar,
            http,
        })
    }

    pub fn server_address(&self) -> &str {
        &self.server_address
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.server_address, ENDPOINT)
    }

    /// The `Cookie` header the next request to the endpoint would carry,
    /// or `None` while the jar holds nothing for it.
    pub fn cookie_header(&self) -> Option<String> {
        let url = Url::parse(&self.endpoint()).ok()?;
        self.jar
            .cookies(&url)
            .and_then(|value| value.to_str().ok().map(str::to_string))
    }
}

/// A named remote function and its ordered string parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionCall {
    function: String,
    params: Vec<(String, String)>,
}

impl FunctionCall {
    pub fn new(function: &str) -> Self {
        FunctionCall {
            function: function.to_string(),
            params: Vec::new(),
        }
    }

    pub fn param(mut self, name: &str, value: impl Into<String>) -> Self {
        self.params.push((name.to_string(), value.into()));
        self
    }

    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn params(&self) -> &[(String, String)] {
        &self.params
    }

    /// `function` first, then the parameters in insertion order.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = Vec::with_capacity(self.params.len() + 1);
        fields.push(("function".to_string(), self.function.clone()));
        fields.extend(self.params.iter().cloned());
        fields
    }
}

/// Binary file content sent as multipart part `"0"`.
#[derive(Debug, Clone)]
pub struct Attachment {
    pub file_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

pub enum Payload {
    Form(FunctionCall),
    Multipart(FunctionCall, Attachment),
}

impl Payload {
    fn call(&self) -> &FunctionCall {
        match self {
            Payload::Form(call) | Payload::Multipart(call, _) => call,
        }
    }
}

/// Status and body of a response, before any interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Name of the multipart part that carries the uploaded file.
pub const ATTACHMENT_PART: &str = "0";

/// Send one payload to the session's endpoint and collect the full
/// response. Status codes are not looked at here.
pub fn send(session: &Session, payload: Payload) -> Result<RawResponse> {
    let url = session.endpoint();
    debug!("POST {} function={}", url, payload.call().function());

    let request = match payload {
        Payload::Form(call) => session.http.post(&url).form(&call.form_fields()),
        Payload::Multipart(call, attachment) => {
            let form = multipart_form(&call, attachment)?;
            session.http.post(&url).multipart(form)
        }
    };

    // A URL that cannot be parsed fails here too, before anything is sent.
    let res = request.send().map_err(|e| {
        if e.is_builder() {
            LycheeError::InvalidRequest(e)
        } else {
            LycheeError::Transport(e)
        }
    })?;
    let status = res.status().as_u16();
    let body = res.bytes()?.to_vec();
    debug!("response status={} bytes={}", status, body.len());
    Ok(RawResponse { status, body })
}

fn multipart_form(call: &FunctionCall, attachment: Attachment) -> Result<multipart::Form> {
    let mut form = multipart::Form::new().text("function", call.function().to_string());
    for (name, value) in call.params() {
        form = form.text(name.clone(), value.clone());
    }

    let content_type = attachment
        .content_type
        .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
    let part = multipart::Part::bytes(attachment.data)
        .file_name(attachment.file_name)
        .mime_str(&content_type)
        .map_err(LycheeError::InvalidRequest)?;
    Ok(form.part(ATTACHMENT_PART, part))
}
