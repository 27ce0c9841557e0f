// In-process HTTP server standing in for a Lychee instance. It runs an axum
// router on its own tokio runtime thread and records every request, so
// tests can check the function called, its fields and the cookies sent
// along.

#![allow(dead_code)]

use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use axum::extract::{FromRequest, Multipart, Request, State};
use axum::http::header::{CONTENT_TYPE, SET_COOKIE};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;

/// One multipart part as the server received it.
#[derive(Debug, Clone)]
pub struct Part {
    pub name: String,
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct Recorded {
    pub headers: Vec<(String, String)>,
    /// Raw body of form requests; empty for multipart ones.
    pub body: Vec<u8>,
    pub parts: Vec<Part>,
}

impl Recorded {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn is_multipart(&self) -> bool {
        self.header(CONTENT_TYPE.as_str())
            .map_or(false, |ct| ct.starts_with("multipart/form-data"))
    }

    /// Decoded `application/x-www-form-urlencoded` fields in body order.
    pub fn form(&self) -> Vec<(String, String)> {
        url::form_urlencoded::parse(&self.body)
            .into_owned()
            .collect()
    }

    /// Value of a text field, for either encoding.
    pub fn field(&self, name: &str) -> Option<String> {
        if self.is_multipart() {
            self.multipart_part(name)
                .map(|part| String::from_utf8_lossy(&part.data).into_owned())
        } else {
            self.form().into_iter().find(|(k, _)| k == name).map(|(_, v)| v)
        }
    }

    pub fn function(&self) -> Option<String> {
        self.field("function")
    }

    pub fn multipart_part(&self, name: &str) -> Option<&Part> {
        self.parts.iter().find(|part| part.name == name)
    }
}

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub body: String,
    pub set_cookie: Option<String>,
}

impl Reply {
    pub fn ok(body: &str) -> Self {
        Reply::status(200, body)
    }

    pub fn status(status: u16, body: &str) -> Self {
        Reply {
            status,
            body: body.to_string(),
            set_cookie: None,
        }
    }

    pub fn with_cookie(mut self, cookie: &str) -> Self {
        self.set_cookie = Some(cookie.to_string());
        self
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let mut res = (status, self.body).into_response();
        if let Some(cookie) = self.set_cookie.as_deref() {
            if let Ok(value) = HeaderValue::from_str(cookie) {
                res.headers_mut().insert(SET_COOKIE, value);
            }
        }
        res
    }
}

type Handler = Arc<dyn Fn(&Recorded) -> Reply + Send + Sync>;

#[derive(Clone)]
struct MockState {
    handler: Handler,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

pub struct MockServer {
    port: u16,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockServer {
    pub fn start<F>(handler: F) -> Self
    where
        F: Fn(&Recorded) -> Reply + Send + Sync + 'static,
    {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            handler: Arc::new(handler),
            requests: requests.clone(),
        };
        let app = Router::new()
            .route("/php/index.php", post(handle))
            .with_state(state);

        let (port_tx, port_rx) = mpsc::channel();
        thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .unwrap();
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
                port_tx.send(listener.local_addr().unwrap().port()).unwrap();
                axum::serve(listener, app).await.unwrap();
            });
        });

        MockServer {
            port: port_rx.recv().unwrap(),
            requests,
        }
    }

    /// Server address with a trailing slash, as users tend to type it.
    pub fn address(&self) -> String {
        format!("http://127.0.0.1:{}/", self.port)
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

async fn handle(State(state): State<MockState>, req: Request) -> Response {
    let recorded = match record(req).await {
        Ok(recorded) => recorded,
        Err(e) => return (StatusCode::BAD_REQUEST, e).into_response(),
    };
    let reply = (state.handler)(&recorded);
    state.requests.lock().unwrap().push(recorded);
    reply.into_response()
}

async fn record(req: Request) -> Result<Recorded, String> {
    let headers: Vec<(String, String)> = req
        .headers()
        .iter()
        .map(|(k, v)| {
            (
                k.as_str().to_string(),
                v.to_str().unwrap_or_default().to_string(),
            )
        })
        .collect();
    let is_multipart = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map_or(false, |ct| ct.starts_with("multipart/form-data"));

    if !is_multipart {
        let body = axum::body::to_bytes(req.into_body(), usize::MAX)
            .await
            .map_err(|e| e.to_string())?;
        return Ok(Recorded {
            headers,
            body: body.to_vec(),
            parts: Vec::new(),
        });
    }

    let mut multipart = Multipart::from_request(req, &())
        .await
        .map_err(|e| e.body_text())?;
    let mut parts = Vec::new();
    while let Some(field) = multipart.next_field().await.map_err(|e| e.to_string())? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field.bytes().await.map_err(|e| e.to_string())?.to_vec();
        parts.push(Part {
            name,
            file_name,
            content_type,
            data,
        });
    }
    Ok(Recorded {
        headers,
        body: Vec::new(),
        parts,
    })
}
