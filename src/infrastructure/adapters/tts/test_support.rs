//! 测试用 Typecast 模拟服务
//!
//! 在 127.0.0.1 的随机端口上启动 axum 服务，按脚本返回提交/轮询/下载响应并记录调用次数

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

use crate::application::ports::{PollProgress, ProgressReporter};

pub const PENDING: &str = r#"{"status": "pending"}"#;
pub const PENDING_NESTED: &str = r#"{"result": {"status": "progress"}}"#;
pub const DONE_NESTED: &str =
    r#"{"result": {"status": "done", "audio_download_url": "{base}/audio/speech.wav"}}"#;
pub const DONE_TOP_LEVEL: &str =
    r#"{"status": "done", "audio_download_url": "{base}/audio/speech.wav"}"#;
pub const DONE_WITHOUT_URL: &str = r#"{"status": "done", "result": {}}"#;

pub const DUMMY_AUDIO: &[u8] = b"RIFFWAVE";

/// 提交响应的形状
#[derive(Debug, Clone, Copy)]
pub enum SubmitShape {
    /// `result.speak_v2_url`（同时带一个不可用的 `speak_url`）
    V2,
    /// 只有 `result.speak_url`
    V1,
    /// 两个字段都没有
    Missing,
    /// 非 JSON 响应体
    NotJson,
    /// 返回指定状态码
    Status(u16),
}

/// 模拟服务脚本
#[derive(Debug, Clone)]
pub struct MockScript {
    pub submit: SubmitShape,
    /// 第 N 次轮询返回第 N 个响应体，用完后重复最后一个；`{base}` 替换为服务地址
    pub polls: Vec<&'static str>,
    pub poll_status: u16,
    pub audio: Vec<u8>,
    pub download_status: u16,
    /// 下载响应前的等待
    pub download_delay: Duration,
}

impl Default for MockScript {
    fn default() -> Self {
        Self {
            submit: SubmitShape::V2,
            polls: vec![DONE_NESTED],
            poll_status: 200,
            audio: DUMMY_AUDIO.to_vec(),
            download_status: 200,
            download_delay: Duration::ZERO,
        }
    }
}

impl MockScript {
    pub fn with_polls(polls: Vec<&'static str>) -> Self {
        Self {
            polls,
            ..Default::default()
        }
    }
}

struct MockState {
    base: String,
    script: MockScript,
    submits: AtomicUsize,
    polls: AtomicUsize,
    downloads: AtomicUsize,
    submit_bodies: Mutex<Vec<Value>>,
    poll_auth: Mutex<Vec<Option<String>>>,
    download_auth: Mutex<Vec<Option<String>>>,
}

/// 运行中的模拟服务
pub struct MockTypecast {
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockTypecast {
    pub async fn start(script: MockScript) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());

        let state = Arc::new(MockState {
            base: base_url.clone(),
            script,
            submits: AtomicUsize::new(0),
            polls: AtomicUsize::new(0),
            downloads: AtomicUsize::new(0),
            submit_bodies: Mutex::new(Vec::new()),
            poll_auth: Mutex::new(Vec::new()),
            download_auth: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/api/speak", post(speak))
            .route("/api/speak/v2/:job", get(poll))
            .route("/audio/:file", get(download))
            .with_state(state.clone());

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, state }
    }

    pub fn submits(&self) -> usize {
        self.state.submits.load(Ordering::SeqCst)
    }

    pub fn polls(&self) -> usize {
        self.state.polls.load(Ordering::SeqCst)
    }

    pub fn downloads(&self) -> usize {
        self.state.downloads.load(Ordering::SeqCst)
    }

    pub fn submit_bodies(&self) -> Vec<Value> {
        self.state.submit_bodies.lock().unwrap().clone()
    }

    pub fn poll_auth(&self) -> Vec<Option<String>> {
        self.state.poll_auth.lock().unwrap().clone()
    }

    pub fn download_auth(&self) -> Vec<Option<String>> {
        self.state.download_auth.lock().unwrap().clone()
    }
}

fn auth_header(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(String::from)
}

async fn speak(State(state): State<Arc<MockState>>, Json(body): Json<Value>) -> Response {
    let n = state.submits.fetch_add(1, Ordering::SeqCst) + 1;
    state.submit_bodies.lock().unwrap().push(body);

    let url = format!("{}/api/speak/v2/job-{}", state.base, n);
    match state.script.submit {
        SubmitShape::V2 => Json(json!({
            "result": {
                "speak_v2_url": url,
                "speak_url": format!("{}/legacy/job-{}", state.base, n),
            }
        }))
        .into_response(),
        SubmitShape::V1 => Json(json!({ "result": { "speak_url": url } })).into_response(),
        SubmitShape::Missing => Json(json!({ "result": { "id": n } })).into_response(),
        SubmitShape::NotJson => "<html>maintenance</html>".into_response(),
        SubmitShape::Status(code) => {
            (StatusCode::from_u16(code).unwrap(), "rejected").into_response()
        }
    }
}

async fn poll(
    State(state): State<Arc<MockState>>,
    Path(_job): Path<String>,
    headers: HeaderMap,
) -> Response {
    let index = state.polls.fetch_add(1, Ordering::SeqCst);
    state.poll_auth.lock().unwrap().push(auth_header(&headers));

    if state.script.poll_status != 200 {
        return (
            StatusCode::from_u16(state.script.poll_status).unwrap(),
            "poll failed",
        )
            .into_response();
    }

    let body = state
        .script
        .polls
        .get(index)
        .or_else(|| state.script.polls.last())
        .copied()
        .unwrap_or("{}")
        .replace("{base}", &state.base);

    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

async fn download(
    State(state): State<Arc<MockState>>,
    Path(_file): Path<String>,
    headers: HeaderMap,
) -> Response {
    state.downloads.fetch_add(1, Ordering::SeqCst);
    state.download_auth.lock().unwrap().push(auth_header(&headers));
    tokio::time::sleep(state.script.download_delay).await;

    if state.script.download_status != 200 {
        return (
            StatusCode::from_u16(state.script.download_status).unwrap(),
            "gone",
        )
            .into_response();
    }

    (
        [(header::CONTENT_TYPE, "audio/wav")],
        state.script.audio.clone(),
    )
        .into_response()
}

/// 记录所有进度回调
#[derive(Default)]
pub struct RecordingProgress {
    events: Mutex<Vec<PollProgress>>,
}

impl RecordingProgress {
    pub fn fractions(&self) -> Vec<f32> {
        self.events.lock().unwrap().iter().map(|p| p.fraction).collect()
    }

    pub fn last(&self) -> Option<PollProgress> {
        self.events.lock().unwrap().last().copied()
    }
}

impl ProgressReporter for RecordingProgress {
    fn report(&self, progress: PollProgress) {
        self.events.lock().unwrap().push(progress);
    }
}
