//! Response Extraction - 响应字段提取
//!
//! 合成服务的响应结构不稳定，同一个值可能出现在不同的嵌套层级。
//! 每个值对应一组按优先级排列的 JSON 路径，取第一个命中的结果。

use serde_json::Value;

use crate::domain::synthesis::{JobHandle, PollResult};

/// 终止状态
pub const DONE_STATUS: &str = "done";

/// JSON 字段路径
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JsonPath(pub &'static [&'static str]);

impl JsonPath {
    pub fn lookup<'a>(&self, body: &'a Value) -> Option<&'a Value> {
        self.0.iter().try_fold(body, |node, key| node.get(*key))
    }

    /// 非空字符串值
    pub fn lookup_str<'a>(&self, body: &'a Value) -> Option<&'a str> {
        self.lookup(body)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    pub fn dotted(&self) -> String {
        self.0.join(".")
    }
}

/// 有序提取策略
#[derive(Debug, Clone, Copy)]
pub struct ExtractionChain {
    paths: &'static [JsonPath],
}

impl ExtractionChain {
    pub const fn new(paths: &'static [JsonPath]) -> Self {
        Self { paths }
    }

    pub fn paths(&self) -> &'static [JsonPath] {
        self.paths
    }

    /// 返回第一个命中的路径和值
    pub fn first<'a>(&self, body: &'a Value) -> Option<(JsonPath, &'a str)> {
        self.paths
            .iter()
            .find_map(|path| path.lookup_str(body).map(|value| (*path, value)))
    }

    /// 任一路径的值等于 `expected`
    pub fn any_equals(&self, body: &Value, expected: &str) -> bool {
        self.paths
            .iter()
            .any(|path| path.lookup_str(body) == Some(expected))
    }
}

/// 状态轮询 URL: `result.speak_v2_url` 优先于 `result.speak_url`
pub const SPEAK_URL: ExtractionChain = ExtractionChain::new(&[
    JsonPath(&["result", "speak_v2_url"]),
    JsonPath(&["result", "speak_url"]),
]);

/// 任务状态: 顶层 `status` 或 `result.status`
pub const JOB_STATUS: ExtractionChain =
    ExtractionChain::new(&[JsonPath(&["status"]), JsonPath(&["result", "status"])]);

/// 音频下载地址: `result.audio_download_url` 优先于顶层 `audio_download_url`
pub const AUDIO_DOWNLOAD_URL: ExtractionChain = ExtractionChain::new(&[
    JsonPath(&["result", "audio_download_url"]),
    JsonPath(&["audio_download_url"]),
]);

/// 从提交响应中提取任务句柄
pub fn extract_handle(body: &Value) -> Option<JobHandle> {
    SPEAK_URL.first(body).map(|(path, url)| {
        tracing::debug!(path = %path.dotted(), "Speak URL resolved");
        JobHandle::new(url)
    })
}

/// 判断轮询响应
///
/// 任一状态字段为 "done" 即终止；其余情况（字段缺失、其他值）都视为未完成。
/// 无法解析的响应体返回 Malformed，调用方按未完成处理。
pub fn classify_poll_body(body: &[u8]) -> PollResult {
    let value: Value = match serde_json::from_slice(body) {
        Ok(v) => v,
        Err(_) => return PollResult::Malformed,
    };

    if JOB_STATUS.any_equals(&value, DONE_STATUS) {
        PollResult::Done {
            audio_url: AUDIO_DOWNLOAD_URL
                .first(&value)
                .map(|(_, url)| url.to_string()),
        }
    } else {
        PollResult::Pending
    }
}
