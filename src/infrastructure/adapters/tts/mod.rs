//! TTS Adapter - Typecast 合成客户端实现
//!
//! 提交 (submitter) -> 轮询 (poller) -> 落盘 (storage)

mod extract;
mod fake_tts_client;
mod policy;
mod poller;
mod submitter;
mod typecast_client;

#[cfg(test)]
pub(crate) mod test_support;

pub use extract::{
    classify_poll_body, extract_handle, ExtractionChain, JsonPath, AUDIO_DOWNLOAD_URL,
    DONE_STATUS, JOB_STATUS, SPEAK_URL,
};
pub use fake_tts_client::{FakeTtsClient, FakeTtsClientConfig};
pub use policy::{Backoff, PollPolicy};
pub use poller::SynthesisJobPoller;
pub use submitter::SynthesisJobSubmitter;
pub use typecast_client::{TypecastClientConfig, TypecastTtsClient};
