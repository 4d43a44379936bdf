//! Turn Commands - 对话轮次命令

/// 文本输入
#[derive(Debug, Clone)]
pub struct TextTurnCommand {
    pub conversation_id: String,
    pub text: String,
}

/// 语音输入（WAV）
#[derive(Debug, Clone)]
pub struct VoiceTurnCommand {
    pub conversation_id: String,
    pub audio: Vec<u8>,
}

/// 取消当前轮次的合成
#[derive(Debug, Clone)]
pub struct CancelTurnCommand {
    pub conversation_id: String,
}
