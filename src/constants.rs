/// Constants module to avoid magic strings in the codebase

// Remote service
pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_API_KEY_ENV: &str = "API_KEY";

// Sampling parameters
pub const DEFAULT_TEMPERATURE: f32 = 0.8;
pub const DEFAULT_TOP_P: f32 = 0.95;
pub const DEFAULT_TOP_K: u32 = 40;

// Persona
pub const SYSTEM_PROMPT: &str = "You are SafeSpace AI, a calm, empathetic, and non-judgmental listener. \
Your purpose is to provide a safe, anonymous space for users to express their feelings. \
Respond with warmth and gentleness. \
Do not offer unsolicited clinical advice, but acknowledge their emotions deeply. \
If a user expresses thoughts of self-harm or deep crisis, gently provide empathy and suggest they reach out to professional emergency services or a local crisis hotline. \
Keep your responses concise but comforting.";

// Conversation copy
pub const SEED_MESSAGE_ID: &str = "initial";
pub const GREETING: &str =
    "Hello. This is a quiet place for you to be yourself. How are you feeling today?";
pub const EMPTY_REPLY_FALLBACK: &str = "I'm here, and I'm listening. Could you tell me more?";
pub const SEND_FAILURE_MESSAGE: &str =
    "I'm having a little trouble connecting right now. I'm still here for you, though.";

// UI copy
pub const APP_TITLE: &str = "SafeSpace AI";
pub const APP_TAGLINE: &str = "Breathe. Speak. Be heard.";
pub const INPUT_PLACEHOLDER: &str = "Tell me how you're feeling...";
pub const DISCLAIMER: &str = "SafeSpace AI is an experimental AI companion. It is not a licensed therapist, \
counselor, or medical professional. This tool is not intended to provide professional psychological or \
medical advice, diagnosis, or treatment. If you are in crisis, please contact emergency services or a \
crisis hotline immediately.";

// UI timing
pub const UI_TICK_INTERVAL_MS: u64 = 300;
pub const UI_POLL_INTERVAL_MS: u64 = 50;
pub const UI_SCROLL_LINES: u16 = 3;

// Config & logging
pub const APP_NAME: &str = "safespace";
pub const ENV_PREFIX: &str = "SAFESPACE_";
pub const LOCAL_CONFIG_PATH: &str = ".safespace/config.toml";
pub const DEFAULT_LOG_FILE: &str = "safespace.log";
pub const DEFAULT_LOG_LEVEL: &str = "info";
