//! Default value functions used by serde for config deserialization.

pub fn default_name() -> String {
    "Tempo".to_string()
}

pub fn default_log_level() -> String {
    "info".to_string()
}

pub fn default_true() -> bool {
    true
}

pub fn default_provider() -> String {
    "openai".to_string()
}

pub fn default_openai_base_url() -> String {
    "https://api.sambanova.ai/v1".to_string()
}

pub fn default_openai_model() -> String {
    "Meta-Llama-3.1-70B-Instruct".to_string()
}

pub fn default_trigger_word() -> String {
    "Рома".to_string()
}
