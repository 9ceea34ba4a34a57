mod gemini_script_engine;

pub use gemini_script_engine::GeminiScriptEngine;
