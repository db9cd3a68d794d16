// Resume tailoring: response cleaning, prompt templates, and the five-call
// LLM pipeline behind POST /api/improve.
// All LLM calls go through llm_client; no direct HTTP calls here.

pub mod cleaner;
pub mod handlers;
pub mod orchestrator;
pub mod prompts;
