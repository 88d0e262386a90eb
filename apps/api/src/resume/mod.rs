// Resume parsing: prompt, record schema, pipeline and HTTP handler.

pub mod handlers;
pub mod parse;
pub mod prompts;
pub mod schema;
