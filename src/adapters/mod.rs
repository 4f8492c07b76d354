pub mod answer_synthesizer;
pub mod form_client;
pub mod schema_navigator;
pub mod submission_encoder;
pub mod validation_interpreter;

#[cfg(test)]
mod validation_interpreter_test;
