use serde_json::{json, Value};

/// Daemon listing with two pulled models.
pub const TWO_MODEL_LISTING: &str = "NAME\tID\tSIZE\tMODIFIED\n\
                                     llama3:8b\ta6990ed6be41\t4.7 GB\t2 days ago\n\
                                     mistral:latest\t61e88e884507\t4.1 GB\t3 weeks ago\n";

/// Daemon listing before any model has been pulled.
pub const EMPTY_LISTING: &str = "NAME\tID\tSIZE\tMODIFIED\n";

/// A well-formed generate response body.
pub fn generate_response_body() -> Value {
    json!({
        "model": "llama3:8b",
        "created_at": "2024-05-04T12:00:00Z",
        "response": "The sky appears blue because of Rayleigh scattering.",
        "done": true,
    })
}
