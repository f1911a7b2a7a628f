use snafu::Snafu;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub), module(forge_error))]
pub enum ForgeError {
    #[snafu(display("template error: {source}"))]
    Template {
        source: TemplateError,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("generation error: {source}"))]
    Generation {
        source: GenerationError,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("store error: {source}"))]
    Store {
        source: StoreError,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("config error: {message}"))]
    Config {
        message: String,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("IO error: {source}"))]
    Io {
        source: std::io::Error,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("JSON error: {source}"))]
    Json {
        source: serde_json::Error,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("validation error: {message}"))]
    Validation {
        message: String,
        #[snafu(implicit)]
        location: snafu::Location,
    },
}

/// Prompt template failures. Templates are pre-seeded documents in the
/// `prompt` collection; a missing or malformed template is fatal to the
/// invocation that needed it.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub), module(template_error))]
pub enum TemplateError {
    #[snafu(display("prompt template not found: {template_id}"))]
    NotFound {
        template_id: String,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("prompt template {template_id} has no `system` key"))]
    MissingSystem {
        template_id: String,
        #[snafu(implicit)]
        location: snafu::Location,
    },
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub), module(generation_error))]
pub enum GenerationError {
    #[snafu(display("no credentials found for any provider"))]
    NoCredentials {
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("authentication failed: {message}"))]
    AuthFailed {
        message: String,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("API error: {message}"))]
    Api {
        message: String,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("failed to parse generated output: {message}"))]
    ParseResponse {
        message: String,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("HTTP error: {source}"))]
    Http {
        source: Box<ureq::Transport>,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("retries exhausted after {attempts} attempts"))]
    RetriesExhausted {
        attempts: u32,
        #[snafu(implicit)]
        location: snafu::Location,
    },
}

#[derive(Debug, Snafu)]
#[snafu(visibility(pub), module(store_error))]
pub enum StoreError {
    #[snafu(display("store API error (status {status}): {message}"))]
    Api {
        status: u16,
        message: String,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("HTTP error: {source}"))]
    Http {
        source: Box<ureq::Transport>,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("malformed document in '{collection}': {message}"))]
    Decode {
        collection: String,
        message: String,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("document not found in '{collection}': {key}"))]
    NotFound {
        collection: String,
        key: String,
        #[snafu(implicit)]
        location: snafu::Location,
    },

    #[snafu(display("revision conflict persisted after {attempts} attempts"))]
    RevisionConflict {
        attempts: u32,
        #[snafu(implicit)]
        location: snafu::Location,
    },
}

pub type Result<T, E = ForgeError> = std::result::Result<T, E>;
