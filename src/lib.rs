// Library root
// -----------
// Uploads an email or arbitrary files into a SeedDMS installation through
// its REST api. The two binaries in `src/bin` share everything here.
//
// Module responsibilities:
// - `config`: the TOML config file, section selection and validation.
// - `api`: HTTP calls to the REST service and their typed replies.
// - `folder`: choosing and confirming the target folder.
// - `payload`: turning an email or a file into document content + metadata.
// - `ui`: interactive prompts, passed explicitly to whatever needs them.
// - `workflow`: the run itself, from config to upload.
// - `cli`: flags and logging setup common to both binaries.
pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod folder;
pub mod payload;
pub mod ui;
pub mod workflow;

pub use error::{Result, UploadError};
