// Dweve IFCX - Editor tooling for IFCX documents
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


//! `workspace/executeCommand` handlers.
//!
//! | Command | Arguments | Result |
//! |---------|-----------|--------|
//! | `ifcx.identifierReport` | `[uri]` | JSON report of the identifier graph, as a string |
//! | `ifcx.describeIdentifier` | `[uri, identifier]` | Markdown description of the node |

use crate::constants::{COMMAND_DESCRIBE_IDENTIFIER, COMMAND_IDENTIFIER_REPORT};
use crate::document_manager::DocumentManager;
use ifcx_core::{describe_node, generate_report, IfcxError};
use serde_json::Value;
use thiserror::Error;
use tower_lsp::jsonrpc;
use tower_lsp::lsp_types::Url;

/// Commands advertised in the server capabilities.
pub const COMMANDS: [&str; 2] = [COMMAND_IDENTIFIER_REPORT, COMMAND_DESCRIBE_IDENTIFIER];

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("unknown command: {0}")]
    UnknownCommand(String),
    #[error("missing argument {index} ({name})")]
    MissingArgument { index: usize, name: &'static str },
    #[error("argument {index} ({name}) must be a string")]
    InvalidArgument { index: usize, name: &'static str },
    #[error("invalid document URI `{0}`")]
    InvalidUri(String),
    #[error("document is not open: {0}")]
    DocumentNotOpen(Url),
    #[error(transparent)]
    Report(#[from] IfcxError),
}

impl From<CommandError> for jsonrpc::Error {
    fn from(e: CommandError) -> Self {
        match e {
            CommandError::Report(_) => jsonrpc::Error {
                code: jsonrpc::ErrorCode::InternalError,
                message: e.to_string().into(),
                data: None,
            },
            other => jsonrpc::Error::invalid_params(other.to_string()),
        }
    }
}

/// Run `command` against the open documents.
pub fn execute_command(
    manager: &DocumentManager,
    command: &str,
    arguments: &[Value],
) -> Result<Value, CommandError> {
    match command {
        COMMAND_IDENTIFIER_REPORT => {
            let uri = uri_argument(arguments, 0)?;
            let analysis = manager
                .analysis(&uri)
                .ok_or(CommandError::DocumentNotOpen(uri))?;
            Ok(Value::String(generate_report(&analysis.graph)?))
        }
        COMMAND_DESCRIBE_IDENTIFIER => {
            let uri = uri_argument(arguments, 0)?;
            let identifier = string_argument(arguments, 1, "identifier")?;
            let analysis = manager
                .analysis(&uri)
                .ok_or(CommandError::DocumentNotOpen(uri))?;
            Ok(Value::String(describe_node(identifier, &analysis.graph)))
        }
        other => Err(CommandError::UnknownCommand(other.to_string())),
    }
}

fn string_argument<'a>(
    arguments: &'a [Value],
    index: usize,
    name: &'static str,
) -> Result<&'a str, CommandError> {
    arguments
        .get(index)
        .ok_or(CommandError::MissingArgument { index, name })?
        .as_str()
        .ok_or(CommandError::InvalidArgument { index, name })
}

fn uri_argument(arguments: &[Value], index: usize) -> Result<Url, CommandError> {
    let raw = string_argument(arguments, index, "uri")?;
    Url::parse(raw).map_err(|_| CommandError::InvalidUri(raw.to_string()))
}
