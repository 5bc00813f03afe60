use lsp_types::*;

/// Builders for LSP requests and notifications used in server tests
pub struct LspTestClient {}

impl LspTestClient {
    pub fn new() -> Self {
        Self {}
    }

    /// Create an initialize request with basic capabilities and optional settings
    pub fn create_initialize_request(initialization_options: Option<serde_json::Value>) -> InitializeParams {
        InitializeParams {
            process_id: Some(1234),
            root_uri: Some(Url::parse("file:///test/mod").unwrap()),
            initialization_options,
            capabilities: ClientCapabilities {
                workspace: Some(WorkspaceClientCapabilities {
                    apply_edit: Some(true),
                    did_change_configuration: Some(DynamicRegistrationClientCapabilities {
                        dynamic_registration: Some(true),
                    }),
                    configuration: Some(true),
                    ..Default::default()
                }),
                text_document: Some(TextDocumentClientCapabilities {
                    synchronization: Some(TextDocumentSyncClientCapabilities {
                        dynamic_registration: Some(true),
                        will_save: Some(false),
                        will_save_wait_until: Some(false),
                        did_save: Some(true),
                    }),
                    code_action: Some(CodeActionClientCapabilities {
                        dynamic_registration: Some(true),
                        is_preferred_support: Some(true),
                        ..Default::default()
                    }),
                    publish_diagnostics: Some(PublishDiagnosticsClientCapabilities {
                        related_information: Some(true),
                        data_support: Some(true),
                        code_description_support: Some(true),
                        ..Default::default()
                    }),
                    ..Default::default()
                }),
                ..Default::default()
            },
            client_info: Some(ClientInfo {
                name: "test-client".to_string(),
                version: Some("1.0.0".to_string()),
            }),
            ..Default::default()
        }
    }

    /// Create a test document open notification
    pub fn create_did_open_notification(
        uri: &str,
        language_id: &str,
        content: &str,
    ) -> DidOpenTextDocumentParams {
        DidOpenTextDocumentParams {
            text_document: TextDocumentItem {
                uri: Url::parse(uri).unwrap(),
                language_id: language_id.to_string(),
                version: 1,
                text: content.to_string(),
            },
        }
    }

    /// Create a test document change notification replacing the full text
    pub fn create_did_change_notification(uri: &str, version: i32, text: &str) -> DidChangeTextDocumentParams {
        DidChangeTextDocumentParams {
            text_document: VersionedTextDocumentIdentifier {
                uri: Url::parse(uri).unwrap(),
                version,
            },
            content_changes: vec![TextDocumentContentChangeEvent {
                range: None,
                range_length: None,
                text: text.to_string(),
            }],
        }
    }

    pub fn create_did_close_notification(uri: &str) -> DidCloseTextDocumentParams {
        DidCloseTextDocumentParams {
            text_document: TextDocumentIdentifier {
                uri: Url::parse(uri).unwrap(),
            },
        }
    }

    /// Create a code action request carrying the given diagnostics
    pub fn create_code_action_request(uri: &str, diagnostics: Vec<Diagnostic>) -> CodeActionParams {
        let range = diagnostics
            .first()
            .map(|d| d.range)
            .unwrap_or_default();

        CodeActionParams {
            text_document: TextDocumentIdentifier {
                uri: Url::parse(uri).unwrap(),
            },
            range,
            context: CodeActionContext {
                diagnostics,
                only: None,
                trigger_kind: Some(CodeActionTriggerKind::INVOKED),
            },
            work_done_progress_params: WorkDoneProgressParams::default(),
            partial_result_params: PartialResultParams::default(),
        }
    }
}

impl Default for LspTestClient {
    fn default() -> Self {
        Self::new()
    }
}

/// A mod script calling API functions without including them
pub fn create_test_lua_source() -> &'static str {
    r#"#version 2
#include "script/common.lua"

-- tank spawner
function init()
    tank = FindBody("tank")
    Ignite(GetBodyTransform(tank).pos)
end

function tick(dt)
    if InputPressed("interact") then
        Ignite(GetPlayerTransform().pos)
    end
end
"#
}
