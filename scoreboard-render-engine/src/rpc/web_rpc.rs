use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::data::schema::{SubmissionRecord, Validate};
use crate::engine::core::lifecycle::EngineLifecycle;
use crate::interaction::host_commands::{CommandSource, HostCommand, HostCommandEvent};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Outgoing traffic to the host page, flushed once per frame.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host page without expecting response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }

    pub fn pending_notifications(&self) -> &[RpcNotification] {
        &self.outgoing_notifications
    }
}

/// Plugin bridging the engine and its host page.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn push_to_queue(queue: &MessageQueue, message: String) {
    if let Ok(mut pending) = queue.0.lock() {
        pending.push(message);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    let message_queue = MessageQueue(Arc::new(Mutex::new(Vec::new())));

    let Some(window) = window() else {
        warn!("No window available, host bridge disabled");
        return;
    };

    let queue = message_queue.clone();
    let on_message = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();
            if message_str.contains("jsonrpc") {
                push_to_queue(&queue, message_str);
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);
    if let Err(e) =
        window.add_event_listener_with_callback("message", on_message.as_ref().unchecked_ref())
    {
        error!("Failed to register message listener: {:?}", e);
    }
    on_message.forget();

    // Page-level events become notifications on the same queue.
    for (dom_event, method) in [
        ("reset-camera", "reset_camera"),
        ("toggle-auto-rotate", "toggle_auto_rotate"),
        ("beforeunload", "dispose"),
    ] {
        let queue = message_queue.clone();
        let listener = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            push_to_queue(&queue, dom_event_message(method));
        }) as Box<dyn FnMut(web_sys::Event)>);
        if let Err(e) =
            window.add_event_listener_with_callback(dom_event, listener.as_ref().unchecked_ref())
        {
            error!("Failed to register {} listener: {:?}", dom_event, e);
        }
        listener.forget();
    }

    // Leaving fullscreen through the browser (Esc) never reaches the key
    // handlers, so mirror it as an exit request.
    if let Some(document) = window.document() {
        let queue = message_queue.clone();
        let doc = document.clone();
        let listener = Closure::wrap(Box::new(move |_event: web_sys::Event| {
            if doc.fullscreen_element().is_none() {
                push_to_queue(&queue, dom_event_message("exit_fullscreen"));
            }
        }) as Box<dyn FnMut(web_sys::Event)>);
        if let Err(e) = document
            .add_event_listener_with_callback("fullscreenchange", listener.as_ref().unchecked_ref())
        {
            error!("Failed to register fullscreenchange listener: {:?}", e);
        }
        listener.forget();
    }

    commands.insert_resource(message_queue);
}

/// Notification text standing in for a page-level DOM event.
pub fn dom_event_message(method: &str) -> String {
    serde_json::json!({ "jsonrpc": "2.0", "method": method, "params": { "source": "dom" } })
        .to_string()
}

/// Messages received from the page, waiting for the next frame.
#[derive(Resource, Clone, Default)]
pub struct MessageQueue(pub std::sync::Arc<std::sync::Mutex<Vec<String>>>);

#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    diagnostics: Option<Res<DiagnosticsStore>>,
    lifecycle: Option<Res<EngineLifecycle>>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut host_commands: EventWriter<HostCommandEvent>,
) {
    let disposed = lifecycle.is_some_and(|l| *l == EngineLifecycle::Disposed);
    for event in events.read() {
        match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => {
                debug!("Processing RPC method: {}", request.method);
                if let Some(response) = handle_rpc_request(
                    &request,
                    disposed,
                    diagnostics.as_deref(),
                    &mut host_commands,
                ) {
                    rpc_interface.queue_response(response);
                }
            }
            Err(parse_error) => {
                warn!("Dropping malformed RPC message: {}", parse_error);
            }
        }
    }
}

/// What a request asks the engine to do.
#[derive(Debug, Clone, PartialEq)]
enum RpcAction {
    Command(HostCommand),
    ReportFps,
}

/// Map a method and its params onto an action.
fn route_request(request: &RpcRequest) -> Result<RpcAction, RpcError> {
    let command = match request.method.as_str() {
        "reset_camera" => HostCommand::ResetCamera,
        "toggle_auto_rotate" => HostCommand::ToggleAutoRotate,
        "toggle_panels" => HostCommand::TogglePanels,
        "toggle_fullscreen" => HostCommand::ToggleFullscreen,
        "exit_fullscreen" => HostCommand::ExitFullscreen,
        "test_solve_effect" => HostCommand::TestSolve(parse_submission(&request.params, false)?),
        "check_submission" => match parse_submission(&request.params, true)? {
            Some(submission) => HostCommand::CheckSubmission(submission),
            None => return Err(RpcError::invalid_params("Expected 'submission' parameter")),
        },
        "dispose" => HostCommand::Dispose,
        "get_fps" => return Ok(RpcAction::ReportFps),
        other => return Err(RpcError::method_not_found(other)),
    };
    Ok(RpcAction::Command(command))
}

fn parse_submission(
    params: &serde_json::Value,
    required: bool,
) -> Result<Option<crate::data::schema::Submission>, RpcError> {
    #[derive(Deserialize, Default)]
    struct SubmissionParams {
        submission: Option<SubmissionRecord>,
    }

    let parsed = if params.is_null() {
        SubmissionParams::default()
    } else {
        serde_json::from_value::<SubmissionParams>(params.clone())
            .map_err(|e| RpcError::invalid_params(&format!("Malformed submission: {e}")))?
    };

    match parsed.submission {
        Some(record) => record
            .validate()
            .map(Some)
            .map_err(|e| RpcError::invalid_params(&e.to_string())),
        None if required => Err(RpcError::invalid_params("Expected 'submission' parameter")),
        None => Ok(None),
    }
}

/// Act on a request or notification; only requests with an id get a reply.
fn handle_rpc_request(
    request: &RpcRequest,
    disposed: bool,
    diagnostics: Option<&DiagnosticsStore>,
    host_commands: &mut EventWriter<HostCommandEvent>,
) -> Option<RpcResponse> {
    let routed = if disposed {
        Err(RpcError::internal_error("Engine has been disposed"))
    } else {
        route_request(request)
    };
    let result = routed.map(|action| match action {
        RpcAction::Command(command) => {
            let source = if request.params.get("source").and_then(|s| s.as_str()) == Some("dom") {
                CommandSource::DomEvent
            } else {
                CommandSource::Rpc
            };
            host_commands.write(HostCommandEvent { command, source });
            serde_json::json!({ "success": true })
        }
        RpcAction::ReportFps => serde_json::json!({ "fps": current_fps(diagnostics) }),
    });

    if let Err(error) = &result {
        warn!("RPC {} failed: {}", request.method, error.message);
    }

    let id = request.id.clone()?;
    Some(match result {
        Ok(result_value) => RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        },
        Err(error) => create_error_response(id, error),
    })
}

pub fn current_fps(diagnostics: Option<&DiagnosticsStore>) -> f32 {
    diagnostics
        .and_then(|d| d.get(&FrameTimeDiagnosticsPlugin::FPS))
        .and_then(|fps_diagnostic| fps_diagnostic.smoothed())
        .unwrap_or(0.0) as f32
}

fn create_error_response(id: serde_json::Value, error: RpcError) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(error),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the host page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                let Some(window) = window() else {
                    return;
                };
                // Embedded pages talk to their parent, standalone ones to themselves.
                let target = window.parent().ok().flatten().unwrap_or(window);
                if let Err(e) = target.post_message(&JsValue::from_str(&json), "*") {
                    error!("Failed to post message: {:?}", e);
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: "Method not found".to_string(),
            data: Some(serde_json::json!({ "method": method })),
        }
    }

    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}
