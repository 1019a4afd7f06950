use cogni_model::{
    Decision, Entry, ErrorKind, OpaqueMessage, ToolCallRequest,
    ToolDescriptor,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, OpenAIConfig};

// ------------------------------
// Types received from the server
// ------------------------------

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    pub arguments: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub r#type: String,
    pub function: FunctionCall,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ChatCompletion {
    pub id: String,
    pub choices: Vec<Choice>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Choice {
    pub message: Message,
    pub finish_reason: Option<String>,
}

// ------------------------
// Types sent to the server
// ------------------------

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
struct FunctionTool {
    name: String,
    description: String,
    parameters: Value,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
struct Tool {
    r#type: &'static str,
    function: FunctionTool,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Message {
    System {
        content: String,
    },
    User {
        content: String,
    },
    Assistant {
        content: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        tool_calls: Option<Vec<ToolCall>>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        reasoning_content: Option<String>,
    },
    Tool {
        tool_call_id: String,
        content: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ChatCompletionRequest {
    model: String,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
}

// -----------
// Conversions
// -----------

#[inline]
pub fn create_request(
    entries: &[Entry],
    tools: &[ToolDescriptor],
    config: &OpenAIConfig,
) -> ChatCompletionRequest {
    ChatCompletionRequest {
        model: config.model.clone(),
        messages: entries.iter().map(create_message).collect(),
        tools: tools.iter().map(create_tool).collect(),
        tool_choice: (!tools.is_empty()).then_some("auto"),
    }
}

fn create_message(entry: &Entry) -> Message {
    match entry {
        Entry::System { content } => Message::System {
            content: content.clone(),
        },
        Entry::User { content } => Message::User {
            content: content.clone(),
        },
        Entry::Assistant(assistant) => {
            // Assistant entries from this provider carry the original
            // message, which keeps fields we don't model.
            if let Some(msg @ Message::Assistant { .. }) = assistant
                .raw
                .as_ref()
                .and_then(OpaqueMessage::to_raw::<Message>)
            {
                return msg;
            }
            let tool_calls: Vec<_> = assistant
                .tool_calls
                .iter()
                .map(|call| ToolCall {
                    id: call.id.clone(),
                    r#type: "function".to_owned(),
                    function: FunctionCall {
                        name: call.name.clone(),
                        arguments: call.arguments.clone(),
                    },
                })
                .collect();
            Message::Assistant {
                content: assistant.content.clone(),
                tool_calls: (!tool_calls.is_empty()).then_some(tool_calls),
                reasoning_content: None,
            }
        }
        Entry::Tool(result) => Message::Tool {
            tool_call_id: result.tool_call_id.clone(),
            content: result.content.clone(),
        },
    }
}

#[inline]
fn create_tool(tool: &ToolDescriptor) -> Tool {
    Tool {
        r#type: "function",
        function: FunctionTool {
            name: tool.name.clone(),
            description: tool.description.clone(),
            parameters: tool.parameters.clone(),
        },
    }
}

pub fn create_decision(completion: ChatCompletion) -> Result<Decision, Error> {
    let Some(choice) = completion.choices.into_iter().next() else {
        return Err(Error::new("no choices in response", ErrorKind::Other));
    };
    if choice.finish_reason.as_deref() == Some("content_filter") {
        return Err(Error::new("content was filtered", ErrorKind::Moderated));
    }

    let raw = OpaqueMessage::from_raw(&choice.message)
        .map_err(|err| Error::new(format!("{err}"), ErrorKind::Other))?;
    let Message::Assistant {
        content,
        tool_calls,
        ..
    } = choice.message
    else {
        return Err(Error::new(
            "response message is not from the assistant",
            ErrorKind::Other,
        ));
    };

    let tool_calls = tool_calls
        .unwrap_or_default()
        .into_iter()
        .map(|call| ToolCallRequest {
            id: call.id,
            name: call.function.name,
            arguments: call.function.arguments,
        })
        .collect();
    Ok(Decision {
        content,
        tool_calls,
        raw: Some(raw),
    })
}
