//! Outgoing agent requests and file attachments

use std::path::Path;

use reqwest::multipart::{Form, Part};

use crate::error::{Error, Result};

/// File extensions the agent knows how to process
pub const ACCEPTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "pdf", "mp3", "wav", "m4a"];

/// A file attached to a user turn
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl Attachment {
    /// Build an attachment from in-memory bytes, checking the extension.
    pub fn from_bytes(file_name: impl Into<String>, bytes: Vec<u8>) -> Result<Self> {
        let file_name = file_name.into();
        let extension = Path::new(&file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        if !ACCEPTED_EXTENSIONS.contains(&extension.as_str()) {
            return Err(Error::UnsupportedAttachment(format!(
                "{} (accepted: {})",
                file_name,
                ACCEPTED_EXTENSIONS.join(", ")
            )));
        }

        let mime_type = mime_guess::from_ext(&extension)
            .first_or_octet_stream()
            .essence_str()
            .to_string();

        Ok(Self {
            file_name,
            mime_type,
            bytes,
        })
    }

    /// Read an attachment from disk
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| Error::UnsupportedAttachment(path.display().to_string()))?
            .to_string();
        // Validate the name before touching the disk
        Self::from_bytes(file_name.clone(), vec![])?;
        let bytes = tokio::fs::read(path).await?;
        Self::from_bytes(file_name, bytes)
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A single multipart form field, as it will be sent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField<'a> {
    Text(&'static str, &'a str),
    File(&'static str, &'a Attachment),
}

/// One request to the agent's run endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgentRequest {
    /// User text for this turn
    pub text: Option<String>,
    /// Attached file for this turn
    pub file: Option<Attachment>,
    /// Stable correlation token of the conversation
    pub conversation_id: String,
    /// Answer to the agent's previous clarification question
    pub clarification_answer: Option<String>,
}

impl AgentRequest {
    pub fn new(conversation_id: impl Into<String>) -> Self {
        Self {
            text: None,
            file: None,
            conversation_id: conversation_id.into(),
            clarification_answer: None,
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn with_file(mut self, file: Attachment) -> Self {
        self.file = Some(file);
        self
    }

    /// Mark this turn as the answer to a pending clarification.
    ///
    /// The answer repeats the turn's text; a turn without text carries no answer.
    pub fn as_clarification_answer(mut self) -> Self {
        self.clarification_answer = self.text.clone();
        self
    }

    pub fn is_clarification_answer(&self) -> bool {
        self.clarification_answer.is_some()
    }

    /// Form fields in wire order
    pub fn fields(&self) -> Vec<FormField<'_>> {
        let mut fields = Vec::with_capacity(4);
        if let Some(text) = &self.text {
            fields.push(FormField::Text("text", text));
        }
        if let Some(file) = &self.file {
            fields.push(FormField::File("file", file));
        }
        fields.push(FormField::Text("conversation_id", &self.conversation_id));
        if let Some(answer) = &self.clarification_answer {
            fields.push(FormField::Text("clarification_answer", answer));
        }
        fields
    }

    /// Build the multipart body
    pub fn to_form(&self) -> Result<Form> {
        let mut form = Form::new();
        for field in self.fields() {
            form = match field {
                FormField::Text(name, value) => form.text(name, value.to_string()),
                FormField::File(name, file) => {
                    let part = Part::bytes(file.bytes.clone())
                        .file_name(file.file_name.clone())
                        .mime_str(&file.mime_type)?;
                    form.part(name, part)
                }
            };
        }
        Ok(form)
    }
}
