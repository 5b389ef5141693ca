//! FIPA ACL message carrier.
//!
//! Only the parameters the content subsystem reads or writes are modelled
//! in depth (`language`, `ontology`, and the content slot); the remaining
//! FIPA parameters are carried so that messages built here are usable by the
//! kernel unchanged.

use serde::{Deserialize, Serialize};

use crate::aid::Aid;

/// FIPA communicative act of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Performative {
    /// Accept a previously submitted proposal.
    AcceptProposal,
    /// Agree to perform a requested action.
    Agree,
    /// Cancel a previously requested action.
    Cancel,
    /// Call for proposals.
    Cfp,
    /// Confirm the truth of a proposition.
    Confirm,
    /// Disconfirm the truth of a proposition.
    Disconfirm,
    /// Report that an action failed.
    Failure,
    /// Inform that a proposition is true.
    Inform,
    /// Inform whether a proposition is true.
    InformIf,
    /// Inform the object matching a descriptor.
    InformRef,
    /// Report that a message was not understood.
    NotUnderstood,
    /// Propagate the embedded message.
    Propagate,
    /// Submit a proposal.
    Propose,
    /// Ask another agent to forward the embedded message.
    Proxy,
    /// Ask whether a proposition is true.
    QueryIf,
    /// Ask for the object matching a descriptor.
    QueryRef,
    /// Refuse to perform an action.
    Refuse,
    /// Reject a submitted proposal.
    RejectProposal,
    /// Request that an action be performed.
    Request,
    /// Request an action when a proposition becomes true.
    RequestWhen,
    /// Request an action whenever a proposition becomes true.
    RequestWhenever,
    /// Subscribe to changes of a referenced object.
    Subscribe,
}

impl Performative {
    /// FIPA name of the performative (e.g. `"QUERY-REF"`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AcceptProposal => "ACCEPT-PROPOSAL",
            Self::Agree => "AGREE",
            Self::Cancel => "CANCEL",
            Self::Cfp => "CFP",
            Self::Confirm => "CONFIRM",
            Self::Disconfirm => "DISCONFIRM",
            Self::Failure => "FAILURE",
            Self::Inform => "INFORM",
            Self::InformIf => "INFORM-IF",
            Self::InformRef => "INFORM-REF",
            Self::NotUnderstood => "NOT-UNDERSTOOD",
            Self::Propagate => "PROPAGATE",
            Self::Propose => "PROPOSE",
            Self::Proxy => "PROXY",
            Self::QueryIf => "QUERY-IF",
            Self::QueryRef => "QUERY-REF",
            Self::Refuse => "REFUSE",
            Self::RejectProposal => "REJECT-PROPOSAL",
            Self::Request => "REQUEST",
            Self::RequestWhen => "REQUEST-WHEN",
            Self::RequestWhenever => "REQUEST-WHENEVER",
            Self::Subscribe => "SUBSCRIBE",
        }
    }
}

impl core::fmt::Display for Performative {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The content slot of a message.
///
/// A message carries either string content or byte-sequence content, never
/// both; which one is used depends on the codec that filled it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageContent {
    /// String content, written by string-based codecs.
    Text(String),
    /// Byte-sequence content, written by byte-based codecs.
    Bytes(Vec<u8>),
}

/// A FIPA ACL message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclMessage {
    performative: Performative,
    sender: Option<Aid>,
    receivers: Vec<Aid>,
    reply_to: Vec<Aid>,
    language: Option<String>,
    ontology: Option<String>,
    encoding: Option<String>,
    protocol: Option<String>,
    conversation_id: Option<String>,
    content: Option<MessageContent>,
}

impl AclMessage {
    /// Create an empty message with the given communicative act.
    pub const fn new(performative: Performative) -> Self {
        Self {
            performative,
            sender: None,
            receivers: Vec::new(),
            reply_to: Vec::new(),
            language: None,
            ontology: None,
            encoding: None,
            protocol: None,
            conversation_id: None,
            content: None,
        }
    }

    /// The communicative act.
    pub const fn performative(&self) -> Performative {
        self.performative
    }

    /// Change the communicative act.
    pub const fn set_performative(&mut self, performative: Performative) {
        self.performative = performative;
    }

    /// The sending agent, if set.
    pub const fn sender(&self) -> Option<&Aid> {
        self.sender.as_ref()
    }

    /// Set the sending agent.
    pub fn set_sender(&mut self, sender: Aid) {
        self.sender = Some(sender);
    }

    /// The receivers in insertion order.
    pub fn receivers(&self) -> &[Aid] {
        &self.receivers
    }

    /// Append a receiver.
    pub fn add_receiver(&mut self, receiver: Aid) {
        self.receivers.push(receiver);
    }

    /// Agents that replies should be sent to instead of the sender.
    pub fn reply_to(&self) -> &[Aid] {
        &self.reply_to
    }

    /// Append a reply-to agent.
    pub fn add_reply_to(&mut self, agent: Aid) {
        self.reply_to.push(agent);
    }

    /// The content language name, if set.
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Set the content language name.
    pub fn set_language(&mut self, language: impl Into<String>) {
        self.language = Some(language.into());
    }

    /// The content ontology name, if set.
    pub fn ontology(&self) -> Option<&str> {
        self.ontology.as_deref()
    }

    /// Set the content ontology name.
    pub fn set_ontology(&mut self, ontology: impl Into<String>) {
        self.ontology = Some(ontology.into());
    }

    /// Clear the content ontology name.
    pub fn clear_ontology(&mut self) {
        self.ontology = None;
    }

    /// The content encoding, if set.
    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    /// Set the content encoding.
    pub fn set_encoding(&mut self, encoding: impl Into<String>) {
        self.encoding = Some(encoding.into());
    }

    /// The interaction protocol, if set.
    pub fn protocol(&self) -> Option<&str> {
        self.protocol.as_deref()
    }

    /// Set the interaction protocol.
    pub fn set_protocol(&mut self, protocol: impl Into<String>) {
        self.protocol = Some(protocol.into());
    }

    /// The conversation identifier, if set.
    pub fn conversation_id(&self) -> Option<&str> {
        self.conversation_id.as_deref()
    }

    /// Set the conversation identifier.
    pub fn set_conversation_id(&mut self, id: impl Into<String>) {
        self.conversation_id = Some(id.into());
    }

    /// The raw content slot.
    pub const fn content(&self) -> Option<&MessageContent> {
        self.content.as_ref()
    }

    /// String content, if the message carries string content.
    pub fn text_content(&self) -> Option<&str> {
        match &self.content {
            Some(MessageContent::Text(text)) => Some(text),
            _ => None,
        }
    }

    /// Byte-sequence content, if the message carries byte content.
    pub fn byte_sequence_content(&self) -> Option<&[u8]> {
        match &self.content {
            Some(MessageContent::Bytes(bytes)) => Some(bytes),
            _ => None,
        }
    }

    /// Replace the content with string content.
    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = Some(MessageContent::Text(content.into()));
    }

    /// Replace the content with byte-sequence content.
    pub fn set_byte_sequence_content(&mut self, content: Vec<u8>) {
        self.content = Some(MessageContent::Bytes(content));
    }

    /// Remove any content.
    pub fn clear_content(&mut self) {
        self.content = None;
    }

    /// Build a reply skeleton: same language, ontology, protocol and
    /// conversation, addressed to the reply-to agents or the sender.
    #[must_use]
    pub fn create_reply(&self, performative: Performative) -> Self {
        let mut reply = Self::new(performative);
        reply.language.clone_from(&self.language);
        reply.ontology.clone_from(&self.ontology);
        reply.protocol.clone_from(&self.protocol);
        reply.conversation_id.clone_from(&self.conversation_id);
        if self.reply_to.is_empty() {
            reply.receivers.extend(self.sender.iter().cloned());
        } else {
            reply.receivers.clone_from(&self.reply_to);
        }
        reply
    }
}
