//! Translation from task drafts to Notion page payloads.
//!
//! The planning and tasks databases are keyed by display-name strings. Every
//! such name lives in this module; the rest of the crate works with
//! [`PropertySet`] and [`Block`] values.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::chunk;
use crate::workflow::TaskDraft;

/// Planning database: title column.
const PLANNING_TITLE: &str = "Tarea";
/// Planning database: requested-at date column.
const PLANNING_REQUESTED_AT: &str = "Fecha_Solicitud";
/// Planning database: intake channel select.
const PLANNING_CHANNEL: &str = "Via";
/// Planning database: intake channel value for email.
const CHANNEL_EMAIL: &str = "Correo";
/// Planning database: next steps rich text.
const PLANNING_NEXT_STEPS: &str = "Próximos Pasos";
/// Planning database: expected result rich text.
const PLANNING_EXPECTED_RESULT: &str = "Resultado Esperado";
/// Planning database: message URL column.
const PLANNING_MESSAGE_URL: &str = "MsgUrl";

/// Tasks database: title column.
const TASK_TITLE: &str = "Title";
/// Tasks database: relation back to the planning record.
const TASK_PLANNING: &str = "🏦 Planificación";
/// Tasks database: optional project relation.
const TASK_PROJECT: &str = "Proyecto";
/// Tasks database: description rich text.
const TASK_DESCRIPTION: &str = "Description";
/// Tasks database: date column.
const TASK_DATE: &str = "Fecha";

/// Shared: system relation.
pub(crate) const SYSTEM: &str = "Sistema";
/// Shared: type select.
pub(crate) const TYPE: &str = "Tipo";
/// Shared: theme select.
pub(crate) const THEME: &str = "Tema";

/// Projects database: relation to systems.
pub(crate) const PROJECT_SYSTEMS: &str = "Sistemas & Modulos";
/// Projects database: title column.
pub(crate) const PROJECT_NAME: &str = "Nombre del Proyecto";

/// Heading placed above the attached email body.
const EMAIL_HEADING: &str = "Email";
/// Banner text placed between the heading and the body.
const EMAIL_BANNER: &str = "Content copied from the original message.";
/// Banner icon.
const EMAIL_BANNER_ICON: &str = "📧";
/// Closing paragraph when the body does not fit in one create call.
const EMAIL_TRUNCATED: &str = "[Content truncated: the message is longer than one Notion page can take.]";

/// Most children Notion accepts in one create call.
pub const MAX_CHILDREN: usize = 100;

/// Opaque identifier of a Notion page.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Returns the raw id string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for RecordId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single typed property value.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Page title.
    Title(String),
    /// Plain rich text.
    RichText(String),
    /// Relation to other pages.
    Relation(Vec<RecordId>),
    /// Single select by option name.
    Select(String),
    /// URL, or explicitly empty.
    Url(Option<String>),
    /// Date with time.
    Date(DateTime<Utc>),
}

impl PropertyValue {
    /// Renders the value in Notion's wire shape.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Title(text) => json!({ "title": [text_object(text)] }),
            Self::RichText(text) => json!({ "rich_text": [text_object(text)] }),
            Self::Relation(ids) => {
                let ids: Vec<Value> = ids.iter().map(|id| json!({ "id": id.as_str() })).collect();
                json!({ "relation": ids })
            }
            Self::Select(name) => json!({ "select": { "name": name } }),
            Self::Url(url) => json!({ "url": url }),
            Self::Date(at) => {
                json!({ "date": { "start": at.to_rfc3339_opts(SecondsFormat::Millis, true) } })
            }
        }
    }
}

fn text_object(content: &str) -> Value {
    json!({ "text": { "content": content } })
}

/// Properties of one page, keyed by database column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertySet(BTreeMap<String, PropertyValue>);

impl PropertySet {
    /// Sets a property, replacing any previous value under the same name.
    pub fn insert(&mut self, name: &str, value: PropertyValue) {
        self.0.insert(name.to_string(), value);
    }

    /// Returns the value stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.0.get(name)
    }

    /// Returns `true` if a property named `name` is present.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Renders the set in Notion's wire shape.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let map: serde_json::Map<String, Value> =
            self.0.iter().map(|(name, value)| (name.clone(), value.to_json())).collect();
        Value::Object(map)
    }
}

/// A content block appended to a page body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// Second-level heading.
    Heading(String),
    /// Informational banner with an emoji icon.
    Callout {
        /// Emoji icon.
        icon: String,
        /// Banner text.
        text: String,
    },
    /// Plain paragraph.
    Paragraph(String),
}

impl Block {
    /// Renders the block in Notion's wire shape.
    #[must_use]
    pub fn to_json(&self) -> Value {
        match self {
            Self::Heading(text) => json!({
                "object": "block",
                "type": "heading_2",
                "heading_2": { "rich_text": [text_object(text)] },
            }),
            Self::Callout { icon, text } => json!({
                "object": "block",
                "type": "callout",
                "callout": {
                    "rich_text": [text_object(text)],
                    "icon": { "type": "emoji", "emoji": icon },
                    "color": "blue_background",
                },
            }),
            Self::Paragraph(text) => json!({
                "object": "block",
                "type": "paragraph",
                "paragraph": { "rich_text": [text_object(text)] },
            }),
        }
    }
}

/// A create-page request: target database, properties, body blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    /// Parent database id.
    pub database_id: String,
    /// Page properties.
    pub properties: PropertySet,
    /// Body blocks, possibly empty.
    pub children: Vec<Block>,
}

impl PageRequest {
    /// Renders the request body for `POST /pages`.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut body = json!({
            "parent": { "database_id": self.database_id },
            "properties": self.properties.to_json(),
        });
        if !self.children.is_empty() {
            body["children"] = self.children.iter().map(Block::to_json).collect();
        }
        body
    }
}

/// Builds the planning (primary) record properties for a draft.
#[must_use]
pub fn planning_properties(draft: &TaskDraft, requested_at: DateTime<Utc>) -> PropertySet {
    let mut props = PropertySet::default();
    props.insert(PLANNING_TITLE, PropertyValue::Title(draft.title.clone()));
    props.insert(SYSTEM, PropertyValue::Relation(vec![RecordId::from(draft.system_key.as_str())]));
    props.insert(TYPE, PropertyValue::Select(draft.type_key.clone()));
    props.insert(THEME, PropertyValue::Select(draft.theme_key.clone()));
    props.insert(PLANNING_CHANNEL, PropertyValue::Select(CHANNEL_EMAIL.to_string()));
    props.insert(
        PLANNING_NEXT_STEPS,
        PropertyValue::RichText(draft.next_steps.clone().unwrap_or_default()),
    );
    props.insert(
        PLANNING_EXPECTED_RESULT,
        PropertyValue::RichText(draft.expected_result.clone().unwrap_or_default()),
    );
    props.insert(PLANNING_MESSAGE_URL, PropertyValue::Url(draft.message_url.clone()));
    props.insert(PLANNING_REQUESTED_AT, PropertyValue::Date(requested_at));
    props
}

/// Builds the task (dependent) record properties, linked to `planning`.
#[must_use]
pub fn task_properties(
    draft: &TaskDraft,
    planning: &RecordId,
    requested_at: DateTime<Utc>,
) -> PropertySet {
    let mut props = PropertySet::default();
    props.insert(TASK_TITLE, PropertyValue::Title(draft.title.clone()));
    props.insert(SYSTEM, PropertyValue::Relation(vec![RecordId::from(draft.system_key.as_str())]));
    props.insert(TASK_PLANNING, PropertyValue::Relation(vec![planning.clone()]));
    if let Some(project) = draft.project_key.as_deref().filter(|p| !p.is_empty()) {
        props.insert(TASK_PROJECT, PropertyValue::Relation(vec![RecordId::from(project)]));
    }
    props.insert(TYPE, PropertyValue::Select(draft.type_key.clone()));
    props.insert(TASK_DESCRIPTION, PropertyValue::RichText(task_description(draft)));
    props.insert(TASK_DATE, PropertyValue::Date(requested_at));
    props
}

fn task_description(draft: &TaskDraft) -> String {
    format!(
        "Próximos Pasos:\n{}\n\nResultado Esperado:\n{}\n\nEmail: {}",
        draft.next_steps.as_deref().unwrap_or_default(),
        draft.expected_result.as_deref().unwrap_or_default(),
        draft.message_url.as_deref().unwrap_or_default(),
    )
}

/// Builds the body blocks for an email: heading, banner, one paragraph per chunk.
///
/// An empty body produces no blocks at all. The result never exceeds
/// [`MAX_CHILDREN`]: chunks past the limit are dropped and a closing
/// paragraph says so.
#[must_use]
pub fn email_blocks(body: &str) -> Vec<Block> {
    let mut chunks = chunk::chunk_default(body);
    if chunks.is_empty() {
        return Vec::new();
    }
    let paragraph_room = MAX_CHILDREN - 2;
    let truncated = chunks.len() > paragraph_room;
    if truncated {
        chunks.truncate(paragraph_room - 1);
    }

    let mut blocks = Vec::with_capacity(chunks.len() + 3);
    blocks.push(Block::Heading(EMAIL_HEADING.to_string()));
    blocks.push(Block::Callout {
        icon: EMAIL_BANNER_ICON.to_string(),
        text: EMAIL_BANNER.to_string(),
    });
    blocks.extend(chunks.into_iter().map(Block::Paragraph));
    if truncated {
        blocks.push(Block::Paragraph(EMAIL_TRUNCATED.to_string()));
    }
    blocks
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn draft() -> TaskDraft {
        TaskDraft {
            title: "ACME@EXAMPLE.COM - Invoice".into(),
            system_key: "sys-1".into(),
            project_key: None,
            type_key: "Soporte".into(),
            theme_key: "Facturación".into(),
            next_steps: Some("Call back".into()),
            expected_result: None,
            message_url: Some("https://outlook.office.com/mail/deeplink/message/abc".into()),
            is_project_task: false,
            add_to_external_list: false,
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()
    }

    #[test]
    fn planning_properties_render_notion_shapes() {
        let json = planning_properties(&draft(), at()).to_json();
        assert_eq!(json["Tarea"]["title"][0]["text"]["content"], "ACME@EXAMPLE.COM - Invoice");
        assert_eq!(json["Sistema"]["relation"][0]["id"], "sys-1");
        assert_eq!(json["Tipo"]["select"]["name"], "Soporte");
        assert_eq!(json["Tema"]["select"]["name"], "Facturación");
        assert_eq!(json["Via"]["select"]["name"], "Correo");
        assert_eq!(json["Resultado Esperado"]["rich_text"][0]["text"]["content"], "");
        assert_eq!(json["Fecha_Solicitud"]["date"]["start"], "2024-03-01T09:30:00.000Z");
    }

    #[test]
    fn missing_message_url_is_sent_as_null() {
        let mut d = draft();
        d.message_url = None;
        let json = planning_properties(&d, at()).to_json();
        assert!(json["MsgUrl"]["url"].is_null());
    }

    #[test]
    fn task_properties_link_planning_and_optional_project() {
        let planning = RecordId::from("plan-9");
        let props = task_properties(&draft(), &planning, at());
        assert!(!props.contains("Proyecto"));
        assert_eq!(
            props.get("🏦 Planificación"),
            Some(&PropertyValue::Relation(vec![planning.clone()]))
        );

        let mut d = draft();
        d.project_key = Some("proj-2".into());
        let json = task_properties(&d, &planning, at()).to_json();
        assert_eq!(json["Proyecto"]["relation"][0]["id"], "proj-2");
        let description = json["Description"]["rich_text"][0]["text"]["content"].as_str().unwrap();
        assert!(description.starts_with("Próximos Pasos:\nCall back\n\nResultado Esperado:\n\n"));
        assert!(description.ends_with("deeplink/message/abc"));
    }

    #[test]
    fn email_blocks_wrap_chunks_with_heading_and_banner() {
        let body = "x".repeat(4500);
        let blocks = email_blocks(&body);
        assert_eq!(blocks.len(), 2 + 3);
        assert!(matches!(blocks[0], Block::Heading(_)));
        assert!(matches!(blocks[1], Block::Callout { .. }));
        assert!(blocks[2..].iter().all(|b| matches!(b, Block::Paragraph(_))));
    }

    #[test]
    fn body_filling_the_limit_is_kept_whole() {
        let body = "y".repeat(2000 * (MAX_CHILDREN - 2));
        let blocks = email_blocks(&body);
        assert_eq!(blocks.len(), MAX_CHILDREN);
        assert_eq!(blocks.last(), Some(&Block::Paragraph("y".repeat(2000))));
    }

    #[test]
    fn oversized_body_is_truncated_with_notice() {
        let body = "z".repeat(2000 * 150);
        let blocks = email_blocks(&body);
        assert_eq!(blocks.len(), MAX_CHILDREN);
        assert_eq!(blocks[MAX_CHILDREN - 2], Block::Paragraph("z".repeat(2000)));
        assert_eq!(blocks.last(), Some(&Block::Paragraph(EMAIL_TRUNCATED.to_string())));
    }

    #[test]
    fn empty_body_has_no_blocks_and_no_children_key() {
        assert!(email_blocks("").is_empty());
        let request = PageRequest {
            database_id: "db".into(),
            properties: PropertySet::default(),
            children: Vec::new(),
        };
        assert!(request.to_json().get("children").is_none());
    }

    #[test]
    fn block_json_uses_block_type_keys() {
        let json = Block::Paragraph("hi".into()).to_json();
        assert_eq!(json["type"], "paragraph");
        assert_eq!(json["paragraph"]["rich_text"][0]["text"]["content"], "hi");
    }
}
