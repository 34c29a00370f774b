use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

// --- Dashboard ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(default, deserialize_with = "null_as_zero")]
    pub total_folders: u64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub total_files: u64,
    #[serde(default, deserialize_with = "null_as_zero")]
    pub total_users: u64,
}

/// Series served by a metrics endpoint for one chart.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub data: Vec<u64>,
}

// --- Listing ---

/// Item identifier, kept in whatever JSON type the backend used for it so it
/// goes back out unchanged in share, rename and delete requests.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Number(n) => write!(f, "{}", n),
            ItemId::Text(s) => f.write_str(s),
        }
    }
}

/// Typed ids: all digits is a number, anything else is text.
impl FromStr for ItemId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<i64>() {
            Ok(n) if s.bytes().all(|b| b.is_ascii_digit()) => ItemId::Number(n),
            _ => ItemId::Text(s.to_string()),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    File,
    Folder,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemKind::File => write!(f, "file"),
            ItemKind::Folder => write!(f, "folder"),
            ItemKind::Unknown => write!(f, "unknown"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ListingItem {
    pub id: ItemId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: ItemKind,
}

// --- Folder mutations ---

#[derive(Debug, Serialize)]
pub(crate) struct CreateFolderRequest<'a> {
    pub folder_name: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct RenameFolderRequest<'a> {
    pub folder_id: &'a ItemId,
    pub new_name: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeleteFolderRequest<'a> {
    pub folder_id: &'a ItemId,
}

// --- Sharing ---

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessType {
    #[default]
    Read,
    Write,
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessType::Read => write!(f, "read"),
            AccessType::Write => write!(f, "write"),
        }
    }
}

/// Wire form of a share request. Absent values go out as `""`, which the
/// backend reads as "no expiration" / "no password".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShareRequest {
    pub file_id: ItemId,
    pub access_type: AccessType,
    #[serde(serialize_with = "none_as_empty")]
    pub expiration: Option<String>,
    #[serde(serialize_with = "none_as_empty")]
    pub password: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ShareResponse {
    pub share_link: String,
}

// --- serde helpers ---

fn null_as_zero<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u64>::deserialize(deserializer)?.unwrap_or(0))
}

fn none_as_empty<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(value.as_deref().unwrap_or(""))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_summary_missing_and_null_fields_default_to_zero() {
        let summary: Summary =
            serde_json::from_value(json!({ "totalFolders": 3, "totalFiles": null })).unwrap();
        assert_eq!(summary.total_folders, 3);
        assert_eq!(summary.total_files, 0);
        assert_eq!(summary.total_users, 0);
    }

    #[test]
    fn test_listing_item_numeric_id() {
        let items: Vec<ListingItem> = serde_json::from_value(json!([
            { "id": 7, "name": "Docs", "type": "folder" },
            { "id": "8", "name": "a.txt", "type": "file" },
            { "id": "9", "name": "odd", "type": "symlink" }
        ]))
        .unwrap();
        assert_eq!(items[0].id, ItemId::Number(7));
        assert_eq!(items[1].id, ItemId::Text("8".into()));
        assert_eq!(items[0].kind, ItemKind::Folder);
        assert_eq!(items[1].kind, ItemKind::File);
        assert_eq!(items[2].kind, ItemKind::Unknown);
    }

    #[test]
    fn test_share_request_blank_fields_sent_as_empty_strings() {
        let req = ShareRequest {
            file_id: ItemId::Number(2),
            access_type: AccessType::Read,
            expiration: None,
            password: None,
        };
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({ "file_id": 2, "access_type": "read", "expiration": "", "password": "" })
        );
    }

    #[test]
    fn test_item_id_keeps_wire_type() {
        let item: ListingItem =
            serde_json::from_value(json!({ "id": 7, "name": "Docs", "type": "folder" })).unwrap();
        let body = RenameFolderRequest {
            folder_id: &item.id,
            new_name: "Archive",
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "folder_id": 7, "new_name": "Archive" })
        );

        let text = ItemId::Text("a1b2".into());
        assert_eq!(
            serde_json::to_value(DeleteFolderRequest { folder_id: &text }).unwrap(),
            json!({ "folder_id": "a1b2" })
        );
    }

    #[test]
    fn test_item_id_from_cli_argument() {
        assert_eq!("42".parse::<ItemId>().unwrap(), ItemId::Number(42));
        assert_eq!("-3".parse::<ItemId>().unwrap(), ItemId::Text("-3".into()));
        assert_eq!("0x1f".parse::<ItemId>().unwrap(), ItemId::Text("0x1f".into()));
        assert_eq!(ItemId::Number(42).to_string(), "42");
    }

    #[test]
    fn test_share_response_ignores_message() {
        let resp: ShareResponse = serde_json::from_value(
            json!({ "share_link": "abc123", "message": "Share link generated successfully" }),
        )
        .unwrap();
        assert_eq!(resp.share_link, "abc123");
    }
}
