use crate::date::Timestamp;
use crate::sequence::{Sequenced, SequencedList};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

// =========================================================
// 进度状态 (Progress)
// =========================================================

/// 场景 / 遭遇 / 高潮的进度状态
///
/// 只能单向推进：Not Started -> In Progress -> Complete。
/// 序列化字符串与服务端的 choices 完全一致。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum Progress {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Complete")]
    Complete,
}

impl Progress {
    /// 进度权重：0 / 50 / 100
    pub const fn weight(&self) -> u32 {
        match self {
            Progress::NotStarted => 0,
            Progress::InProgress => 50,
            Progress::Complete => 100,
        }
    }

    /// 下一个状态，Complete 为终态
    pub const fn next(&self) -> Option<Progress> {
        match self {
            Progress::NotStarted => Some(Progress::InProgress),
            Progress::InProgress => Some(Progress::Complete),
            Progress::Complete => None,
        }
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Progress::NotStarted => "Not Started",
            Progress::InProgress => "In Progress",
            Progress::Complete => "Complete",
        }
    }

    pub const fn is_complete(&self) -> bool {
        matches!(self, Progress::Complete)
    }
}

impl std::fmt::Display for Progress {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AdventureStatus {
    #[default]
    Active,
    Archived,
}

/// 服务端可能把空文本字段返回为 null
fn nullable_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 遭遇：场景内的一个独立挑战，顺序由位置决定
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Encounter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub encounter_type: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub description: String,
    #[serde(default)]
    pub stats: Option<String>,
    #[serde(default)]
    pub progress: Progress,
}

impl Sequenced for Encounter {}

/// 场景："上升动作" 中按顺序排列的章节
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// 从 1 开始，在同一冒险内连续且唯一
    pub sequence: u32,
    #[serde(default, deserialize_with = "nullable_string")]
    pub challenge: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub setting: String,
    #[serde(default)]
    pub encounter_set: SequencedList<Encounter>,
    #[serde(default)]
    pub plot_twist: Option<String>,
    #[serde(default)]
    pub clue: Option<String>,
    #[serde(default)]
    pub progress: Progress,
}

impl Sequenced for Scene {
    fn sequence(&self) -> Option<u32> {
        Some(self.sequence)
    }

    fn set_sequence(&mut self, sequence: u32) {
        self.sequence = sequence;
    }
}

/// 冒险：按用户追踪的顶层叙事实体
///
/// `progress` 是派生值，由编辑器根据子节点状态重新计算，客户端不以它为准。
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Adventure {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<NaiveDate>,
    pub game: String,
    #[serde(default)]
    pub campaign_setting: Option<String>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub exposition: String,
    #[serde(default, deserialize_with = "nullable_string")]
    pub incitement: String,
    #[serde(default)]
    pub scene_set: SequencedList<Scene>,
    #[serde(default, deserialize_with = "nullable_string")]
    pub climax: String,
    /// 服务端没有对应列，由前端按冒险 id 保存在本地存储中
    #[serde(skip)]
    pub climax_progress: Progress,
    // 沿用服务端字段拼写
    #[serde(default, deserialize_with = "nullable_string")]
    pub denoument: String,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub status: AdventureStatus,
}

impl Adventure {
    /// 高潮文本非空时才参与进度计算
    pub fn has_climax(&self) -> bool {
        !self.climax.trim().is_empty()
    }
}

// =========================================================
// 账户与会话 (Account & Session)
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// Django `serialize('json', [token])` 的 fields 部分
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenFields {
    pub user: u64,
    #[serde(default)]
    pub created: String,
    pub expires_at: String,
}

/// 会话令牌 `{ pk, fields: { user, created, expires_at } }`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    pub pk: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub fields: TokenFields,
}

impl SessionToken {
    pub fn user_id(&self) -> u64 {
        self.fields.user
    }

    pub fn expires_at(&self) -> Option<Timestamp> {
        Timestamp::parse(&self.fields.expires_at)
    }

    /// 无法解析的过期时间视为已过期
    pub fn is_expired(&self, now: Timestamp) -> bool {
        match self.expires_at() {
            Some(expires_at) => expires_at < now,
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_wire_strings() {
        let json = serde_json::to_string(&Progress::InProgress).unwrap();
        assert_eq!(json, "\"In Progress\"");
        let parsed: Progress = serde_json::from_str("\"Not Started\"").unwrap();
        assert_eq!(parsed, Progress::NotStarted);
        assert_eq!(Progress::Complete.next(), None);
    }

    #[test]
    fn test_adventure_from_server_payload() {
        let raw = r#"{
            "id": 7,
            "title": "The Sunken Vault",
            "user_id": 3,
            "created_at": "2023-08-01",
            "last_modified": "2023-08-02",
            "game": "Dungeons & Dragons",
            "campaign_setting": null,
            "exposition": "A storm.",
            "incitement": null,
            "scene_set": [
                {"id": 12, "sequence": 2, "challenge": "Climb", "setting": "Cliff",
                 "encounter_set": [], "plot_twist": null, "clue": null, "progress": "Not Started"},
                {"id": 11, "sequence": 1, "challenge": "Sail", "setting": "Sea",
                 "encounter_set": [{"id": 4, "encounter_type": "Combat", "description": "Sharks",
                                    "stats": null, "progress": "Complete"}],
                 "plot_twist": "Mutiny", "clue": null, "progress": "In Progress"}
            ],
            "climax": "",
            "denoument": "",
            "progress": 25.0,
            "status": "active"
        }"#;

        let adventure: Adventure = serde_json::from_str(raw).unwrap();
        assert_eq!(adventure.incitement, "");
        assert_eq!(adventure.scene_set.len(), 2);
        // 按 sequence 排序后重新编号
        assert_eq!(adventure.scene_set.get(0).unwrap().id, Some(11));
        assert_eq!(adventure.scene_set.get(1).unwrap().sequence, 2);
        assert_eq!(
            adventure.scene_set.get(0).unwrap().encounter_set.get(0).unwrap().progress,
            Progress::Complete
        );
        assert!(!adventure.has_climax());
    }

    #[test]
    fn test_session_token_expiry() {
        let raw = r#"{"model": "server.odyssey_token", "pk": "abc",
            "fields": {"user": 5, "created": "2023-08-01T10:00:00Z", "expires_at": "2023-08-02T10:00:00Z"}}"#;
        let token: SessionToken = serde_json::from_str(raw).unwrap();
        assert_eq!(token.user_id(), 5);

        let before = Timestamp::parse("2023-08-02T09:59:59Z").unwrap();
        let after = Timestamp::parse("2023-08-02T10:00:01Z").unwrap();
        assert!(!token.is_expired(before));
        assert!(token.is_expired(after));
    }

    #[test]
    fn test_unparsable_expiry_is_expired() {
        let token = SessionToken {
            pk: "k".into(),
            model: None,
            fields: TokenFields {
                user: 1,
                created: String::new(),
                expires_at: "soon".into(),
            },
        };
        assert!(token.is_expired(Timestamp::new(0)));
    }
}
