use crate::model::{Adventure, AdventureStatus, Encounter, Progress, Scene, SessionToken, User};
use crate::sequence::SequencedList;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// API 请求使用的 HTTP 方法
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
        }
    }

    /// 写请求必须携带 CSRF 请求头
    pub fn is_mutating(&self) -> bool {
        !matches!(self, HttpMethod::Get)
    }

    /// 序列化后的请求是否作为 JSON 请求体发送
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

/// 定义接口请求与响应类型及元数据的 trait
///
/// 路径相对于 API 根地址（如 `/api`），并且总以 `/` 结尾，与 Django 路由一致。
pub trait ApiRequest: Serialize {
    /// 该请求返回的响应类型
    type Response: DeserializeOwned;
    /// HTTP 方法
    const METHOD: HttpMethod;
    /// URL 路径，包含 id 段或查询串
    fn path(&self) -> String;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

// =========================================================
// 会话与账户 (Session & Account)
// =========================================================

/// 获取 `csrftoken` cookie
#[derive(Debug, Serialize, Deserialize)]
pub struct CsrfCookieRequest;

impl ApiRequest for CsrfCookieRequest {
    type Response = serde_json::Value;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        "/csrf_cookie/".to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: SessionToken,
    #[serde(default)]
    pub username: String,
}

impl ApiRequest for LoginRequest {
    type Response = LoginResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/users/login/".to_string()
    }
}

/// 使 `user_id` 的服务端会话失效
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogoutRequest {
    pub user_id: u64,
}

impl ApiRequest for LogoutRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/users/logout/".to_string()
    }
}

/// 注册账户，服务端同时登录新用户并返回令牌
///
/// 邮箱同时作为用户名。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user: User,
    pub token: SessionToken,
}

impl ApiRequest for RegisterRequest {
    type Response = RegisterResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/users/".to_string()
    }
}

/// 修改当前用户的邮箱或密码
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserRequest {
    #[serde(skip)]
    pub user_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl ApiRequest for UpdateUserRequest {
    type Response = User;
    const METHOD: HttpMethod = HttpMethod::Patch;
    fn path(&self) -> String {
        format!("/users/{}/", self.user_id)
    }
}

/// 获取设置页显示的账户信息
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetUserRequest {
    #[serde(skip)]
    pub user_id: u64,
}

impl ApiRequest for GetUserRequest {
    type Response = User;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/users/{}/", self.user_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetRequest {
    pub email: String,
}

impl ApiRequest for PasswordResetRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/password/reset/".to_string()
    }
}

/// 用重置链接中的两个令牌设置新密码
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordResetConfirmRequest {
    pub uidb64: String,
    pub token: String,
    pub password: String,
}

impl ApiRequest for PasswordResetConfirmRequest {
    type Response = MessageResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/password/reset/confirm/".to_string()
    }
}

// =========================================================
// 冒险 (Adventures)
// =========================================================

/// 列出用户的全部冒险
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListAdventuresRequest {
    #[serde(skip)]
    pub user_id: u64,
}

impl ApiRequest for ListAdventuresRequest {
    type Response = Vec<Adventure>;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/adventures/?user_id={}", self.user_id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetAdventureRequest {
    #[serde(skip)]
    pub id: u64,
}

impl ApiRequest for GetAdventureRequest {
    type Response = Adventure;
    const METHOD: HttpMethod = HttpMethod::Get;
    fn path(&self) -> String {
        format!("/adventures/{}/", self.id)
    }
}

/// 创建与更新冒险时发送的字段（场景与遭遇单独保存）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdventurePayload {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<u64>,
    pub game: String,
    pub campaign_setting: Option<String>,
    pub exposition: String,
    pub incitement: String,
    pub climax: String,
    pub denoument: String,
    pub progress: f64,
    pub status: AdventureStatus,
}

impl From<&Adventure> for AdventurePayload {
    fn from(adventure: &Adventure) -> Self {
        Self {
            title: adventure.title.clone(),
            user_id: adventure.user_id,
            game: adventure.game.clone(),
            campaign_setting: adventure.campaign_setting.clone(),
            exposition: adventure.exposition.clone(),
            incitement: adventure.incitement.clone(),
            climax: adventure.climax.clone(),
            denoument: adventure.denoument.clone(),
            progress: adventure.progress,
            status: adventure.status,
        }
    }
}

impl ApiRequest for AdventurePayload {
    type Response = Adventure;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/adventures/".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateAdventureRequest {
    #[serde(skip)]
    pub id: u64,
    #[serde(flatten)]
    pub payload: AdventurePayload,
}

impl ApiRequest for UpdateAdventureRequest {
    type Response = Adventure;
    const METHOD: HttpMethod = HttpMethod::Patch;
    fn path(&self) -> String {
        format!("/adventures/{}/", self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteAdventureRequest {
    #[serde(skip)]
    pub id: u64,
}

impl ApiRequest for DeleteAdventureRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/adventures/{}/", self.id)
    }
}

// =========================================================
// 场景与遭遇 (Scenes & Encounters)
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenePayload {
    pub adventure_id: u64,
    pub sequence: u32,
    pub challenge: String,
    pub setting: String,
    pub plot_twist: Option<String>,
    pub clue: Option<String>,
}

impl ScenePayload {
    pub fn new(adventure_id: u64, scene: &Scene) -> Self {
        Self {
            adventure_id,
            sequence: scene.sequence,
            challenge: scene.challenge.clone(),
            setting: scene.setting.clone(),
            plot_twist: scene.plot_twist.clone(),
            clue: scene.clue.clone(),
        }
    }
}

/// 服务端返回保存后的记录，这里只需要 id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: u64,
}

impl ApiRequest for ScenePayload {
    type Response = CreatedResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/scenes/".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateSceneRequest {
    #[serde(skip)]
    pub id: u64,
    #[serde(flatten)]
    pub payload: ScenePayload,
}

impl ApiRequest for UpdateSceneRequest {
    type Response = CreatedResponse;
    const METHOD: HttpMethod = HttpMethod::Patch;
    fn path(&self) -> String {
        format!("/scenes/{}/", self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSceneRequest {
    #[serde(skip)]
    pub id: u64,
}

impl ApiRequest for DeleteSceneRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/scenes/{}/", self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterPayload {
    pub scene_id: u64,
    pub encounter_type: String,
    pub description: String,
    pub stats: Option<String>,
}

impl EncounterPayload {
    pub fn new(scene_id: u64, encounter: &Encounter) -> Self {
        Self {
            scene_id,
            encounter_type: encounter.encounter_type.clone(),
            description: encounter.description.clone(),
            stats: encounter.stats.clone(),
        }
    }
}

impl ApiRequest for EncounterPayload {
    type Response = CreatedResponse;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/encounters/".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateEncounterRequest {
    #[serde(skip)]
    pub id: u64,
    #[serde(flatten)]
    pub payload: EncounterPayload,
}

impl ApiRequest for UpdateEncounterRequest {
    type Response = CreatedResponse;
    const METHOD: HttpMethod = HttpMethod::Patch;
    fn path(&self) -> String {
        format!("/encounters/{}/", self.id)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteEncounterRequest {
    #[serde(skip)]
    pub id: u64,
}

impl ApiRequest for DeleteEncounterRequest {
    type Response = ();
    const METHOD: HttpMethod = HttpMethod::Delete;
    fn path(&self) -> String {
        format!("/encounters/{}/", self.id)
    }
}

/// 进度更新针对的已保存节点
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressTarget {
    Scene(u64),
    Encounter(u64),
}

/// 只含 `progress` 字段的 `PATCH`
#[derive(Debug, Clone, Serialize)]
pub struct UpdateProgressRequest {
    #[serde(skip)]
    pub target: ProgressTarget,
    pub progress: Progress,
}

impl ApiRequest for UpdateProgressRequest {
    type Response = serde_json::Value;
    const METHOD: HttpMethod = HttpMethod::Patch;
    fn path(&self) -> String {
        match self.target {
            ProgressTarget::Scene(id) => format!("/scenes/{}/", id),
            ProgressTarget::Encounter(id) => format!("/encounters/{}/", id),
        }
    }
}

// =========================================================
// 冒险生成 (Generation)
// =========================================================

/// AI 冒险生成参数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateAdventureRequest {
    pub game: String,
    pub players: u32,
    pub scenes: u32,
    pub encounters: u32,
    /// 含转折的场景占比（0-100）
    pub plot_twists: u32,
    /// 含线索的场景占比（0-100）
    pub clues: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homebrew_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub campaign_setting: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub experience: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
}

impl ApiRequest for GenerateAdventureRequest {
    type Response = GeneratedAdventure;
    const METHOD: HttpMethod = HttpMethod::Post;
    fn path(&self) -> String {
        "/generate-adventure/".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedEncounter {
    #[serde(rename = "type", default)]
    pub encounter_type: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub stats: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedScene {
    #[serde(default)]
    pub challenge: Option<String>,
    #[serde(default)]
    pub setting: Option<String>,
    #[serde(default)]
    pub encounters: Vec<GeneratedEncounter>,
    #[serde(default)]
    pub plot_twist: Option<String>,
    #[serde(default)]
    pub clue: Option<String>,
}

/// 生成器的原始输出，按故事阶段分键
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedAdventure {
    #[serde(rename = "Exposition", default)]
    pub exposition: String,
    #[serde(rename = "Incitement", default)]
    pub incitement: String,
    #[serde(rename = "Rising Action", default)]
    pub rising_action: Vec<GeneratedScene>,
    #[serde(rename = "Climax", default)]
    pub climax: String,
    #[serde(rename = "Denoument", default)]
    pub denoument: String,
}

impl GeneratedAdventure {
    /// 把生成结果转换为尚未保存的冒险树
    pub fn into_adventure(
        self,
        title: String,
        game: String,
        campaign_setting: Option<String>,
        user_id: Option<u64>,
    ) -> Adventure {
        let scenes: Vec<Scene> = self
            .rising_action
            .into_iter()
            .map(|generated| Scene {
                challenge: generated.challenge.unwrap_or_default(),
                setting: generated.setting.unwrap_or_default(),
                encounter_set: SequencedList::from_vec(
                    generated
                        .encounters
                        .into_iter()
                        .map(|e| Encounter {
                            encounter_type: e.encounter_type.unwrap_or_default(),
                            description: e.description.unwrap_or_default(),
                            stats: e.stats,
                            ..Encounter::default()
                        })
                        .collect(),
                ),
                plot_twist: generated.plot_twist,
                clue: generated.clue,
                ..Scene::default()
            })
            .collect();

        Adventure {
            title,
            user_id,
            game,
            campaign_setting,
            exposition: self.exposition,
            incitement: self.incitement,
            // 生成结果按位置排列，from_vec 依次编号
            scene_set: SequencedList::from_vec(scenes),
            climax: self.climax,
            denoument: self.denoument,
            ..Adventure::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_and_methods() {
        assert_eq!(GetAdventureRequest { id: 4 }.path(), "/adventures/4/");
        assert_eq!(
            ListAdventuresRequest { user_id: 9 }.path(),
            "/adventures/?user_id=9"
        );
        assert_eq!(
            UpdateProgressRequest {
                target: ProgressTarget::Encounter(3),
                progress: Progress::Complete
            }
            .path(),
            "/encounters/3/"
        );
        assert!(!GetAdventureRequest::METHOD.is_mutating());
        assert!(DeleteSceneRequest::METHOD.is_mutating());
        assert!(!DeleteSceneRequest::METHOD.has_body());
    }

    #[test]
    fn test_id_is_not_part_of_body() {
        let req = UpdateProgressRequest {
            target: ProgressTarget::Scene(8),
            progress: Progress::InProgress,
        };
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body, serde_json::json!({ "progress": "In Progress" }));

        let update = UpdateSceneRequest {
            id: 2,
            payload: ScenePayload {
                adventure_id: 1,
                sequence: 3,
                challenge: "c".into(),
                setting: "s".into(),
                plot_twist: None,
                clue: Some("k".into()),
            },
        };
        let body = serde_json::to_value(&update).unwrap();
        assert!(body.get("id").is_none());
        assert_eq!(body["sequence"], 3);
        assert_eq!(body["adventure_id"], 1);
    }

    #[test]
    fn test_generate_request_omits_unset_options() {
        let req = GenerateAdventureRequest {
            game: "Traveller".into(),
            players: 4,
            scenes: 3,
            encounters: 2,
            plot_twists: 50,
            clues: 25,
            homebrew_description: None,
            campaign_setting: Some("Reft Sector".into()),
            level: None,
            experience: Some(300),
            context: None,
        };
        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["clues"], 25);
        assert_eq!(body["campaign_setting"], "Reft Sector");
        assert_eq!(body["experience"], 300);
        assert!(body.get("level").is_none());
        assert!(body.get("homebrew_description").is_none());
        assert_eq!(GenerateAdventureRequest::METHOD, HttpMethod::Post);
    }

    #[test]
    fn test_generated_adventure_conversion() {
        let raw = r#"{
            "Exposition": "Long ago",
            "Incitement": "A letter",
            "Rising Action": [
                {"challenge": "Find the map", "setting": "Library",
                 "encounters": [{"type": "Social", "description": "Librarian"}],
                 "plot_twist": null, "clue": "Ink"},
                {"challenge": "Cross the marsh", "setting": "Marsh", "encounters": []}
            ],
            "Climax": "The lich",
            "Denoument": "Peace"
        }"#;
        let generated: GeneratedAdventure = serde_json::from_str(raw).unwrap();
        let adventure = generated.into_adventure(
            "Marsh Lich".into(),
            "Dungeons & Dragons".into(),
            Some("Greyhawk".into()),
            Some(2),
        );

        assert_eq!(adventure.id, None);
        assert_eq!(adventure.scene_set.len(), 2);
        let second = adventure.scene_set.get(1).unwrap();
        assert_eq!(second.sequence, 2);
        assert_eq!(second.challenge, "Cross the marsh");
        let encounter = adventure.scene_set.get(0).unwrap().encounter_set.get(0).unwrap();
        assert_eq!(encounter.encounter_type, "Social");
        assert_eq!(encounter.progress, Progress::NotStarted);
        assert_eq!(adventure.climax, "The lich");
    }
}
