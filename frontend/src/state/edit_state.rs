//! 冒险编辑状态
//!
//! 持有 `AdventureEditor`，并管理编辑模式、加载标志与通知：
//! - 编辑模式下的结构与文本修改只作用于本地树
//! - 保存时执行编辑器生成的远程操作，成功后从服务端重新加载规范状态；
//!   中途失败时已完成的步骤写回本地树，重试只执行剩余部分
//! - 进度推进在查看模式下立即提交（高潮写入本地存储），失败则回滚
//!
//! `loading` 为 true 时拒绝一切修改。异步流程拆成 `begin_*` / `finish_*` 两步，
//! 页面在两步之间更新信号以禁用控件。

use odyssey_shared::protocol::ProgressTarget;
use odyssey_shared::validation::is_safe_text;
use odyssey_shared::{
    Adventure, AdventureEditor, ClientError, ClientResult, EditError, Progress, RemoteOp, SavedOp,
};
use tracing::{debug, error, info, warn};

use super::climax_store::ClimaxStore;
use super::delete_flow::DeleteTarget;
use crate::api::OdysseyApi;
use crate::web::http::HttpClient;
use crate::web::storage::KeyValueStore;

pub const SAVE_SUCCESS_MESSAGE: &str = "Adventure saved.";
const BUSY_MESSAGE: &str = "Please wait for the current update to finish.";

// =========================================================
// 通知
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub message: String,
    pub is_error: bool,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
        }
    }
}

// =========================================================
// 进度推进
// =========================================================

/// 一次用户发起的进度推进
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressStep {
    StartScene(usize),
    CompleteScene(usize),
    StartEncounter(usize, usize),
    CompleteEncounter(usize, usize),
    StartClimax,
    CompleteClimax,
}

impl ProgressStep {
    fn apply(self, editor: &mut AdventureEditor) -> Result<Progress, EditError> {
        match self {
            ProgressStep::StartScene(i) => editor.start_scene(i),
            ProgressStep::CompleteScene(i) => editor.complete_scene(i),
            ProgressStep::StartEncounter(s, e) => editor.start_encounter(s, e),
            ProgressStep::CompleteEncounter(s, e) => editor.complete_encounter(s, e),
            ProgressStep::StartClimax => editor.start_climax(),
            ProgressStep::CompleteClimax => editor.complete_climax(),
        }
    }
}

/// 推进后需要提交的远程修改
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressUpdate {
    /// 场景或遭遇：只 PATCH `progress` 字段
    Entity {
        target: ProgressTarget,
        progress: Progress,
    },
    /// 高潮在服务端没有对应的列，只写入本地存储
    Climax { id: u64, progress: Progress },
    /// 尚未保存的节点只改本地
    LocalOnly,
}

// =========================================================
// 编辑状态
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub struct AdventureEditState {
    editor: AdventureEditor,
    editing: bool,
    loading: bool,
    notification: Option<Notification>,
}

impl AdventureEditState {
    pub fn new(adventure: Adventure) -> Self {
        Self {
            editor: AdventureEditor::new(adventure),
            editing: false,
            loading: false,
            notification: None,
        }
    }

    /// 新建（未保存）的冒险直接进入编辑模式
    pub fn draft(adventure: Adventure) -> Self {
        let mut state = Self::new(adventure);
        state.editing = true;
        state
    }

    pub fn editor(&self) -> &AdventureEditor {
        &self.editor
    }

    pub fn adventure(&self) -> &Adventure {
        self.editor.adventure()
    }

    pub fn is_editing(&self) -> bool {
        self.editing
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notification.as_ref()
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notification = Some(notification);
    }

    pub fn clear_notification(&mut self) {
        self.notification = None;
    }

    fn refuse_if_loading(&mut self) -> bool {
        if self.loading {
            self.notification = Some(Notification::error(BUSY_MESSAGE));
        }
        self.loading
    }

    // --- 编辑模式 ---

    pub fn begin_edit(&mut self) -> bool {
        if self.refuse_if_loading() {
            return false;
        }
        self.editing = true;
        true
    }

    /// 放弃本地修改并退出编辑模式
    pub fn cancel_edit(&mut self) {
        if self.refuse_if_loading() {
            return;
        }
        self.editor.discard_changes();
        self.editing = false;
    }

    /// 在编辑模式下修改本地树；被拒绝的操作转为错误通知
    pub fn edit<T>(
        &mut self,
        change: impl FnOnce(&mut AdventureEditor) -> Result<T, EditError>,
    ) -> Option<T> {
        if self.refuse_if_loading() || !self.editing {
            return None;
        }
        match change(&mut self.editor) {
            Ok(value) => Some(value),
            Err(e) => {
                self.notification = Some(Notification::error(e.to_string()));
                None
            }
        }
    }

    /// 执行已确认的场景 / 遭遇删除，返回是否删除
    pub fn apply_delete(&mut self, target: DeleteTarget) -> bool {
        let allowed = match target {
            DeleteTarget::Scene { index } => self.editor.can_delete_scene(index),
            DeleteTarget::Encounter { scene, position } => {
                self.editor.can_delete_encounter(scene, position)
            }
            DeleteTarget::Adventure { .. } => false,
        };
        if !allowed {
            warn!(?target, "delete refused");
            return false;
        }
        self.edit(|editor| match target {
            DeleteTarget::Scene { index } => editor.delete_scene(index).map(|_| ()),
            DeleteTarget::Encounter { scene, position } => {
                editor.delete_encounter(scene, position).map(|_| ())
            }
            DeleteTarget::Adventure { .. } => Ok(()),
        })
        .is_some()
    }

    // --- 进度推进 ---

    /// 在本地推进进度，返回需要提交的远程修改
    ///
    /// 编辑模式下不允许推进，避免把未保存的文本一并提交。
    pub fn begin_progress(&mut self, step: ProgressStep) -> Option<ProgressUpdate> {
        if self.refuse_if_loading() || self.editing {
            return None;
        }
        let progress = match step.apply(&mut self.editor) {
            Ok(progress) => progress,
            Err(e) => {
                self.notification = Some(Notification::error(e.to_string()));
                return None;
            }
        };

        let adventure = self.editor.adventure();
        let update = match step {
            ProgressStep::StartScene(i) | ProgressStep::CompleteScene(i) => adventure
                .scene_set
                .get(i)
                .and_then(|scene| scene.id)
                .map(|id| ProgressUpdate::Entity {
                    target: ProgressTarget::Scene(id),
                    progress,
                }),
            ProgressStep::StartEncounter(s, e) | ProgressStep::CompleteEncounter(s, e) => self
                .editor
                .encounter(s, e)
                .and_then(|encounter| encounter.id)
                .map(|id| ProgressUpdate::Entity {
                    target: ProgressTarget::Encounter(id),
                    progress,
                }),
            ProgressStep::StartClimax | ProgressStep::CompleteClimax => {
                adventure.id.map(|id| ProgressUpdate::Climax { id, progress })
            }
        }
        .unwrap_or(ProgressUpdate::LocalOnly);

        debug!(?step, ?update, "progress advanced locally");
        self.loading = true;
        Some(update)
    }

    /// 提交成功则确认本地进度，失败则回滚
    pub fn finish_progress(&mut self, result: ClientResult<()>) {
        self.loading = false;
        match result {
            Ok(()) => {
                let confirmed = self.editor.adventure().clone();
                self.editor.mark_loaded(confirmed);
            }
            Err(e) => {
                error!(error = %e, "progress update failed, rolling back");
                self.editor.discard_changes();
                self.notification = Some(Notification::error(e.user_message()));
            }
        }
    }

    // --- 保存 ---

    /// 校验并生成保存计划，进入加载状态
    pub fn begin_save(&mut self) -> Option<Vec<RemoteOp>> {
        if self.refuse_if_loading() {
            return None;
        }
        if let Err(e) = validate_adventure(self.editor.adventure()) {
            self.notification = Some(Notification::error(e.user_message()));
            return None;
        }
        self.editor.refresh_progress();
        self.loading = true;
        Some(self.editor.save_plan())
    }

    /// 先把已完成的步骤写回本地树，再处理结果
    ///
    /// 成功时载入服务端返回的规范状态并退出编辑模式；失败时保留本地修改，
    /// 用户再次保存只会执行尚未完成的部分。
    pub fn finish_save(&mut self, report: SaveReport) {
        self.loading = false;
        for op in report.applied {
            self.editor.record_saved(op);
        }
        match report.result {
            Ok(adventure) => {
                info!(id = ?adventure.id, "adventure saved");
                self.editor.mark_loaded(adventure);
                self.editing = false;
                self.notification = Some(Notification::success(SAVE_SUCCESS_MESSAGE));
            }
            Err(e) => {
                error!(error = %e, "save failed");
                self.notification = Some(Notification::error(e.user_message()));
            }
        }
    }
}

/// 保存前的客户端校验
pub fn validate_adventure(adventure: &Adventure) -> ClientResult<()> {
    if adventure.title.trim().is_empty() {
        return Err(ClientError::validation("title", "Please give your adventure a title."));
    }

    let mut texts: Vec<(&str, &str)> = vec![
        ("title", adventure.title.as_str()),
        ("game", adventure.game.as_str()),
        ("exposition", adventure.exposition.as_str()),
        ("incitement", adventure.incitement.as_str()),
        ("climax", adventure.climax.as_str()),
        ("denouement", adventure.denoument.as_str()),
    ];
    for scene in &adventure.scene_set {
        texts.push(("challenge", scene.challenge.as_str()));
        texts.push(("setting", scene.setting.as_str()));
        texts.extend(scene.plot_twist.as_deref().map(|t| ("plot twist", t)));
        texts.extend(scene.clue.as_deref().map(|t| ("clue", t)));
        for encounter in &scene.encounter_set {
            texts.push(("encounter type", encounter.encounter_type.as_str()));
            texts.push(("description", encounter.description.as_str()));
            texts.extend(encounter.stats.as_deref().map(|t| ("stats", t)));
        }
    }

    match texts.into_iter().find(|(_, text)| !is_safe_text(text)) {
        Some((field, _)) => Err(ClientError::validation(
            field,
            format!("The {} contains text that cannot be saved.", field),
        )),
        None => Ok(()),
    }
}

/// 提交一次进度修改
pub async fn submit_progress<C: HttpClient, S: KeyValueStore>(
    api: &OdysseyApi<C>,
    climax: &ClimaxStore<S>,
    update: ProgressUpdate,
) -> ClientResult<()> {
    match update {
        ProgressUpdate::Entity { target, progress } => api.update_progress(target, progress).await,
        ProgressUpdate::Climax { id, progress } => {
            if climax.store(id, progress) {
                Ok(())
            } else {
                Err(ClientError::Network(
                    "climax progress could not be stored".to_string(),
                ))
            }
        }
        ProgressUpdate::LocalOnly => Ok(()),
    }
}

/// 加载冒险并合并本地保存的高潮进度
pub async fn load_adventure<C: HttpClient, S: KeyValueStore>(
    api: &OdysseyApi<C>,
    climax: &ClimaxStore<S>,
    id: u64,
) -> ClientResult<Adventure> {
    let adventure = api.get_adventure(id).await?;
    Ok(climax.restore(adventure))
}

/// 一次保存的执行结果
///
/// 即使中途失败，`applied` 也列出已在服务端完成的步骤。
#[derive(Debug)]
pub struct SaveReport {
    pub applied: Vec<SavedOp>,
    pub result: ClientResult<Adventure>,
}

/// 按顺序执行保存计划，然后重新加载冒险
///
/// 新建的冒险与场景在创建后才有 id，后续操作中的 `adventure_id` / `scene_id` 在这里填入。
/// 任一步失败即中止，不自动重试。
pub async fn execute_plan<C: HttpClient, S: KeyValueStore>(
    api: &OdysseyApi<C>,
    climax: &ClimaxStore<S>,
    plan: Vec<RemoteOp>,
) -> SaveReport {
    let mut applied = Vec::new();
    let result = run_plan(api, climax, plan, &mut applied).await;
    if result.is_err() && !applied.is_empty() {
        warn!(completed = applied.len(), "save stopped partway");
    }
    SaveReport { applied, result }
}

async fn run_plan<C: HttpClient, S: KeyValueStore>(
    api: &OdysseyApi<C>,
    climax: &ClimaxStore<S>,
    plan: Vec<RemoteOp>,
    applied: &mut Vec<SavedOp>,
) -> ClientResult<Adventure> {
    let mut adventure_id = None;

    for op in plan {
        match op {
            RemoteOp::DeleteEncounter { id } => {
                already_gone(api.delete_encounter(id).await)?;
                applied.push(SavedOp::EncounterDeleted { id });
            }
            RemoteOp::DeleteScene { id } => {
                already_gone(api.delete_scene(id).await)?;
                applied.push(SavedOp::SceneDeleted { id });
            }
            RemoteOp::CreateAdventure(payload) => {
                let created = api.create_adventure(&payload).await?;
                let id = created.id.ok_or_else(|| {
                    ClientError::Decode("created adventure has no id".to_string())
                })?;
                applied.push(SavedOp::AdventureSaved { id });
                adventure_id = Some(id);
            }
            RemoteOp::UpdateAdventure { id, payload } => {
                api.update_adventure(id, payload).await?;
                adventure_id = Some(id);
            }
            RemoteOp::SaveScene {
                index,
                id,
                mut payload,
                encounters,
            } => {
                if let Some(adventure_id) = adventure_id {
                    payload.adventure_id = adventure_id;
                }
                let scene_id = api.save_scene(id, payload).await?;
                if id.is_none() {
                    applied.push(SavedOp::SceneSaved { index, id: scene_id });
                }
                for encounter in encounters {
                    let encounter_id = api
                        .save_encounter(encounter.id, encounter.payload(scene_id))
                        .await?;
                    if encounter.id.is_none() {
                        applied.push(SavedOp::EncounterSaved {
                            scene: index,
                            position: encounter.position,
                            id: encounter_id,
                        });
                    }
                }
            }
        }
    }

    let id = adventure_id
        .ok_or_else(|| ClientError::Decode("save plan has no adventure".to_string()))?;
    load_adventure(api, climax, id).await
}

/// 删除时资源已不存在视为完成
fn already_gone(result: ClientResult<()>) -> ClientResult<()> {
    match result {
        Err(ClientError::NotFound) => {
            debug!("resource already deleted");
            Ok(())
        }
        other => other,
    }
}

#[cfg(test)]
mod tests;
